use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{Cell, EmbeddedImage, ImageAnchor};
use crate::cell_ref::{format_address, parse_cell_range, MAX_COLS, MAX_ROWS};
use crate::error::{GridError, Result};
use crate::units::{DEFAULT_COLUMN_WIDTH_UNITS, DEFAULT_ROW_HEIGHT_PT};

/// A parsed worksheet, read-only once loaded
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: SheetProperties,
    /// Declared columns in ascending index order
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Declared rows in ascending index order
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub merges: Vec<MergeRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<EmbeddedImage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_anchors: Vec<ImageAnchor>,
}

/// Sheet-wide size defaults
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    /// Row height in points used when a row has no explicit height
    #[serde(default = "default_row_height")]
    pub default_row_height: f64,
    /// Column width in character units used when a column has no explicit width
    #[serde(default = "default_col_width")]
    pub default_col_width: f64,
}

fn default_row_height() -> f64 {
    DEFAULT_ROW_HEIGHT_PT
}

fn default_col_width() -> f64 {
    DEFAULT_COLUMN_WIDTH_UNITS
}

impl Default for SheetProperties {
    fn default() -> Self {
        Self {
            default_row_height: DEFAULT_ROW_HEIGHT_PT,
            default_col_width: DEFAULT_COLUMN_WIDTH_UNITS,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column index (0-indexed)
    pub index: u32,
    /// Width in character units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default)]
    pub hidden: bool,
}

impl Column {
    pub fn new(index: u32, width: Option<f64>) -> Self {
        Self {
            index,
            width,
            hidden: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Row index (0-indexed)
    pub index: u32,
    /// Height in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub hidden: bool,
}

impl Row {
    pub fn new(index: u32, height: Option<f64>) -> Self {
        Self {
            index,
            height,
            hidden: false,
        }
    }
}

/// A declared merge, inclusive on both ends (0-indexed)
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct MergeRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl MergeRange {
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    /// Parse an A1-style range like "B1:C1".
    pub fn from_ref(range: &str) -> Option<Self> {
        let (start_row, start_col, end_row, end_col) = parse_cell_range(range)?;
        Some(Self::new(start_row, start_col, end_row, end_col))
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.start_row..=self.end_row).contains(&row)
            && (self.start_col..=self.end_col).contains(&col)
    }

    /// Address of the anchor (top-left) cell
    pub fn anchor_address(&self) -> String {
        format_address(self.start_row, self.start_col)
    }
}

impl Sheet {
    /// Deserialize a sheet model from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let sheet: Self = serde_json::from_str(json)?;
        sheet.validate()?;
        Ok(sheet)
    }

    /// Check the boundary invariants the renderer relies on.
    ///
    /// Rejects non-finite or negative sizes, unsorted or duplicate row/column
    /// declarations, indices past the worksheet limits, duplicate cells,
    /// inverted merge ranges and cells that would belong to more than one
    /// merge.
    pub fn validate(&self) -> Result<()> {
        let props = &self.properties;
        if !(props.default_row_height.is_finite() && props.default_row_height >= 0.0) {
            return Err(invalid("default row height must be finite and non-negative"));
        }
        if !(props.default_col_width.is_finite() && props.default_col_width >= 0.0) {
            return Err(invalid("default column width must be finite and non-negative"));
        }

        check_axis(
            "column",
            MAX_COLS,
            self.columns.iter().map(|c| (c.index, c.width)),
        )?;
        check_axis("row", MAX_ROWS, self.rows.iter().map(|r| (r.index, r.height)))?;

        let mut seen = HashSet::with_capacity(self.cells.len());
        for cell in &self.cells {
            check_bounds("cell", cell.row, cell.col)?;
            if !seen.insert((cell.row, cell.col)) {
                return Err(invalid(format!(
                    "duplicate cell at {}",
                    format_address(cell.row, cell.col)
                )));
            }
        }

        for anchor in &self.image_anchors {
            check_bounds("image anchor", anchor.from_row, anchor.from_col)?;
        }

        for merge in &self.merges {
            if merge.start_row > merge.end_row || merge.start_col > merge.end_col {
                return Err(invalid(format!(
                    "merge starting at {} ends before it starts",
                    merge.anchor_address()
                )));
            }
            check_bounds("merge", merge.end_row, merge.end_col)?;
        }
        check_merge_overlaps(&self.merges)
    }

    /// Build a lookup from `(row, col)` to the cell's position in `cells`.
    pub fn cell_index(&self) -> CellIndex {
        let positions = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| ((cell.row, cell.col), i))
            .collect();
        CellIndex { positions }
    }
}

fn invalid(msg: impl Into<String>) -> GridError {
    GridError::InvalidSheet(msg.into())
}

fn check_axis(
    kind: &str,
    limit: u32,
    items: impl Iterator<Item = (u32, Option<f64>)>,
) -> Result<()> {
    let mut previous: Option<u32> = None;
    for (index, size) in items {
        if index >= limit {
            return Err(invalid(format!("{kind} {index} is past the last {kind}")));
        }
        if let Some(size) = size {
            if !(size.is_finite() && size >= 0.0) {
                return Err(invalid(format!(
                    "{kind} {index} has invalid size {size}"
                )));
            }
        }
        if previous.is_some_and(|p| p >= index) {
            return Err(invalid(format!(
                "{kind} {index} is declared out of order or twice"
            )));
        }
        previous = Some(index);
    }
    Ok(())
}

fn check_bounds(kind: &str, row: u32, col: u32) -> Result<()> {
    if row >= MAX_ROWS || col >= MAX_COLS {
        return Err(invalid(format!(
            "{kind} at row {row}, column {col} is outside the worksheet"
        )));
    }
    Ok(())
}

/// Sweep merges top to bottom, keeping the ones whose rows are still open.
///
/// Two merges overlap when their row and column ranges both intersect; the
/// error names the top-left cell they share.
fn check_merge_overlaps(merges: &[MergeRange]) -> Result<()> {
    let mut sorted: Vec<&MergeRange> = merges.iter().collect();
    sorted.sort_by_key(|m| (m.start_row, m.start_col));

    let mut open: Vec<&MergeRange> = Vec::new();
    for merge in sorted {
        open.retain(|m| m.end_row >= merge.start_row);
        if let Some(other) = open
            .iter()
            .find(|m| m.start_col <= merge.end_col && merge.start_col <= m.end_col)
        {
            return Err(invalid(format!(
                "{} belongs to more than one merge",
                format_address(
                    other.start_row.max(merge.start_row),
                    other.start_col.max(merge.start_col)
                )
            )));
        }
        open.push(merge);
    }
    Ok(())
}

/// Position lookup for a sheet's cells
#[derive(Debug, Clone, Default)]
pub struct CellIndex {
    positions: HashMap<(u32, u32), usize>,
}

impl CellIndex {
    pub fn get<'a>(&self, sheet: &'a Sheet, row: u32, col: u32) -> Option<&'a Cell> {
        self.positions
            .get(&(row, col))
            .and_then(|&i| sheet.cells.get(i))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn sheet() -> Sheet {
        Sheet {
            columns: (0..5).map(|i| Column::new(i, Some(7.43))).collect(),
            rows: (0..3).map(|i| Row::new(i, None)).collect(),
            ..Sheet::default()
        }
    }

    #[test]
    fn accepts_well_formed_sheet() {
        let mut s = sheet();
        s.cells.push(Cell::new(0, 1, CellValue::String("x".into())));
        s.merges.push(MergeRange::from_ref("B1:C1").unwrap());
        s.merges.push(MergeRange::from_ref("A2:A3").unwrap());
        assert!(s.validate().is_ok());
        let index = s.cell_index();
        assert_eq!(index.len(), 1);
        assert!(index.get(&s, 0, 1).is_some());
        assert!(index.get(&s, 0, 2).is_none());
    }

    #[test]
    fn rejects_overlapping_merges() {
        let mut s = sheet();
        s.merges.push(MergeRange::from_ref("B1:C2").unwrap());
        s.merges.push(MergeRange::from_ref("C2:D3").unwrap());
        match s.validate() {
            Err(GridError::InvalidSheet(msg)) => assert!(msg.contains("C2")),
            other => panic!("expected InvalidSheet, got {other:?}"),
        }
    }

    #[test]
    fn rejects_merge_inside_a_larger_one() {
        let mut s = sheet();
        s.merges.push(MergeRange::from_ref("A1:E100").unwrap());
        s.merges.push(MergeRange::from_ref("A50:B50").unwrap());
        s.merges.push(MergeRange::from_ref("C40:D60").unwrap());
        match s.validate() {
            Err(GridError::InvalidSheet(msg)) => assert!(msg.contains("C40"), "{msg}"),
            other => panic!("expected InvalidSheet, got {other:?}"),
        }
    }

    #[test]
    fn whole_column_merge_validates_without_walking_cells() {
        let mut s = sheet();
        s.merges.push(MergeRange::from_ref("A1:Z1048576").unwrap());
        s.merges.push(MergeRange::from_ref("AA1:AA2").unwrap());
        assert!(s.validate().is_ok());

        s.merges.push(MergeRange::from_ref("Z1048576:AA1048576").unwrap());
        assert!(s.validate().is_err());
    }

    fn far_image(s: &mut Sheet) {
        s.image_anchors.push(ImageAnchor {
            image_id: "logo".into(),
            from_row: 0,
            from_col: MAX_COLS,
            from_col_off: 0,
            from_row_off: 0,
            extent_cx: None,
            extent_cy: None,
        });
    }

    #[test]
    fn rejects_indices_past_the_worksheet() {
        let cases: [(&str, fn(&mut Sheet)); 7] = [
            ("cell row", |s| s.cells.push(Cell::new(MAX_ROWS, 0, CellValue::Empty))),
            ("cell column", |s| s.cells.push(Cell::new(0, MAX_COLS, CellValue::Empty))),
            ("declared row", |s| s.rows.push(Row::new(MAX_ROWS, None))),
            ("declared column", |s| s.columns.push(Column::new(MAX_COLS, None))),
            ("merge end row", |s| s.merges.push(MergeRange::new(0, 0, MAX_ROWS, 0))),
            ("merge end column", |s| s.merges.push(MergeRange::new(0, 0, 0, u32::MAX))),
            ("image anchor", far_image),
        ];
        for (name, grow) in cases {
            let mut s = sheet();
            grow(&mut s);
            assert!(
                matches!(s.validate(), Err(GridError::InvalidSheet(_))),
                "{name} past the limit was accepted"
            );
        }
    }

    #[test]
    fn accepts_the_last_row_and_column() {
        let mut s = sheet();
        s.cells.push(Cell::new(MAX_ROWS - 1, MAX_COLS - 1, CellValue::Empty));
        s.merges.push(MergeRange::from_ref("XFC1048575:XFD1048576").unwrap());
        assert!(s.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_merge() {
        let mut s = sheet();
        s.merges.push(MergeRange::new(2, 0, 1, 0));
        assert!(matches!(s.validate(), Err(GridError::InvalidSheet(_))));
    }

    #[test]
    fn rejects_bad_sizes_and_order() {
        let mut s = sheet();
        s.columns.push(Column::new(9, Some(f64::NAN)));
        assert!(s.validate().is_err());

        let mut s = sheet();
        s.rows.push(Row::new(1, None));
        assert!(s.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_cells() {
        let mut s = sheet();
        s.cells.push(Cell::new(1, 1, CellValue::Empty));
        s.cells.push(Cell::new(1, 1, CellValue::String("again".into())));
        assert!(s.validate().is_err());
    }

    #[test]
    fn parses_json_with_defaults() {
        let s = Sheet::from_json(
            r#"{"id": 1, "name": "Sheet1", "columns": [{"index": 0}], "rows": [{"index": 0, "height": 30}]}"#,
        )
        .unwrap();
        assert_eq!(s.properties, SheetProperties::default());
        assert!(s.cells.is_empty());
        assert!(Sheet::from_json("{\"columns\": 3}").is_err());
    }
}
