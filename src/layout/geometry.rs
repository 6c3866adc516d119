//! Pre-computed row/column geometry for a sheet.
//!
//! Offsets are computed once when a sheet is mounted. Each axis also records
//! slice checkpoints every `step` pixels so a scroll offset can be resolved to
//! a nearby starting item without rescanning from the first row or column.

use std::collections::HashMap;
use std::ops::Range;

use crate::types::Sheet;
use crate::units::{height_units_to_px, width_units_to_px};

/// A visible row or column with its pixel placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisItem {
    /// Row or column index in the sheet (0-indexed)
    pub index: u32,
    /// Sum of the sizes of all preceding visible items
    pub offset: f64,
    /// Size in pixels
    pub size: f64,
}

impl AxisItem {
    pub fn end(&self) -> f64 {
        self.offset + self.size
    }
}

/// Coarse lookup point: the item whose span contains `threshold`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceCheckpoint {
    /// Multiple of the slice step, in pixels
    pub threshold: f64,
    /// Position of the item in the axis item list
    pub position: usize,
    /// Sheet index of that item
    pub index: u32,
    /// Cumulative offset of that item
    pub offset: f64,
}

/// Offsets and checkpoints for one axis (rows or columns)
#[derive(Debug, Clone, Default)]
pub struct AxisIndex {
    /// Ascending by index
    items: Vec<AxisItem>,
    checkpoints: Vec<SliceCheckpoint>,
    total: f64,
}

impl AxisIndex {
    /// Build from visible `(index, size)` pairs in ascending index order.
    ///
    /// A checkpoint is recorded for every positive multiple of `step` that
    /// falls inside the axis. A non-positive step records none.
    pub fn build(sizes: impl IntoIterator<Item = (u32, f64)>, step: f64) -> Self {
        let record = step.is_finite() && step > 0.0;
        let mut items = Vec::new();
        let mut checkpoints = Vec::new();
        let mut offset = 0.0;
        let mut next_threshold = step;

        for (index, size) in sizes {
            let position = items.len();
            let item = AxisItem {
                index,
                offset,
                size,
            };
            while record && next_threshold < item.end() {
                checkpoints.push(SliceCheckpoint {
                    threshold: next_threshold,
                    position,
                    index,
                    offset,
                });
                next_threshold += step;
            }
            items.push(item);
            offset += size;
        }

        Self {
            items,
            checkpoints,
            total: offset,
        }
    }

    pub fn items(&self) -> &[AxisItem] {
        &self.items
    }

    pub fn checkpoints(&self) -> &[SliceCheckpoint] {
        &self.checkpoints
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all visible item sizes
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Position of `index` in [`Self::items`]
    pub fn position(&self, index: u32) -> Option<usize> {
        self.items.binary_search_by_key(&index, |item| item.index).ok()
    }

    pub fn get(&self, index: u32) -> Option<&AxisItem> {
        self.position(index).and_then(|position| self.items.get(position))
    }

    /// True if `index` is a visible item on this axis
    pub fn contains(&self, index: u32) -> bool {
        self.position(index).is_some()
    }

    /// Positions of the visible items with index in `start..=end`.
    pub fn range(&self, start: u32, end: u32) -> Range<usize> {
        let from = self.items.partition_point(|item| item.index < start);
        let to = self.items.partition_point(|item| item.index <= end);
        from..to.max(from)
    }

    /// Lowest visible index in `start..=end`.
    pub fn first_in(&self, start: u32, end: u32) -> Option<u32> {
        let range = self.range(start, end);
        self.items.get(range.start).filter(|_| !range.is_empty()).map(|item| item.index)
    }

    pub fn offset_of(&self, index: u32) -> Option<f64> {
        self.get(index).map(|item| item.offset)
    }

    pub fn size_of(&self, index: u32) -> Option<f64> {
        self.get(index).map(|item| item.size)
    }

    /// Combined size of the visible items with index in `start..=end`.
    /// Hidden or undeclared indices contribute nothing.
    pub fn span(&self, start: u32, end: u32) -> f64 {
        let range = self.range(start, end);
        let first = self.items.get(range.start);
        let last = range.end.checked_sub(1).and_then(|i| self.items.get(i));
        match (first, last) {
            (Some(first), Some(last)) if !range.is_empty() => last.end() - first.offset,
            _ => 0.0,
        }
    }

    /// Position in [`Self::items`] where a scan for `scroll` may begin.
    ///
    /// Uses the last checkpoint at or below `scroll`. Every item before the
    /// returned position ends at or before `scroll`.
    pub fn seed(&self, scroll: f64) -> usize {
        let after = self.checkpoints.partition_point(|cp| cp.threshold <= scroll);
        match after.checked_sub(1).and_then(|i| self.checkpoints.get(i)) {
            Some(cp) => cp.position,
            None => 0,
        }
    }

    /// Positions of the items whose span intersects
    /// `[scroll, scroll + extent)`.
    ///
    /// Scans forward from [`Self::seed`] and stops at the first item past the
    /// window, so the result is one contiguous run.
    pub fn visible_range(&self, scroll: f64, extent: f64) -> Range<usize> {
        let limit = scroll + extent;
        let seed = self.seed(scroll);
        let mut start = None;
        let mut end = seed;
        for (position, item) in self.items.iter().enumerate().skip(seed) {
            if item.offset >= limit {
                break;
            }
            if item.end() > scroll {
                start.get_or_insert(position);
                end = position + 1;
            } else if start.is_some() {
                break;
            }
        }
        start.map_or(seed..seed, |start| start..end)
    }

    /// Indices of the items whose span intersects `[scroll, scroll + extent)`,
    /// in ascending order.
    pub fn visible(&self, scroll: f64, extent: f64) -> Vec<u32> {
        self.indices(self.visible_range(scroll, extent))
    }

    /// Indices of the items at `positions`.
    pub fn indices(&self, positions: Range<usize>) -> Vec<u32> {
        self.items
            .get(positions)
            .unwrap_or_default()
            .iter()
            .map(|item| item.index)
            .collect()
    }

    /// Item containing `offset`, by binary search
    pub fn index_at(&self, offset: f64) -> Option<u32> {
        let position = self.items.partition_point(|item| item.end() <= offset);
        self.items
            .get(position)
            .filter(|item| item.offset <= offset)
            .map(|item| item.index)
    }
}

/// Row and column geometry of one sheet
#[derive(Debug, Clone, Default)]
pub struct GeometryIndex {
    pub columns: AxisIndex,
    pub rows: AxisIndex,
}

impl GeometryIndex {
    /// Lay out every column and row from 0 up to the furthest declared or
    /// populated index. Undeclared items take the sheet defaults, hidden items
    /// are left out. Checkpoint steps are the viewport width and height.
    pub fn new(sheet: &Sheet, dpi: f64, step_x: f64, step_y: f64) -> Self {
        let (col_extent, row_extent) = extents(sheet);
        let props = sheet.properties;

        let declared_cols: HashMap<u32, _> = sheet.columns.iter().map(|c| (c.index, c)).collect();
        let columns = col_extent.map_or_else(AxisIndex::default, |max| {
            let sizes = (0..=max).filter_map(|index| match declared_cols.get(&index) {
                Some(col) if col.hidden => None,
                Some(col) => Some((
                    index,
                    width_units_to_px(col.width.unwrap_or(props.default_col_width)),
                )),
                None => Some((index, width_units_to_px(props.default_col_width))),
            });
            AxisIndex::build(sizes, step_x)
        });

        let declared_rows: HashMap<u32, _> = sheet.rows.iter().map(|r| (r.index, r)).collect();
        let rows = row_extent.map_or_else(AxisIndex::default, |max| {
            let sizes = (0..=max).filter_map(|index| match declared_rows.get(&index) {
                Some(row) if row.hidden => None,
                Some(row) => Some((
                    index,
                    height_units_to_px(row.height.unwrap_or(props.default_row_height), dpi),
                )),
                None => Some((index, height_units_to_px(props.default_row_height, dpi))),
            });
            AxisIndex::build(sizes, step_y)
        });

        Self { columns, rows }
    }

    /// Total width and height of all visible columns and rows
    pub fn content_size(&self) -> (f64, f64) {
        (self.columns.total(), self.rows.total())
    }
}

/// Highest column and row index the sheet mentions anywhere.
fn extents(sheet: &Sheet) -> (Option<u32>, Option<u32>) {
    let cols = sheet
        .columns
        .iter()
        .map(|c| c.index)
        .chain(sheet.cells.iter().map(|c| c.col))
        .chain(sheet.merges.iter().map(|m| m.end_col))
        .max();
    let rows = sheet
        .rows
        .iter()
        .map(|r| r.index)
        .chain(sheet.cells.iter().map(|c| c.row))
        .chain(sheet.merges.iter().map(|m| m.end_row))
        .max();
    (cols, rows)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::types::{Column, Row};

    fn uniform(count: u32, size: f64, step: f64) -> AxisIndex {
        AxisIndex::build((0..count).map(|i| (i, size)), step)
    }

    #[test]
    fn offsets_are_cumulative() {
        let axis = AxisIndex::build([(0, 10.0), (1, 20.0), (2, 30.0)], 0.0);
        assert_eq!(axis.offset_of(0), Some(0.0));
        assert_eq!(axis.offset_of(1), Some(10.0));
        assert_eq!(axis.offset_of(2), Some(30.0));
        assert_eq!(axis.total(), 60.0);
        assert!(axis.checkpoints().is_empty());
    }

    #[test]
    fn checkpoints_hold_the_item_containing_each_threshold() {
        let axis = uniform(10, 30.0, 50.0);
        let cps = axis.checkpoints();
        // thresholds 50..250 inside a 300px axis
        assert_eq!(cps.len(), 5);
        assert_eq!(cps[0].threshold, 50.0);
        assert_eq!(cps[0].index, 1);
        assert_eq!(cps[0].offset, 30.0);
        assert_eq!(cps[1].threshold, 100.0);
        assert_eq!(cps[1].index, 3);
        for cp in cps {
            assert!(cp.offset <= cp.threshold && cp.threshold < cp.offset + 30.0);
        }
        assert!(cps.windows(2).all(|w| w[0].threshold < w[1].threshold));
    }

    #[test]
    fn seed_never_skips_a_visible_item() {
        let axis = uniform(100, 17.0, 40.0);
        for scroll in (0..1700).step_by(7) {
            let scroll = f64::from(scroll);
            let seed = axis.seed(scroll);
            assert!(axis.items()[..seed].iter().all(|item| item.end() <= scroll));
        }
    }

    #[test]
    fn visible_matches_brute_force() {
        let sizes: Vec<(u32, f64)> = (0..60).map(|i| (i, f64::from(10 + (i * 7) % 23))).collect();
        let axis = AxisIndex::build(sizes.iter().copied(), 120.0);
        let extent = 120.0;
        let mut scroll = 0.0;
        while scroll < axis.total() {
            let expected: Vec<u32> = axis
                .items()
                .iter()
                .filter(|item| item.offset < scroll + extent && item.end() > scroll)
                .map(|item| item.index)
                .collect();
            assert_eq!(axis.visible(scroll, extent), expected, "scroll {scroll}");
            scroll += 1.0;
        }
    }

    #[test]
    fn visible_past_content_is_empty() {
        let axis = uniform(5, 20.0, 40.0);
        assert!(axis.visible(500.0, 40.0).is_empty());
        assert!(AxisIndex::default().visible(0.0, 100.0).is_empty());
    }

    #[test]
    fn index_at_resolves_offsets() {
        let axis = AxisIndex::build([(0, 10.0), (2, 20.0)], 0.0);
        assert_eq!(axis.index_at(0.0), Some(0));
        assert_eq!(axis.index_at(9.9), Some(0));
        assert_eq!(axis.index_at(10.0), Some(2));
        assert_eq!(axis.index_at(30.0), None);
        assert_eq!(axis.span(0, 2), 30.0);
    }

    #[test]
    fn ranges_skip_hidden_indices() {
        // Index 2 is hidden.
        let axis = AxisIndex::build([(0, 10.0), (1, 10.0), (3, 10.0), (4, 10.0)], 0.0);
        assert_eq!(axis.range(1, 3), 1..3);
        assert_eq!(axis.range(2, 2), 2..2);
        assert_eq!(axis.range(9, 12), 4..4);
        assert_eq!(axis.first_in(2, 4), Some(3));
        assert_eq!(axis.first_in(2, 2), None);
        assert_eq!(axis.span(1, 3), 20.0);
        assert_eq!(axis.span(2, 2), 0.0);
        assert_eq!(axis.indices(axis.range(0, 4)), vec![0, 1, 3, 4]);
    }

    #[test]
    fn span_of_a_whole_column_is_a_prefix_difference() {
        let axis = uniform(1_048_576, 20.0, 300.0);
        assert_eq!(axis.span(0, 1_048_575), 20_971_520.0);
        assert_eq!(axis.span(1_000, 1_999), 20_000.0);
        assert_eq!(axis.visible_range(10_000_000.0, 60.0), 500_000..500_003);
    }

    #[test]
    fn sheet_geometry_skips_hidden_and_fills_defaults() {
        let mut hidden = Column::new(1, Some(20.0));
        hidden.hidden = true;
        let sheet = Sheet {
            columns: vec![Column::new(0, Some(7.43)), hidden, Column::new(3, None)],
            rows: vec![Row::new(0, Some(30.0)), Row::new(2, None)],
            ..Sheet::default()
        };
        let geometry = GeometryIndex::new(&sheet, 96.0, 400.0, 300.0);
        let cols: Vec<u32> = geometry.columns.items().iter().map(|c| c.index).collect();
        assert_eq!(cols, vec![0, 2, 3]);
        assert_eq!(geometry.columns.size_of(0), Some(57.0));
        assert_eq!(geometry.columns.size_of(2), Some(64.0));
        assert_eq!(geometry.columns.offset_of(3), Some(121.0));
        assert_eq!(geometry.rows.size_of(0), Some(40.0));
        assert_eq!(geometry.rows.size_of(1), Some(20.0));
        assert_eq!(geometry.content_size(), (185.0, 80.0));
    }
}
