//! Viewport state and per-frame culling.

use super::{AxisIndex, GeometryIndex, MergeResolver, PositionSpans};

/// Viewport state - the visible window onto the sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Surface width in CSS pixels
    pub width: f64,
    /// Surface height in CSS pixels
    pub height: f64,
    /// Horizontal scroll position in sheet coordinates
    pub scroll_x: f64,
    /// Vertical scroll position in sheet coordinates
    pub scroll_y: f64,
    /// `scroll_x` minus the left offset of the first drawn column
    pub scroll_x_diff: f64,
    /// `scroll_y` minus the top offset of the first drawn row
    pub scroll_y_diff: f64,
    /// Width of the row-number column in front of the cells (0 when hidden)
    pub header_width: f64,
    /// Height of the column-letter row above the cells (0 when hidden)
    pub header_height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
            scroll_x_diff: 0.0,
            scroll_y_diff: 0.0,
            header_width: 0.0,
            header_height: 0.0,
        }
    }

    #[must_use]
    pub fn with_headers(mut self, header_width: f64, header_height: f64) -> Self {
        self.header_width = header_width;
        self.header_height = header_height;
        self
    }

    /// Width available to cells, right of the row headers
    pub fn cell_area_width(&self) -> f64 {
        (self.width - self.header_width).max(0.0)
    }

    /// Height available to cells, below the column headers
    pub fn cell_area_height(&self) -> f64 {
        (self.height - self.header_height).max(0.0)
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}

/// Rows and columns to draw this frame, ascending and deduplicated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSet {
    pub rows: Vec<u32>,
    pub columns: Vec<u32>,
}

impl RenderSet {
    /// True when there is nothing to paint
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }
}

/// Recompute the visible rows and columns.
///
/// Explicit scroll offsets replace the viewport's; `None` keeps the previous
/// value. Visible items are those intersecting the cell area, closed under
/// merge membership. Updates the viewport's scroll position and diffs.
pub fn calculate_render_cells(
    geometry: &GeometryIndex,
    merges: &MergeResolver,
    viewport: &mut Viewport,
    scroll_x: Option<f64>,
    scroll_y: Option<f64>,
) -> RenderSet {
    if let Some(x) = scroll_x {
        viewport.scroll_x = x;
    }
    if let Some(y) = scroll_y {
        viewport.scroll_y = y;
    }

    let mut rows = PositionSpans::new(
        geometry
            .rows
            .visible_range(viewport.scroll_y, viewport.cell_area_height()),
    );
    let mut columns = PositionSpans::new(
        geometry
            .columns
            .visible_range(viewport.scroll_x, viewport.cell_area_width()),
    );
    merges.expand(&mut rows, &mut columns, &geometry.rows, &geometry.columns);

    let set = RenderSet {
        rows: indices(&rows, &geometry.rows),
        columns: indices(&columns, &geometry.columns),
    };

    viewport.scroll_x_diff = set
        .columns
        .first()
        .and_then(|&c| geometry.columns.offset_of(c))
        .map_or(0.0, |left| viewport.scroll_x - left);
    viewport.scroll_y_diff = set
        .rows
        .first()
        .and_then(|&r| geometry.rows.offset_of(r))
        .map_or(0.0, |top| viewport.scroll_y - top);

    tracing::debug!(
        rows = set.rows.len(),
        columns = set.columns.len(),
        scroll_x = viewport.scroll_x,
        scroll_y = viewport.scroll_y,
        scroll_x_diff = viewport.scroll_x_diff,
        scroll_y_diff = viewport.scroll_y_diff,
        "culled viewport"
    );

    set
}

fn indices(spans: &PositionSpans, axis: &AxisIndex) -> Vec<u32> {
    spans
        .spans()
        .iter()
        .flat_map(|span| axis.indices(span.clone()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::{Column, MergeRange, Row, Sheet};

    fn five_columns() -> Sheet {
        Sheet {
            columns: (0..5).map(|i| Column::new(i, Some(7.43))).collect(),
            rows: (0..4).map(|i| Row::new(i, None)).collect(),
            merges: vec![MergeRange::from_ref("B1:C1").unwrap()],
            ..Sheet::default()
        }
    }

    #[test]
    fn explicit_offsets_override_and_none_keeps() {
        let sheet = five_columns();
        let geometry = GeometryIndex::new(&sheet, 96.0, 100.0, 60.0);
        let merges = MergeResolver::new(&sheet.merges);
        let mut viewport = Viewport::new(100.0, 60.0);

        calculate_render_cells(&geometry, &merges, &mut viewport, Some(60.0), Some(25.0));
        assert_eq!((viewport.scroll_x, viewport.scroll_y), (60.0, 25.0));

        let set = calculate_render_cells(&geometry, &merges, &mut viewport, None, None);
        assert_eq!((viewport.scroll_x, viewport.scroll_y), (60.0, 25.0));
        assert_eq!(set.rows, vec![1, 2, 3]);
        assert_eq!(viewport.scroll_y_diff, 5.0);
    }

    #[test]
    fn merge_pulls_in_scrolled_off_anchor_column() {
        let sheet = five_columns();
        let geometry = GeometryIndex::new(&sheet, 96.0, 57.0, 80.0);
        let merges = MergeResolver::new(&sheet.merges);
        // Only column C ([114, 171)) intersects [120, 160).
        let mut viewport = Viewport::new(40.0, 80.0);
        let set = calculate_render_cells(&geometry, &merges, &mut viewport, Some(120.0), None);
        assert_eq!(set.columns, vec![1, 2]);
        assert_eq!(viewport.scroll_x_diff, 120.0 - 57.0);
    }

    #[test]
    fn header_insets_shrink_the_cell_area() {
        let sheet = five_columns();
        let geometry = GeometryIndex::new(&sheet, 96.0, 200.0, 80.0);
        let merges = MergeResolver::default();
        let mut viewport = Viewport::new(150.0, 80.0).with_headers(50.0, 20.0);
        let set = calculate_render_cells(&geometry, &merges, &mut viewport, Some(0.0), Some(0.0));
        assert_eq!(set.columns, vec![0, 1]);
        assert_eq!(set.rows, vec![0, 1, 2]);
    }

    #[test]
    fn past_content_is_empty_with_zero_diffs() {
        let sheet = five_columns();
        let geometry = GeometryIndex::new(&sheet, 96.0, 100.0, 60.0);
        let merges = MergeResolver::new(&sheet.merges);
        let mut viewport = Viewport::new(100.0, 60.0);
        let set = calculate_render_cells(&geometry, &merges, &mut viewport, Some(5000.0), None);
        assert!(set.columns.is_empty());
        assert!(set.is_empty());
        assert_eq!(viewport.scroll_x_diff, 0.0);
    }
}
