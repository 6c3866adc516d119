//! Render orchestrator.
//!
//! [`SheetCanvas`] owns one sheet's lifecycle on one surface: it validates
//! the model, builds the geometry and merge indexes, sizes the surface, and
//! runs cull + paint passes in response to scrolling and resizing. Switching
//! sheets means mounting a new `SheetCanvas`.

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod scroll;

#[cfg(target_arch = "wasm32")]
pub use dom::GridView;
pub use scroll::{
    DragState, RenderViewport, ScrollAxis, ScrollController, ScrollPosition, ScrollbarMetrics,
};

use serde::Serialize;

use crate::error::{GridError, Result};
use crate::layout::{calculate_render_cells, GeometryIndex, MergeResolver, RenderSet, Viewport};
use crate::options::GridOptions;
use crate::render::{
    CellPaintRecord, PaintRecords, PaintState, PaintStats, SheetPainter, Surface,
};
use crate::types::{CellIndex, Sheet};

/// Host notifications for one mount
#[derive(Default)]
pub struct Callbacks {
    /// Fired once after the first successful paint
    pub on_init_load: Option<Box<dyn FnOnce()>>,
    /// Fired when the sheet or viewport is rejected
    pub on_error: Option<Box<dyn FnOnce(&GridError)>>,
}

impl Callbacks {
    pub fn on_init_load(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_init_load = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl FnOnce(&GridError) + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }
}

/// Summary of one render pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderStats {
    pub rows: usize,
    pub columns: usize,
    pub cells_painted: usize,
    pub images_drawn: usize,
    pub images_skipped: usize,
}

impl RenderStats {
    fn new(set: &RenderSet, paint: PaintStats) -> Self {
        Self {
            rows: set.rows.len(),
            columns: set.columns.len(),
            cells_painted: paint.cells_painted,
            images_drawn: paint.images_drawn,
            images_skipped: paint.images_skipped,
        }
    }
}

/// One sheet mounted on one surface
pub struct SheetCanvas<S: Surface> {
    sheet: Sheet,
    cells: CellIndex,
    geometry: GeometryIndex,
    merges: MergeResolver,
    options: GridOptions,
    viewport: Viewport,
    render_set: RenderSet,
    content_size: (f64, f64),
    dpr: f64,
    surface: S,
    state: PaintState,
    scroll: ScrollController,
    detached: bool,
}

impl<S: Surface> SheetCanvas<S> {
    /// Validate, lay out, size the surface and paint the first frame.
    ///
    /// On failure `on_error` is called and nothing is painted.
    pub fn mount(
        sheet: Sheet,
        surface: S,
        viewport_size: (f64, f64),
        dpr: f64,
        options: GridOptions,
        callbacks: Callbacks,
    ) -> Result<Self> {
        let Callbacks {
            on_init_load,
            on_error,
        } = callbacks;
        match Self::build(sheet, surface, viewport_size, dpr, options) {
            Ok(mut canvas) => {
                canvas.render();
                if let Some(callback) = on_init_load {
                    callback();
                }
                Ok(canvas)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to mount sheet");
                if let Some(callback) = on_error {
                    callback(&err);
                }
                Err(err)
            }
        }
    }

    fn build(
        sheet: Sheet,
        mut surface: S,
        (width, height): (f64, f64),
        dpr: f64,
        options: GridOptions,
    ) -> Result<Self> {
        validate_viewport(width, height, dpr)?;
        options.validate()?;
        sheet.validate()?;

        let cells = sheet.cell_index();
        let merges = MergeResolver::new(&sheet.merges);
        let viewport = Viewport::new(width, height).with_headers(
            options.header_width(),
            options.header_height(&sheet.properties),
        );
        let geometry = GeometryIndex::new(
            &sheet,
            options.dpi,
            viewport.cell_area_width(),
            viewport.cell_area_height(),
        );

        let (columns_px, rows_px) = geometry.content_size();
        let content_size = (
            columns_px + viewport.header_width + options.origin,
            rows_px + viewport.header_height + options.origin,
        );

        surface.resize(width, height, dpr);
        let mut scroll = ScrollController::new(options.scrollbar_thickness);
        scroll.init(width, height, content_size.0, content_size.1);

        tracing::debug!(
            sheet = %sheet.name,
            cells = cells.len(),
            merges = merges.groups().len(),
            columns = geometry.columns.len(),
            rows = geometry.rows.len(),
            content_width = content_size.0,
            content_height = content_size.1,
            "mounted sheet"
        );

        let mut canvas = Self {
            sheet,
            cells,
            geometry,
            merges,
            viewport,
            render_set: RenderSet::default(),
            content_size,
            dpr,
            surface,
            state: PaintState::default(),
            scroll,
            options,
            detached: false,
        };
        canvas.calculate_render_cells(None, None);
        Ok(canvas)
    }

    /// Re-cull. `None` keeps the previous offset on that axis.
    pub fn calculate_render_cells(&mut self, scroll_x: Option<f64>, scroll_y: Option<f64>) -> &RenderSet {
        self.render_set = calculate_render_cells(
            &self.geometry,
            &self.merges,
            &mut self.viewport,
            scroll_x,
            scroll_y,
        );
        &self.render_set
    }

    /// Paint the current render set. No-op once detached.
    pub fn render(&mut self) -> RenderStats {
        if self.detached {
            tracing::debug!("render skipped on detached canvas");
            return RenderStats::default();
        }
        let painter = SheetPainter {
            sheet: &self.sheet,
            cells: &self.cells,
            geometry: &self.geometry,
            merges: &self.merges,
            options: &self.options,
        };
        let paint = painter.paint(&mut self.surface, &self.viewport, &self.render_set, &mut self.state);
        RenderStats::new(&self.render_set, paint)
    }

    /// Clear the surface. Everything else is kept, so `render` works after it.
    pub fn destroy(&mut self) {
        self.surface.clear();
    }

    /// Mark this canvas stale: later renders and input are ignored.
    pub fn detach(&mut self) {
        if !self.detached {
            tracing::debug!(sheet = %self.sheet.name, "detached canvas");
        }
        self.detached = true;
        self.scroll.detach();
    }

    /// Accept render and input again after [`Self::detach`]. No-op when
    /// already attached; the caller repaints.
    pub fn attach(&mut self) {
        if self.detached {
            tracing::debug!(sheet = %self.sheet.name, "reattached canvas");
        }
        self.detached = false;
        self.scroll.attach();
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Cull at the given offsets, clear, repaint and draw the scrollbars.
    pub fn frame(&mut self, scroll_x: f64, scroll_y: f64) -> RenderStats {
        if self.detached {
            return RenderStats::default();
        }
        self.calculate_render_cells(Some(scroll_x), Some(scroll_y));
        self.destroy();
        let stats = self.render();
        self.scroll.render_scrollbar(&mut self.surface);
        stats
    }

    /// New viewport size in CSS pixels. Offsets are kept and re-clamped.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        validate_viewport(width, height, self.dpr)?;
        self.viewport.resize(width, height);
        self.surface.resize(width, height, self.dpr);
        self.scroll.resize_viewport(width, height);
        let position = self.scroll.position();
        self.viewport.scroll_x = position.scroll_left;
        self.viewport.scroll_y = position.scroll_top;
        self.calculate_render_cells(None, None);
        Ok(())
    }

    /// Wheel input. Returns the repaint stats when a frame was drawn.
    pub fn wheel(&mut self, delta_x: f64, delta_y: f64) -> Option<RenderStats> {
        if self.detached || !self.scroll.on_wheel(delta_x, delta_y) {
            return None;
        }
        Some(self.frame_at_scroll())
    }

    /// Jump to absolute offsets (clamped) and repaint.
    pub fn scroll_to(&mut self, x: f64, y: f64) -> Option<RenderStats> {
        if self.detached || !self.scroll.scroll_to(x, y) {
            return None;
        }
        Some(self.frame_at_scroll())
    }

    /// Returns whether the pointer grabbed a scrollbar thumb.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        !self.detached && self.scroll.pointer_down(x, y)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<RenderStats> {
        if self.detached || !self.scroll.pointer_move(x, y) {
            return None;
        }
        Some(self.frame_at_scroll())
    }

    pub fn pointer_up(&mut self) -> bool {
        self.scroll.pointer_up()
    }

    fn frame_at_scroll(&mut self) -> RenderStats {
        let position = self.scroll.position();
        self.frame(position.scroll_left, position.scroll_top)
    }

    /// Cell painted under surface point `(x, y)` in the last frame.
    ///
    /// Points over the row or column headers hit nothing, even where a
    /// scrolled merged block extends beneath them.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<&CellPaintRecord> {
        if x < self.viewport.header_width || y < self.viewport.header_height {
            return None;
        }
        self.state.records.hit_test(x, y)
    }

    pub fn records(&self) -> &PaintRecords {
        &self.state.records
    }

    /// Every painted cell of the last frame, in paint order.
    pub fn cells_info(&self) -> &[CellPaintRecord] {
        self.state.records.records()
    }

    pub fn render_set(&self) -> &RenderSet {
        &self.render_set
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Content width and height including header offsets
    pub fn content_size(&self) -> (f64, f64) {
        self.content_size
    }

    pub fn geometry(&self) -> &GeometryIndex {
        &self.geometry
    }

    pub fn merges(&self) -> &MergeResolver {
        &self.merges
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn scroll(&self) -> &ScrollController {
        &self.scroll
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollController {
        &mut self.scroll
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Measurement cache `(hits, misses)`
    pub fn measure_stats(&self) -> (u64, u64) {
        self.state.measure.stats()
    }
}

fn validate_viewport(width: f64, height: f64, dpr: f64) -> Result<()> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(GridError::Viewport(format!(
            "viewport must be positive and finite, got {width}x{height}"
        )));
    }
    if !(dpr.is_finite() && dpr > 0.0) {
        return Err(GridError::Viewport(format!(
            "device pixel ratio must be positive and finite, got {dpr}"
        )));
    }
    Ok(())
}
