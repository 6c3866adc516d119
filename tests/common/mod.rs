//! Common test utilities and assertion helpers.
//!
//! Mounts sheets on a headless surface and inspects what was painted.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

// Re-export fixtures for convenience
pub use super::fixtures::*;

use xlgrid::render::{CellPaintRecord, DrawCommand};
use xlgrid::{Callbacks, GridOptions, RecordingSurface, Sheet, SheetCanvas};

pub type TestGrid = SheetCanvas<RecordingSurface>;

/// Mount `sheet` on a `width` x `height` recording surface with default options.
pub fn mount(sheet: Sheet, width: f64, height: f64) -> TestGrid {
    mount_with(sheet, width, height, GridOptions::default())
}

pub fn mount_with(sheet: Sheet, width: f64, height: f64, options: GridOptions) -> TestGrid {
    SheetCanvas::mount(
        sheet,
        RecordingSurface::new(),
        (width, height),
        1.0,
        options,
        Callbacks::default(),
    )
    .expect("sheet should mount")
}

/// Options without header chrome, so cell coordinates start at the origin.
pub fn bare_options() -> GridOptions {
    GridOptions {
        show_headers: false,
        ..GridOptions::default()
    }
}

/// Paint record for an A1 address, panicking with context when missing.
pub fn record<'a>(grid: &'a TestGrid, address: &str) -> &'a CellPaintRecord {
    grid.records()
        .by_address(address)
        .unwrap_or_else(|| panic!("{address} was not painted; painted: {:?}", painted(grid)))
}

/// Addresses painted in the last frame, in paint order.
pub fn painted(grid: &TestGrid) -> Vec<String> {
    grid.cells_info().iter().map(|r| r.address.clone()).collect()
}

pub fn assert_rect(record: &CellPaintRecord, x: f64, y: f64, width: f64, height: f64) {
    assert_eq!(
        (record.x, record.y, record.width, record.height),
        (x, y, width, height),
        "rectangle of {}",
        record.address
    );
}

/// `(text, x, y)` of every glyph drawn since the surface log was last drained.
pub fn glyphs(grid: &TestGrid) -> Vec<(String, f64, f64)> {
    grid.surface()
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::FillText { text, x, y, .. } => Some((text.clone(), *x, *y)),
            _ => None,
        })
        .collect()
}

/// `(text, font, color)` of every glyph drawn since the log was last drained.
pub fn glyph_styles(grid: &TestGrid) -> Vec<(String, String, String)> {
    grid.surface()
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::FillText {
                text, font, color, ..
            } => Some((text.clone(), font.clone(), color.clone())),
            _ => None,
        })
        .collect()
}

/// Clear the draw log and repaint the current frame.
pub fn repaint(grid: &mut TestGrid) {
    grid.surface_mut().take();
    grid.render();
}
