//! xlgrid - virtualized spreadsheet grid rendering
//!
//! Draws a parsed worksheet model onto a 2D surface, painting only the rows
//! and columns that intersect the viewport:
//! - Geometry index with slice checkpoints for fast scroll seeding
//! - Merged cells drawn once from their anchor, even when partly scrolled out
//! - Character-granular text wrapping, rich text, hyperlinks, images
//! - Scrollbars with wheel and thumb-drag input
//! - Canvas 2D in the browser, a recording surface natively
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridView } from 'xlgrid';
//! await init();
//! const view = new GridView(canvas, 800, 600, window.devicePixelRatio);
//! view.setOnInitLoad(() => console.log('ready'));
//! view.load(JSON.stringify(sheet));
//! ```
//!
//! # Usage (Rust)
//!
//! ```
//! use xlgrid::{Callbacks, GridOptions, RecordingSurface, Sheet, SheetCanvas};
//!
//! let sheet = Sheet::from_json(r#"{"cells": [{"row": 0, "col": 0, "value": {"kind": "string", "data": "hi"}}]}"#)?;
//! let mut grid = SheetCanvas::mount(
//!     sheet,
//!     RecordingSurface::new(),
//!     (400.0, 300.0),
//!     1.0,
//!     GridOptions::default(),
//!     Callbacks::default(),
//! )?;
//! assert_eq!(grid.records().get(0, 0).map(|r| r.text.as_str()), Some("hi"));
//! grid.wheel(0.0, 40.0);
//! # Ok::<(), xlgrid::GridError>(())
//! ```

pub mod cell_ref;
pub mod color;
pub mod error;
pub mod layout;
pub mod options;
pub mod render;
pub mod types;
pub mod units;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use error::{GridError, Result};
pub use layout::{calculate_render_cells, GeometryIndex, MergeResolver, RenderSet, Viewport};
pub use options::GridOptions;
pub use render::{PaintRecords, RecordingSurface, SheetPainter, Surface};
pub use types::*;
pub use viewer::{Callbacks, RenderStats, ScrollController, SheetCanvas};

#[cfg(target_arch = "wasm32")]
pub use viewer::GridView;

/// Validate a sheet model given as JSON
///
/// # Errors
/// Returns the validation message if the model is malformed.
#[wasm_bindgen(js_name = "validateSheet")]
pub fn validate_sheet(json: &str) -> std::result::Result<(), JsValue> {
    Sheet::from_json(json)
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
