//! Sheet model consumed by the renderer.
//!
//! Produced by an external workbook reader and handed over as JSON or a JS
//! object; the renderer never mutates it.

mod cell;
mod drawing;
mod rich_text;
mod sheet;
mod style;

pub use cell::*;
pub use drawing::*;
pub use rich_text::*;
pub use sheet::*;
pub use style::*;
