//! Frame painting.
//!
//! [`SheetPainter`] draws the culled cells through the [`Surface`] seam:
//! [`CanvasSurface`] in the browser, [`RecordingSurface`] headless.

pub mod cache;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod images;
pub mod painter;
pub mod recording;
pub mod records;
pub mod surface;
pub mod text;
pub mod wrap;

pub use cache::{MeasureCache, MEASURE_CACHE_CAP};
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use images::{decode_image, ImageStore};
pub use painter::{PaintState, PaintStats, SheetPainter};
pub use recording::{DrawCommand, RecordingSurface};
pub use records::{CellPaintRecord, PaintRecords};
pub use surface::{DecodedImage, FontSpec, Surface};
pub use text::{display_text, format_number, serial_to_date};
pub use wrap::{
    layout_text, CellBox, GlyphPlacement, HorizontalAlign, TextLayout, TextLayoutOptions,
    VerticalAlign,
};
