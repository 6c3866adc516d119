//! Drawing-surface seam.
//!
//! The painter talks to an immediate-mode 2D surface through [`Surface`]:
//! the Canvas 2D context in the browser, or [`super::RecordingSurface`] for
//! headless rendering and tests.

use std::fmt::Write as _;
use std::rc::Rc;

use crate::error::Result;
use crate::units::{pt_to_px, DEFAULT_DPI};

/// Font as handed to the surface
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    /// Size in points
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec {
    pub fn new(family: &str, size: f64) -> Self {
        Self {
            family: family.to_string(),
            size,
            bold: false,
            italic: false,
        }
    }

    /// CSS font shorthand, e.g. `"bold 10pt Arial"`.
    pub fn css(&self) -> String {
        let mut css = String::with_capacity(self.family.len() + 16);
        if self.italic {
            css.push_str("italic ");
        }
        if self.bold {
            css.push_str("bold ");
        }
        let _ = write!(css, "{}pt {}", self.size, self.family);
        css
    }

    /// Em size in CSS pixels (CSS fixes 1pt at 96/72 px).
    pub fn size_px(&self) -> f64 {
        pt_to_px(self.size, DEFAULT_DPI)
    }
}

/// RGBA8 bitmap ready to draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub id: String,
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, `width * height * 4` bytes
    pub pixels: Rc<[u8]>,
}

/// Immediate-mode 2D drawing surface.
///
/// Coordinates are CSS pixels with the origin at the top-left; the surface
/// applies the device pixel ratio itself. Text is always drawn left-aligned
/// with a top baseline at the given point.
pub trait Surface {
    /// Size the backing store for `width` x `height` CSS pixels at `dpr`.
    fn resize(&mut self, width: f64, height: f64, dpr: f64);

    /// Erase everything.
    fn clear(&mut self);

    fn set_font(&mut self, font: &FontSpec);

    fn set_fill_color(&mut self, color: &str);

    fn set_stroke_color(&mut self, color: &str);

    fn set_line_width(&mut self, width: f64);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    /// Advance width of `text` in the current font.
    fn measure_text(&mut self, text: &str) -> f64;

    fn draw_image(
        &mut self,
        image: &DecodedImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()>;
}
