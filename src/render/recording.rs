//! Headless surface that records every draw call.
//!
//! Used by the CLI, benchmarks and tests. Text is measured from Unicode
//! display widths: a narrow glyph is half an em, a wide (CJK) glyph a full em.

use serde::Serialize;
use unicode_width::UnicodeWidthChar;

use super::surface::{DecodedImage, FontSpec, Surface};
use crate::color::palette;
use crate::error::Result;

/// One recorded draw call, with the state it was drawn in
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    Resize {
        width: f64,
        height: f64,
        dpr: f64,
    },
    Clear,
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
    },
    StrokeRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
        line_width: f64,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        font: String,
        color: String,
    },
    DrawImage {
        id: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// Surface that keeps a log of draw commands instead of pixels
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    font: FontSpec,
    fill: String,
    stroke: String,
    line_width: f64,
    /// Backing store size in device pixels
    pixel_size: (f64, f64),
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            font: FontSpec::new("Arial", 10.0),
            fill: palette::BLACK.to_string(),
            stroke: palette::BLACK.to_string(),
            line_width: 1.0,
            pixel_size: (0.0, 0.0),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the log.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Backing store size in device pixels after the last resize
    pub fn pixel_size(&self) -> (f64, f64) {
        self.pixel_size
    }

    /// Text of every `FillText` in draw order, one entry per call
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every `FillRect` drawn in `color`, as `(x, y, width, height)`
    pub fn fill_rects(&self, color: &str) -> Vec<(f64, f64, f64, f64)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect {
                    x,
                    y,
                    width,
                    height,
                    color: c,
                } if c == color => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .collect()
    }
}

/// Display width of one glyph in CSS pixels for an em of `size_px`.
pub fn glyph_width(ch: char, size_px: f64) -> f64 {
    let columns = ch.width().unwrap_or(0);
    f64::from(u32::try_from(columns).unwrap_or(0)) * size_px / 2.0
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.pixel_size = ((width * dpr).round(), (height * dpr).round());
        self.commands.push(DrawCommand::Resize { width, height, dpr });
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.font.clone_from(font);
    }

    fn set_fill_color(&mut self, color: &str) {
        color.clone_into(&mut self.fill);
    }

    fn set_stroke_color(&mut self, color: &str) {
        color.clone_into(&mut self.stroke);
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color: self.fill.clone(),
        });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::StrokeRect {
            x,
            y,
            width,
            height,
            color: self.stroke.clone(),
            line_width: self.line_width,
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
            font: self.font.css(),
            color: self.fill.clone(),
        });
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        let size_px = self.font.size_px();
        text.chars().map(|ch| glyph_width(ch, size_px)).sum()
    }

    fn draw_image(
        &mut self,
        image: &DecodedImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        self.commands.push(DrawCommand::DrawImage {
            id: image.id.clone(),
            x,
            y,
            width,
            height,
        });
        Ok(())
    }
}
