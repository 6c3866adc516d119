//! Conversions between sheet-native size units and device pixels.
//!
//! Column widths are stored in "character" units (the width of one digit of the
//! default font), row heights in points. Drawing offsets use EMUs.

/// Screen DPI assumed when the host does not supply one.
pub const DEFAULT_DPI: f64 = 96.0;

/// Pixel width of one character unit.
pub const BASE_CHAR_WIDTH: f64 = 7.0;

/// Fixed padding Excel adds to every column, in pixels.
pub const COLUMN_PADDING_PX: f64 = 5.0;

/// Column width used when a column carries no explicit width (character units).
pub const DEFAULT_COLUMN_WIDTH_UNITS: f64 = 8.43;

/// Row height used when a row carries no explicit height (points).
pub const DEFAULT_ROW_HEIGHT_PT: f64 = 15.0;

/// 1 inch = 914400 EMUs, 96 pixels = 1 inch, so 1 pixel = 9525 EMUs
pub const EMU_PER_PIXEL: f64 = 9525.0;

const POINTS_PER_INCH: f64 = 72.0;

/// Convert a column width in character units to whole pixels.
pub fn width_units_to_px(width_units: f64) -> f64 {
    (width_units * BASE_CHAR_WIDTH + COLUMN_PADDING_PX).round()
}

/// Convert a pixel width back to character units.
pub fn px_to_width_units(px: f64) -> f64 {
    (px - COLUMN_PADDING_PX) / BASE_CHAR_WIDTH
}

/// Convert a row height in points to whole pixels at the given DPI.
pub fn height_units_to_px(height_pt: f64, dpi: f64) -> f64 {
    pt_to_px(height_pt, dpi).round()
}

/// Convert points to (fractional) pixels.
pub fn pt_to_px(pt: f64, dpi: f64) -> f64 {
    pt * dpi / POINTS_PER_INCH
}

/// Convert pixels to points.
pub fn px_to_pt(px: f64, dpi: f64) -> f64 {
    px * POINTS_PER_INCH / dpi
}

/// Convert EMUs (English Metric Units) to pixels.
#[allow(clippy::cast_precision_loss)]
pub fn emu_to_px(emu: i64) -> f64 {
    emu as f64 / EMU_PER_PIXEL
}
