//! Color resolution utilities
//!
//! Converts packed ARGB hex strings and theme indices from the sheet model into
//! CSS color strings that any 2D surface accepts.

use crate::types::ColorSpec;

/// Theme palette used for font colors given as a theme index.
///
/// Index order follows the workbook theme: lt1, dk1, lt2, dk2, accent1-5.
pub const THEME_COLORS: [&str; 9] = [
    "#FFFFFF", "#000000", "#E7E6E6", "#44546A", "#4472C4", "#ED7D31", "#A5A5A5", "#FFC000",
    "#5B9BD5",
];

/// Fixed colors used by the grid chrome.
pub mod palette {
    pub const BLACK: &str = "#000000";
    pub const CELL_BACKGROUND: &str = "#ffffff";
    pub const GRID_LINE: &str = "#cccccc";
    pub const HEADER_BACKGROUND: &str = "#eeeeee";
    pub const HEADER_BORDER: &str = "#cccccc";
    pub const HEADER_TEXT: &str = "#666666";
    pub const HYPERLINK: &str = "#0563C1";
    pub const SCROLLBAR_TRACK: &str = "#e0e0e0";
    pub const SCROLLBAR_THUMB: &str = "#b0b0b0";
    pub const EMPTY_STATE_TEXT: &str = "#999999";
}

/// RGB color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `AARRGGBB` or `RRGGBB` (with or without `#`). The alpha byte is ignored.
    pub fn from_argb(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        let rgb = match hex.len() {
            8 => hex.get(2..)?,
            6 => hex,
            _ => return None,
        };
        let r = u8::from_str_radix(rgb.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(rgb.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(rgb.get(4..6)?, 16).ok()?;
        Some(Self { r, g, b })
    }

    /// CSS functional notation, `rgb(r, g, b)`.
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// Convert to CSS hex string (#RRGGBB).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Convert a packed ARGB string to a CSS color. Missing or malformed input is black.
pub fn argb_to_css(argb: Option<&str>) -> String {
    argb.and_then(Rgb::from_argb)
        .unwrap_or_default()
        .to_css()
}

/// Resolve a theme index against [`THEME_COLORS`].
pub fn theme_color(index: u32) -> Option<&'static str> {
    THEME_COLORS.get(usize::try_from(index).ok()?).copied()
}

/// Resolve a font color. Theme index wins over ARGB; anything unresolvable is black.
pub fn font_color(color: Option<&ColorSpec>) -> String {
    let Some(color) = color else {
        return palette::BLACK.to_string();
    };
    if let Some(theme) = color.theme {
        return theme_color(theme).unwrap_or(palette::BLACK).to_string();
    }
    color
        .argb
        .as_deref()
        .and_then(Rgb::from_argb)
        .map_or_else(|| palette::BLACK.to_string(), Rgb::to_hex)
}
