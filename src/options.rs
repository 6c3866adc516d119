//! Rendering options.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::types::{ColorSpec, Font, SheetProperties};
use crate::units::{height_units_to_px, DEFAULT_DPI};

/// Options for one mounted grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    /// Draw the row-number column and the column-letter row
    pub show_headers: bool,
    /// Width of the row-number column in pixels
    pub row_header_width: f64,
    /// Inset of the header chrome from the surface edge
    pub origin: f64,
    /// Text inset inside a cell
    pub cell_padding: f64,
    pub scrollbar_thickness: f64,
    /// Shown when there is nothing to draw
    pub empty_message: String,
    /// Header font; also supplies name and size for cells without a font
    pub default_font: Font,
    /// Screen DPI for point to pixel conversion
    pub dpi: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            show_headers: true,
            row_header_width: 50.0,
            origin: 1.0,
            cell_padding: 3.0,
            scrollbar_thickness: 10.0,
            empty_message: "No data on this sheet".to_string(),
            default_font: Font {
                name: Some("Arial".to_string()),
                size: Some(10.0),
                bold: None,
                italic: None,
                color: Some(ColorSpec::argb("FF666666")),
            },
            dpi: DEFAULT_DPI,
        }
    }
}

impl GridOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("rowHeaderWidth", self.row_header_width),
            ("origin", self.origin),
            ("cellPadding", self.cell_padding),
            ("scrollbarThickness", self.scrollbar_thickness),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GridError::Other(format!(
                    "option {name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(GridError::Other(format!("option dpi must be positive, got {}", self.dpi)));
        }
        Ok(())
    }

    /// Width reserved left of the cells
    pub fn header_width(&self) -> f64 {
        if self.show_headers {
            self.row_header_width
        } else {
            0.0
        }
    }

    /// Height reserved above the cells: one default row
    pub fn header_height(&self, properties: &SheetProperties) -> f64 {
        if self.show_headers {
            self.line_height(properties)
        } else {
            0.0
        }
    }

    /// Advance between wrapped text lines: one default row
    pub fn line_height(&self, properties: &SheetProperties) -> f64 {
        height_units_to_px(properties.default_row_height, self.dpi)
    }
}
