//! Test fixtures for building sheet models in memory.
//!
//! # Example
//!
//! ```rust
//! use fixtures::{SheetBuilder, StyleBuilder};
//!
//! let sheet = SheetBuilder::new()
//!     .column_px(1, 57)
//!     .text("B1", "Hello")
//!     .styled("C1", "bold", StyleBuilder::new().bold().build())
//!     .merge("B1:C1")
//!     .build();
//! ```
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

use xlgrid::cell_ref::parse_cell_ref;
use xlgrid::units::BASE_CHAR_WIDTH;
use xlgrid::{
    Alignment, BorderSide, Borders, Cell, CellValue, ColorSpec, Column, EmbeddedImage, Fill, Font,
    HAlign, ImageAnchor, MergeRange, RichTextRun, Row, Sheet, Style, VAlign,
};

// ============================================================================
// Style Builder
// ============================================================================

/// Builder for cell styles.
#[derive(Debug, Clone, Default)]
pub struct StyleBuilder {
    style: Style,
}

impl StyleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn font_mut(&mut self) -> &mut Font {
        self.style.font.get_or_insert_with(Font::default)
    }

    fn alignment_mut(&mut self) -> &mut Alignment {
        self.style.alignment.get_or_insert_with(Alignment::default)
    }

    pub fn bold(mut self) -> Self {
        self.font_mut().bold = Some(true);
        self
    }

    pub fn italic(mut self) -> Self {
        self.font_mut().italic = Some(true);
        self
    }

    pub fn font(mut self, name: &str, size: f64) -> Self {
        let font = self.font_mut();
        font.name = Some(name.to_string());
        font.size = Some(size);
        self
    }

    pub fn font_color(mut self, argb: &str) -> Self {
        self.font_mut().color = Some(ColorSpec::argb(argb));
        self
    }

    pub fn theme_font_color(mut self, theme: u32) -> Self {
        self.font_mut().color = Some(ColorSpec::theme(theme));
        self
    }

    pub fn fill(mut self, argb: &str) -> Self {
        self.style.fill = Some(Fill {
            pattern: Some("solid".to_string()),
            fg_color: Some(ColorSpec::argb(argb)),
        });
        self
    }

    pub fn left_border(mut self, argb: &str) -> Self {
        let borders = self.style.border.get_or_insert_with(Borders::default);
        borders.left = Some(BorderSide {
            style: Some("thin".to_string()),
            color: Some(ColorSpec::argb(argb)),
        });
        self
    }

    pub fn align(mut self, horizontal: HAlign, vertical: VAlign) -> Self {
        let alignment = self.alignment_mut();
        alignment.horizontal = Some(horizontal);
        alignment.vertical = Some(vertical);
        self
    }

    pub fn wrap(mut self) -> Self {
        self.alignment_mut().wrap_text = Some(true);
        self
    }

    pub fn build(self) -> Style {
        self.style
    }
}

// ============================================================================
// Sheet Builder
// ============================================================================

/// Builder for sheet models addressed with A1 references.
#[derive(Debug, Clone, Default)]
pub struct SheetBuilder {
    sheet: Sheet,
}

impl SheetBuilder {
    pub fn new() -> Self {
        Self {
            sheet: Sheet {
                name: "Sheet1".to_string(),
                ..Sheet::default()
            },
        }
    }

    /// Column `index` exactly `px` pixels wide.
    pub fn column_px(mut self, index: u32, px: u32) -> Self {
        let units = (f64::from(px) - 5.0) / BASE_CHAR_WIDTH;
        self.sheet.columns.push(Column::new(index, Some(units)));
        self.sheet.columns.sort_by_key(|c| c.index);
        self
    }

    pub fn hidden_column(mut self, index: u32) -> Self {
        let mut column = Column::new(index, None);
        column.hidden = true;
        self.sheet.columns.push(column);
        self.sheet.columns.sort_by_key(|c| c.index);
        self
    }

    /// Row `index` with a height in points.
    pub fn row_pt(mut self, index: u32, points: f64) -> Self {
        self.sheet.rows.push(Row::new(index, Some(points)));
        self.sheet.rows.sort_by_key(|r| r.index);
        self
    }

    pub fn value(mut self, address: &str, value: CellValue) -> Self {
        let (row, col) = parse_cell_ref(address).expect("valid address");
        self.sheet.cells.push(Cell::new(row, col, value));
        self
    }

    pub fn text(self, address: &str, text: &str) -> Self {
        self.value(address, CellValue::String(text.to_string()))
    }

    pub fn number(self, address: &str, value: f64) -> Self {
        self.value(
            address,
            CellValue::Numeric {
                value,
                date_like: false,
            },
        )
    }

    pub fn date_like(self, address: &str, serial: f64) -> Self {
        self.value(
            address,
            CellValue::Numeric {
                value: serial,
                date_like: true,
            },
        )
    }

    pub fn rich(self, address: &str, runs: Vec<RichTextRun>) -> Self {
        self.value(address, CellValue::RichText(runs))
    }

    pub fn styled(mut self, address: &str, text: &str, style: Style) -> Self {
        let (row, col) = parse_cell_ref(address).expect("valid address");
        self.sheet
            .cells
            .push(Cell::new(row, col, CellValue::String(text.to_string())).with_style(style));
        self
    }

    pub fn merge(mut self, range: &str) -> Self {
        self.sheet
            .merges
            .push(MergeRange::from_ref(range).expect("valid range"));
        self
    }

    /// Embedded image with a base64 payload anchored at `address`.
    pub fn image(mut self, id: &str, data: Option<String>, address: &str) -> Self {
        let (row, col) = parse_cell_ref(address).expect("valid address");
        self.sheet.images.push(EmbeddedImage {
            id: id.to_string(),
            mime_type: Some("image/png".to_string()),
            data,
        });
        self.sheet.image_anchors.push(ImageAnchor {
            image_id: id.to_string(),
            from_row: row,
            from_col: col,
            from_col_off: 0,
            from_row_off: 0,
            extent_cx: None,
            extent_cy: None,
        });
        self
    }

    /// Filled grid of `rows` x `cols` text cells named after their address.
    pub fn grid(mut self, rows: u32, cols: u32) -> Self {
        for row in 0..rows {
            for col in 0..cols {
                let address = xlgrid::cell_ref::format_address(row, col);
                self.sheet
                    .cells
                    .push(Cell::new(row, col, CellValue::String(address)));
            }
        }
        self
    }

    pub fn build(self) -> Sheet {
        self.sheet
    }
}

/// Base64 PNG of a solid `width` x `height` image.
pub fn png_base64(width: u32, height: u32) -> String {
    use base64::Engine as _;
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 128, 255, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageOutputFormat::Png,
        )
        .unwrap();
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
