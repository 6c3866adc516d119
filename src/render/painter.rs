//! Cell painter.
//!
//! Paints one frame over the culled rows and columns: backgrounds and
//! borders, text laid out glyph by glyph, anchored images, then the header
//! chrome on top. Every painted cell is recorded for hit-testing.

use std::collections::HashSet;

use crate::cell_ref::{col_to_letter, format_address};
use crate::color::{font_color, palette, Rgb};
use crate::layout::{GeometryIndex, MergeResolver, MergeRole, RenderSet, Viewport};
use crate::options::GridOptions;
use crate::types::{Cell, CellIndex, Font, HAlign, MergeRange, RunSpans, Sheet, VAlign};
use crate::units::emu_to_px;

use super::cache::MeasureCache;
use super::images::ImageStore;
use super::records::{CellPaintRecord, PaintRecords};
use super::surface::{FontSpec, Surface};
use super::text::display_text;
use super::wrap::{
    layout_text, CellBox, HorizontalAlign, TextLayoutOptions, VerticalAlign,
};

const FALLBACK_FONT_NAME: &str = "Arial";
const FALLBACK_FONT_SIZE: f64 = 10.0;

/// Counters for one painted frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintStats {
    /// Cells and merged blocks painted
    pub cells_painted: usize,
    pub glyphs_drawn: usize,
    pub images_drawn: usize,
    /// Images whose payload was missing or failed to decode or draw
    pub images_skipped: usize,
    /// Images whose anchor cell was not painted this frame
    pub images_culled: usize,
}

/// Caches and outputs that outlive a single frame
#[derive(Debug, Default)]
pub struct PaintState {
    pub measure: MeasureCache,
    pub images: ImageStore,
    pub records: PaintRecords,
}

/// Font plus fill color for a run of glyphs
#[derive(Debug, Clone, PartialEq)]
struct ResolvedFont {
    spec: FontSpec,
    css: String,
    color: String,
}

impl ResolvedFont {
    fn new(spec: FontSpec, color: String) -> Self {
        let css = spec.css();
        Self { spec, css, color }
    }
}

/// Read-only inputs of the painter
pub struct SheetPainter<'a> {
    pub sheet: &'a Sheet,
    pub cells: &'a CellIndex,
    pub geometry: &'a GeometryIndex,
    pub merges: &'a MergeResolver,
    pub options: &'a GridOptions,
}

impl SheetPainter<'_> {
    /// Paint one frame. Records are rebuilt from empty.
    pub fn paint<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        viewport: &Viewport,
        set: &RenderSet,
        state: &mut PaintState,
    ) -> PaintStats {
        let _span = tracing::debug_span!(
            "render_frame",
            rows = set.rows.len(),
            columns = set.columns.len()
        )
        .entered();

        state.records.clear();
        let mut stats = PaintStats::default();

        if set.is_empty() {
            self.paint_empty_state(surface, viewport, &mut state.measure);
            return stats;
        }

        let xs = self.column_positions(viewport, set);
        let ys = self.row_positions(viewport, set);
        let mut painted_merges = HashSet::new();

        for &(row, y, row_height) in &ys {
            for &(col, x, col_width) in &xs {
                let ((row, col), cell_box) = match self.merges.role(row, col) {
                    MergeRole::Single => (
                        (row, col),
                        CellBox {
                            left: x,
                            top: y,
                            width: col_width,
                            height: row_height,
                        },
                    ),
                    // The block paints once, at its first visible member.
                    MergeRole::Anchor(m) | MergeRole::Covered(m) => {
                        if !painted_merges.insert(m) {
                            continue;
                        }
                        let Some(cell_box) = self.merge_box(viewport, set, &m) else {
                            continue;
                        };
                        ((m.start_row, m.start_col), cell_box)
                    }
                };
                let cell = self.cells.get(self.sheet, row, col);
                let text = self.paint_cell(surface, cell, cell_box, &mut state.measure, &mut stats);
                state.records.push(CellPaintRecord {
                    address: format_address(row, col),
                    row,
                    col,
                    x: cell_box.left,
                    y: cell_box.top,
                    width: cell_box.width,
                    height: cell_box.height,
                    text,
                });
                stats.cells_painted += 1;
            }
        }

        self.paint_images(surface, state, &mut stats);

        if self.options.show_headers {
            self.paint_headers(surface, viewport, &xs, &ys, &mut state.measure);
        }

        tracing::debug!(
            cells = stats.cells_painted,
            glyphs = stats.glyphs_drawn,
            images = stats.images_drawn,
            images_skipped = stats.images_skipped,
            "painted frame"
        );
        stats
    }

    /// Screen box of a merged block, placed at its first visible member.
    fn merge_box(&self, viewport: &Viewport, set: &RenderSet, merge: &MergeRange) -> Option<CellBox> {
        let (row, col) = self.first_visible_member(merge)?;
        let (rows, columns) = (&self.geometry.rows, &self.geometry.columns);
        let first_col = set.columns.first().and_then(|&c| columns.offset_of(c)).unwrap_or(0.0);
        let first_row = set.rows.first().and_then(|&r| rows.offset_of(r)).unwrap_or(0.0);
        Some(CellBox {
            left: viewport.header_width - viewport.scroll_x_diff + (columns.offset_of(col)? - first_col),
            top: viewport.header_height - viewport.scroll_y_diff + (rows.offset_of(row)? - first_row),
            width: columns.span(merge.start_col, merge.end_col),
            height: rows.span(merge.start_row, merge.end_row),
        })
    }

    /// Top-left member of `merge` that exists on both axes.
    fn first_visible_member(&self, merge: &MergeRange) -> Option<(u32, u32)> {
        let row = self.geometry.rows.first_in(merge.start_row, merge.end_row)?;
        let col = self.geometry.columns.first_in(merge.start_col, merge.end_col)?;
        Some((row, col))
    }

    /// `(index, screen x, width)` of each column intersecting the cell area.
    fn column_positions(&self, viewport: &Viewport, set: &RenderSet) -> Vec<(u32, f64, f64)> {
        let axis = &self.geometry.columns;
        let first = set.columns.first().and_then(|&c| axis.offset_of(c)).unwrap_or(0.0);
        let on_screen = axis.visible_range(viewport.scroll_x, viewport.cell_area_width());
        axis.items()
            .get(on_screen)
            .unwrap_or_default()
            .iter()
            .map(|item| {
                let x = viewport.header_width - viewport.scroll_x_diff + (item.offset - first);
                (item.index, x, item.size)
            })
            .collect()
    }

    /// `(index, screen y, height)` of each row intersecting the cell area.
    fn row_positions(&self, viewport: &Viewport, set: &RenderSet) -> Vec<(u32, f64, f64)> {
        let axis = &self.geometry.rows;
        let first = set.rows.first().and_then(|&r| axis.offset_of(r)).unwrap_or(0.0);
        let on_screen = axis.visible_range(viewport.scroll_y, viewport.cell_area_height());
        axis.items()
            .get(on_screen)
            .unwrap_or_default()
            .iter()
            .map(|item| {
                let y = viewport.header_height - viewport.scroll_y_diff + (item.offset - first);
                (item.index, y, item.size)
            })
            .collect()
    }

    /// Background, border and text of one cell. Returns the display text.
    fn paint_cell<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        cell: Option<&Cell>,
        cell_box: CellBox,
        measure: &mut MeasureCache,
        stats: &mut PaintStats,
    ) -> String {
        let style = cell.and_then(|c| c.style.as_ref());

        let background = style
            .and_then(|s| s.fill.as_ref())
            .and_then(|f| f.fg_color.as_ref())
            .and_then(|c| c.argb.as_deref())
            .and_then(Rgb::from_argb)
            .map_or_else(|| palette::CELL_BACKGROUND.to_string(), Rgb::to_css);
        let stroke = style
            .and_then(|s| s.border.as_ref())
            .and_then(|b| b.stroke_color())
            .and_then(Rgb::from_argb)
            .map_or_else(|| palette::GRID_LINE.to_string(), Rgb::to_css);

        surface.set_fill_color(&background);
        surface.fill_rect(cell_box.left, cell_box.top, cell_box.width, cell_box.height);
        surface.set_stroke_color(&stroke);
        surface.set_line_width(1.0);
        surface.stroke_rect(cell_box.left, cell_box.top, cell_box.width, cell_box.height);

        let Some(cell) = cell else {
            return String::new();
        };
        let text = display_text(&cell.value);
        if text.is_empty() {
            return text;
        }

        let base = style.and_then(|s| s.font.as_ref());
        let link = cell.value.is_hyperlink();
        let mut fonts = vec![self.resolve_font(base, None, link)];
        let spans = cell.value.runs().map(|runs| {
            fonts.extend(
                runs.iter()
                    .map(|run| self.resolve_font(base, run.font.as_ref(), link)),
            );
            RunSpans::new(runs)
        });
        // Font slot for a character: 0 is the cell font, i + 1 is run i.
        let slot_of = |index: usize| -> usize {
            spans
                .as_ref()
                .and_then(|s| s.run_at(index))
                .map_or(0, |run| run + 1)
        };

        let alignment = style.and_then(|s| s.alignment.as_ref());
        let horizontal = match alignment.and_then(|a| a.horizontal) {
            Some(HAlign::Center | HAlign::CenterContinuous) => HorizontalAlign::Center,
            Some(HAlign::Right) => HorizontalAlign::Right,
            _ => HorizontalAlign::Left,
        };
        let vertical = match alignment.and_then(|a| a.vertical) {
            Some(VAlign::Middle) => VerticalAlign::Middle,
            Some(VAlign::Bottom) => VerticalAlign::Bottom,
            _ => VerticalAlign::Top,
        };
        let layout_options = TextLayoutOptions {
            horizontal,
            vertical,
            padding: self.options.cell_padding,
            line_height: self.options.line_height(&self.sheet.properties),
        };

        let layout = layout_text(&text, cell_box, layout_options, |index, ch| {
            let font = fonts.get(slot_of(index)).or(fonts.first());
            font.map_or(0.0, |font| measure_char(surface, measure, font, ch))
        });

        let mut current: Option<usize> = None;
        let mut buf = [0u8; 4];
        for glyph in &layout.glyphs {
            let slot = slot_of(glyph.index);
            if current != Some(slot) {
                if let Some(font) = fonts.get(slot) {
                    surface.set_font(&font.spec);
                    surface.set_fill_color(&font.color);
                }
                current = Some(slot);
            }
            surface.fill_text(glyph.ch.encode_utf8(&mut buf), glyph.x, glyph.y);
            stats.glyphs_drawn += 1;
        }
        text
    }

    /// Merge a run font over the cell font over the defaults.
    fn resolve_font(&self, base: Option<&Font>, run: Option<&Font>, link: bool) -> ResolvedFont {
        let defaults = &self.options.default_font;
        let family = run
            .and_then(|f| f.name.as_deref())
            .or_else(|| base.and_then(|f| f.name.as_deref()))
            .or(defaults.name.as_deref())
            .unwrap_or(FALLBACK_FONT_NAME);
        let size = run
            .and_then(|f| f.size)
            .or_else(|| base.and_then(|f| f.size))
            .or(defaults.size)
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(FALLBACK_FONT_SIZE);
        let bold = run.and_then(|f| f.bold).or_else(|| base.and_then(|f| f.bold));
        let italic = run
            .and_then(|f| f.italic)
            .or_else(|| base.and_then(|f| f.italic));
        let spec = FontSpec {
            family: family.to_string(),
            size,
            bold: bold.unwrap_or(false),
            italic: italic.unwrap_or(false),
        };

        let color = run
            .and_then(|f| f.color.as_ref())
            .or_else(|| base.and_then(|f| f.color.as_ref()));
        let color = match color {
            Some(c) => font_color(Some(c)),
            None if link => palette::HYPERLINK.to_string(),
            None => palette::BLACK.to_string(),
        };
        ResolvedFont::new(spec, color)
    }

    fn header_font(&self) -> ResolvedFont {
        let defaults = &self.options.default_font;
        let spec = FontSpec {
            family: defaults
                .name
                .clone()
                .unwrap_or_else(|| FALLBACK_FONT_NAME.to_string()),
            size: defaults.size.unwrap_or(FALLBACK_FONT_SIZE),
            bold: defaults.bold.unwrap_or(false),
            italic: defaults.italic.unwrap_or(false),
        };
        let color = if defaults.color.is_some() {
            font_color(defaults.color.as_ref())
        } else {
            palette::HEADER_TEXT.to_string()
        };
        ResolvedFont::new(spec, color)
    }

    /// Draw images over their anchor cells' recorded rectangles.
    fn paint_images<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        state: &mut PaintState,
        stats: &mut PaintStats,
    ) {
        for anchor in &self.sheet.image_anchors {
            let Some(record) = state.records.get(anchor.from_row, anchor.from_col) else {
                stats.images_culled += 1;
                continue;
            };
            let Some(image) = self
                .sheet
                .images
                .iter()
                .find(|img| img.id == anchor.image_id)
            else {
                tracing::warn!(id = %anchor.image_id, "anchor references unknown image");
                stats.images_skipped += 1;
                continue;
            };
            let Some(decoded) = state.images.get_or_decode(image) else {
                stats.images_skipped += 1;
                continue;
            };
            let x = record.x + emu_to_px(anchor.from_col_off);
            let y = record.y + emu_to_px(anchor.from_row_off);
            let width = anchor
                .extent_cx
                .map_or_else(|| f64::from(decoded.width), emu_to_px);
            let height = anchor
                .extent_cy
                .map_or_else(|| f64::from(decoded.height), emu_to_px);
            match surface.draw_image(&decoded, x, y, width, height) {
                Ok(()) => stats.images_drawn += 1,
                Err(err) => {
                    tracing::warn!(id = %anchor.image_id, error = %err, "failed to draw image");
                    stats.images_skipped += 1;
                }
            }
        }
    }

    /// Row numbers, column letters and the corner box, drawn over the cells.
    fn paint_headers<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        viewport: &Viewport,
        xs: &[(u32, f64, f64)],
        ys: &[(u32, f64, f64)],
        measure: &mut MeasureCache,
    ) {
        let origin = self.options.origin;
        let header_w = (viewport.header_width - origin).max(0.0);
        let header_h = (viewport.header_height - origin).max(0.0);
        let font = self.header_font();
        let line_height = self.options.line_height(&self.sheet.properties);

        surface.set_line_width(1.0);
        surface.set_stroke_color(palette::HEADER_BORDER);

        for &(row, y, height) in ys {
            let label_box = CellBox {
                left: origin,
                top: y,
                width: header_w,
                height,
            };
            let label = (u64::from(row) + 1).to_string();
            self.paint_header_box(surface, label_box, &label, &font, line_height, measure);
        }
        for &(col, x, width) in xs {
            let label_box = CellBox {
                left: x,
                top: origin,
                width,
                height: header_h,
            };
            self.paint_header_box(surface, label_box, &col_to_letter(col), &font, line_height, measure);
        }

        surface.set_fill_color(palette::HEADER_BACKGROUND);
        surface.fill_rect(origin, origin, header_w, header_h);
        surface.stroke_rect(origin, origin, header_w, header_h);
    }

    fn paint_header_box<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        label_box: CellBox,
        label: &str,
        font: &ResolvedFont,
        line_height: f64,
        measure: &mut MeasureCache,
    ) {
        surface.set_fill_color(palette::HEADER_BACKGROUND);
        surface.fill_rect(label_box.left, label_box.top, label_box.width, label_box.height);
        surface.stroke_rect(label_box.left, label_box.top, label_box.width, label_box.height);

        let text_width: f64 = label
            .chars()
            .map(|ch| measure_char(surface, measure, font, ch))
            .sum();
        let x = label_box.left + ((label_box.width - text_width) / 2.0).max(0.0);
        let y = label_box.top + ((label_box.height - line_height) / 2.0).max(0.0) + self.options.cell_padding;
        surface.set_font(&font.spec);
        surface.set_fill_color(&font.color);
        surface.fill_text(label, x, y);
    }

    fn paint_empty_state<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        viewport: &Viewport,
        measure: &mut MeasureCache,
    ) {
        let message = &self.options.empty_message;
        if message.is_empty() {
            return;
        }
        let font = ResolvedFont::new(self.header_font().spec, palette::EMPTY_STATE_TEXT.to_string());
        let width: f64 = message
            .chars()
            .map(|ch| measure_char(surface, measure, &font, ch))
            .sum();
        let line_height = self.options.line_height(&self.sheet.properties);
        let x = ((viewport.width - width) / 2.0).max(0.0);
        let y = ((viewport.height - line_height) / 2.0).max(0.0);
        surface.set_font(&font.spec);
        surface.set_fill_color(&font.color);
        surface.fill_text(message, x, y);
    }
}

/// Rounded advance of one character, cached per font.
fn measure_char<S: Surface + ?Sized>(
    surface: &mut S,
    cache: &mut MeasureCache,
    font: &ResolvedFont,
    ch: char,
) -> f64 {
    let mut buf = [0u8; 4];
    let text: &str = ch.encode_utf8(&mut buf);
    cache
        .get_or_measure(&font.css, text, || {
            surface.set_font(&font.spec);
            surface.measure_text(text)
        })
        .round()
}
