//! Text layout, header chrome, images and the paint lifecycle as seen on a
//! recording surface.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

mod common;
mod fixtures;

use common::{bare_options, glyph_styles, glyphs, mount, mount_with, record, repaint};
use fixtures::{png_base64, SheetBuilder, StyleBuilder};
use xlgrid::render::DrawCommand;
use xlgrid::{Font, HAlign, RichTextRun, Sheet, VAlign};

fn glyph(text: &str, x: f64, y: f64) -> (String, f64, f64) {
    (text.to_string(), x, y)
}

/// One 30px wide, 80px tall cell holding `text`.
fn narrow_cell(text: &str) -> SheetBuilder {
    SheetBuilder::new().column_px(0, 30).row_pt(0, 60.0).text("A1", text)
}

#[test]
fn ascii_wraps_at_the_character_that_crosses_the_edge() {
    let grid = mount_with(narrow_cell("abcdefgh").build(), 200.0, 100.0, bare_options());
    assert_eq!(
        glyphs(&grid),
        vec![
            glyph("a", 3.0, 3.0),
            glyph("b", 10.0, 3.0),
            glyph("c", 17.0, 3.0),
            glyph("d", 3.0, 23.0),
            glyph("e", 10.0, 23.0),
            glyph("f", 17.0, 23.0),
            glyph("g", 3.0, 43.0),
            glyph("h", 10.0, 43.0),
        ]
    );
}

#[test]
fn wide_glyphs_wrap_by_their_own_width() {
    let grid = mount_with(narrow_cell("负责人").build(), 200.0, 100.0, bare_options());
    assert_eq!(
        glyphs(&grid),
        vec![
            glyph("负", 3.0, 3.0),
            glyph("责", 16.0, 3.0),
            glyph("人", 3.0, 23.0),
        ]
    );
}

#[test]
fn explicit_newlines_start_new_lines() {
    let grid = mount_with(narrow_cell("ab\ncd").build(), 200.0, 100.0, bare_options());
    assert_eq!(
        glyphs(&grid),
        vec![
            glyph("a", 3.0, 3.0),
            glyph("b", 10.0, 3.0),
            glyph("c", 3.0, 23.0),
            glyph("d", 10.0, 23.0),
        ]
    );
}

#[test]
fn layout_is_identical_across_repaints() {
    let mut grid = mount_with(
        narrow_cell("负责人 abc 123").build(),
        200.0,
        100.0,
        bare_options(),
    );
    let first = glyphs(&grid);
    repaint(&mut grid);
    assert_eq!(glyphs(&grid), first);
    grid.surface_mut().take();
    grid.scroll_to(0.0, 0.0).unwrap();
    assert_eq!(glyphs(&grid), first);
}

fn aligned(horizontal: HAlign, vertical: VAlign) -> Vec<(String, f64, f64)> {
    let sheet = SheetBuilder::new()
        .row_pt(0, 60.0)
        .styled("A1", "ab", StyleBuilder::new().align(horizontal, vertical).build())
        .build();
    glyphs(&mount_with(sheet, 200.0, 100.0, bare_options()))
}

#[test]
fn horizontal_alignment_moves_the_line_start() {
    assert_eq!(
        aligned(HAlign::Left, VAlign::Top),
        vec![glyph("a", 3.0, 3.0), glyph("b", 10.0, 3.0)]
    );
    // 64px cell, 14px line.
    assert_eq!(
        aligned(HAlign::Center, VAlign::Top),
        vec![glyph("a", 25.0, 3.0), glyph("b", 32.0, 3.0)]
    );
    assert_eq!(
        aligned(HAlign::Right, VAlign::Top),
        vec![glyph("a", 47.0, 3.0), glyph("b", 54.0, 3.0)]
    );
}

#[test]
fn vertical_alignment_moves_the_block() {
    // 80px cell, one 20px line.
    assert_eq!(
        aligned(HAlign::Left, VAlign::Middle),
        vec![glyph("a", 3.0, 33.0), glyph("b", 10.0, 33.0)]
    );
    assert_eq!(
        aligned(HAlign::Left, VAlign::Bottom),
        vec![glyph("a", 3.0, 57.0), glyph("b", 10.0, 57.0)]
    );
}

#[test]
fn rich_text_switches_fonts_per_character() {
    let red_bold = Font {
        bold: Some(true),
        color: Some(xlgrid::ColorSpec {
            argb: Some("FFFF0000".to_string()),
            theme: None,
        }),
        ..Font::default()
    };
    let sheet = SheetBuilder::new()
        .rich(
            "A1",
            vec![
                RichTextRun::plain("ab"),
                RichTextRun::with_font("C", red_bold),
                RichTextRun::plain("d"),
            ],
        )
        .build();
    let grid = mount_with(sheet, 200.0, 100.0, bare_options());
    assert_eq!(record(&grid, "A1").text, "abCd");

    let styles = glyph_styles(&grid);
    let plain = ("10pt Arial".to_string(), "#000000".to_string());
    let emphasised = ("bold 10pt Arial".to_string(), "#FF0000".to_string());
    let fonts: Vec<_> = styles.into_iter().map(|(_, font, color)| (font, color)).collect();
    assert_eq!(fonts, vec![plain.clone(), plain.clone(), emphasised, plain]);
}

#[test]
fn run_fonts_inherit_unset_fields_from_the_cell() {
    let style = StyleBuilder::new().font("Calibri", 12.0).italic().build();
    let mut sheet = SheetBuilder::new().styled("A1", "", style).build();
    sheet.cells[0].value = xlgrid::CellValue::RichText(vec![
        RichTextRun::plain("x"),
        RichTextRun::with_font(
            "y",
            Font {
                bold: Some(true),
                ..Font::default()
            },
        ),
    ]);
    let grid = mount_with(sheet, 200.0, 100.0, bare_options());
    let fonts: Vec<String> = glyph_styles(&grid).into_iter().map(|(_, font, _)| font).collect();
    assert_eq!(fonts, vec!["italic 12pt Calibri", "italic bold 12pt Calibri"]);
}

#[test]
fn headers_label_rows_and_columns() {
    let grid = mount(SheetBuilder::new().grid(3, 3).build(), 400.0, 200.0);
    let texts = grid.surface().texts();
    for label in ["1", "2", "3", "A", "B", "C"] {
        assert!(texts.contains(&label), "missing header {label}: {texts:?}");
    }
    // Cells start right of the row header and below the column header.
    let a1 = record(&grid, "A1");
    assert_eq!((a1.x, a1.y), (50.0, 20.0));
}

#[test]
fn empty_sheet_shows_only_the_message() {
    let grid = mount(Sheet::default(), 400.0, 200.0);
    assert_eq!(grid.surface().texts(), vec!["No data on this sheet"]);
    assert!(grid.records().is_empty());
    assert_eq!(grid.render_set().rows.len(), 0);
}

#[test]
fn custom_empty_message() {
    let options = xlgrid::GridOptions {
        empty_message: "Nothing here".to_string(),
        ..bare_options()
    };
    let grid = mount_with(Sheet::default(), 400.0, 200.0, options);
    assert_eq!(grid.surface().texts(), vec!["Nothing here"]);
}

#[test]
fn images_are_drawn_at_their_anchor_cell() {
    let sheet = SheetBuilder::new()
        .grid(4, 4)
        .image("logo", Some(png_base64(4, 3)), "B2")
        .build();
    let mut grid = mount_with(sheet, 400.0, 200.0, bare_options());
    let stats = grid.render();
    assert_eq!(stats.images_drawn, 1);
    assert_eq!(stats.images_skipped, 0);

    let draws: Vec<_> = grid
        .surface()
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::DrawImage {
                id, x, y, width, height,
            } => Some((id.clone(), *x, *y, *width, *height)),
            _ => None,
        })
        .collect();
    let b2 = record(&grid, "B2");
    assert_eq!(draws.last(), Some(&("logo".to_string(), b2.x, b2.y, 4.0, 3.0)));
}

#[test]
fn undecodable_images_are_skipped_without_failing_the_frame() {
    let sheet = SheetBuilder::new()
        .grid(2, 2)
        .image("broken", Some("not base64 at all!".to_string()), "A1")
        .image("missing", None, "B1")
        .build();
    let mut grid = mount_with(sheet, 400.0, 200.0, bare_options());
    let stats = grid.render();
    assert_eq!(stats.images_drawn, 0);
    assert_eq!(stats.images_skipped, 2);
    assert_eq!(record(&grid, "A1").text, "A1");
}

#[test]
fn destroy_clears_and_render_repaints() {
    let mut grid = mount_with(
        SheetBuilder::new().text("A1", "hi").build(),
        200.0,
        100.0,
        bare_options(),
    );
    grid.surface_mut().take();
    grid.destroy();
    assert_eq!(grid.surface().commands(), &[DrawCommand::Clear]);
    assert!(glyphs(&grid).is_empty());

    grid.render();
    let texts: Vec<_> = glyphs(&grid).into_iter().map(|(t, _, _)| t).collect();
    assert_eq!(texts, vec!["h", "i"]);
}

#[test]
fn detached_grids_stop_painting() {
    let mut grid = mount_with(
        SheetBuilder::new().text("A1", "hi").build(),
        200.0,
        100.0,
        bare_options(),
    );
    grid.detach();
    grid.surface_mut().take();
    assert_eq!(grid.render().cells_painted, 0);
    assert!(grid.wheel(0.0, 10.0).is_none());
    assert!(grid.surface().commands().is_empty());
}
