//! Merged cells are painted once, from their anchor, at the size of the
//! whole block, no matter which members the viewport intersects.
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

use common::{assert_rect, bare_options, mount_with, painted, record};
use fixtures::SheetBuilder;
use xlgrid::{HAlign, VAlign};

/// Columns A..E at 57px with B1:C1 merged
fn five_columns() -> SheetBuilder {
    (0..5)
        .fold(SheetBuilder::new(), |b, i| b.column_px(i, 57))
        .text("A1", "a")
        .text("B1", "merged")
        .text("D1", "d")
        .text("E1", "e")
        .merge("B1:C1")
}

#[test]
fn only_column_c_visible_still_paints_b1_c1_as_one_block() {
    let mut grid = mount_with(five_columns().build(), 40.0, 100.0, bare_options());
    grid.scroll_to(120.0, 0.0).unwrap();

    assert_eq!(grid.render_set().columns, vec![1, 2]);
    assert_eq!(grid.viewport().scroll_x_diff, 120.0 - 57.0);

    let block = record(&grid, "B1");
    assert_rect(block, -63.0, 0.0, 114.0, 20.0);
    assert_eq!(block.text, "merged");
    assert!(grid.records().by_address("C1").is_none());
}

#[test]
fn merged_block_is_atomic_at_every_scroll_offset() {
    let mut grid = mount_with(five_columns().build(), 40.0, 100.0, bare_options());
    let mut scroll = 0.0;
    while scroll <= 240.0 {
        grid.scroll_to(scroll, 0.0).unwrap();
        let columns = &grid.render_set().columns;
        let touches_block = columns.contains(&1) || columns.contains(&2);
        let blocks: Vec<_> = grid
            .cells_info()
            .iter()
            .filter(|r| r.address == "B1" || r.address == "C1")
            .collect();
        if touches_block {
            assert_eq!(blocks.len(), 1, "scroll {scroll}: {:?}", painted(&grid));
            assert_eq!(blocks[0].address, "B1");
            assert_eq!(blocks[0].width, 114.0);
            // The anchor's left edge sits where column B starts on screen.
            assert_eq!(blocks[0].x, 57.0 - scroll);
        } else {
            assert!(blocks.is_empty(), "scroll {scroll}");
        }
        scroll += 7.0;
    }
}

#[test]
fn two_dimensional_merge_pulls_in_rows_and_columns() {
    let sheet = SheetBuilder::new()
        .grid(10, 6)
        .merge("B2:D5")
        .build();
    let mut grid = mount_with(sheet, 50.0, 10.0, bare_options());
    // Only D5 (col 3 at 192..256, row 4 at 80..100) intersects.
    grid.scroll_to(200.0, 85.0).unwrap();

    let set = grid.render_set().clone();
    assert_eq!(set.columns, vec![1, 2, 3]);
    assert_eq!(set.rows, vec![1, 2, 3, 4]);
    let block = record(&grid, "B2");
    assert_eq!((block.width, block.height), (192.0, 80.0));
    assert_eq!((block.x, block.y), (64.0 - 200.0, 20.0 - 85.0));
    for covered in ["C2", "D3", "B5", "D5"] {
        assert!(grid.records().by_address(covered).is_none(), "{covered}");
    }
}

#[test]
fn chained_merges_close_transitively() {
    // Only row 4 is in view. A3:A4 brings in row 3, which makes B3 a member
    // of B2:B3 in the closed set, so row 2 must come in as well.
    let sheet = SheetBuilder::new()
        .grid(6, 4)
        .merge("A3:A4")
        .merge("B2:B3")
        .build();
    let mut grid = mount_with(sheet, 128.0, 15.0, bare_options());
    grid.scroll_to(0.0, 62.0).unwrap();

    let set = grid.render_set();
    assert_eq!(set.rows, vec![1, 2, 3]);
    assert_eq!(set.columns, vec![0, 1]);
    // Screen rows start at row 2 (offset 20), so row 4 lands at 60 - 62 + 20.
    assert_rect(record(&grid, "A3"), 0.0, -42.0 + 20.0, 64.0, 40.0);
    assert_eq!(record(&grid, "B4").height, 20.0);
    // B2:B3 has no member on screen and paints nothing.
    assert!(grid.records().by_address("B2").is_none());
    assert!(grid.records().by_address("B3").is_none());
}

#[test]
fn whole_column_block_mounts_and_paints_one_record() {
    let sheet = SheetBuilder::new()
        .text("A1", "everything")
        .merge("A1:Z1048576")
        .build();
    let mut grid = mount_with(sheet, 300.0, 100.0, bare_options());
    let block = record(&grid, "A1");
    assert_eq!(block.text, "everything");
    assert_eq!((block.x, block.y), (0.0, 0.0));
    assert!(block.height > 20_000_000.0);
    assert_eq!(grid.cells_info().len(), 1);

    // Deep inside the block only the anchor is painted, from far above.
    grid.scroll_to(640.0, 1_000_000.0).unwrap();
    assert_eq!(grid.cells_info().len(), 1);
    assert_eq!(record(&grid, "A1").y, -1_000_000.0);
}

#[test]
fn hidden_member_column_shrinks_the_block() {
    let sheet = SheetBuilder::new()
        .column_px(0, 57)
        .hidden_column(1)
        .column_px(2, 57)
        .text("A1", "wide")
        .merge("A1:C1")
        .build();
    let grid = mount_with(sheet, 300.0, 100.0, bare_options());
    assert_eq!(grid.render_set().columns, vec![0, 2]);
    assert_eq!(record(&grid, "A1").width, 114.0);
}

#[test]
fn hidden_anchor_column_hands_the_block_to_the_next_member() {
    let sheet = SheetBuilder::new()
        .hidden_column(0)
        .column_px(1, 57)
        .column_px(2, 57)
        .text("A1", "kept")
        .merge("A1:C1")
        .build();
    let grid = mount_with(sheet, 300.0, 100.0, bare_options());
    let block = record(&grid, "A1");
    assert_rect(block, 0.0, 0.0, 114.0, 20.0);
    assert_eq!(block.text, "kept");
    assert_eq!(grid.cells_info().len(), 1);
}

#[test]
fn merged_text_centers_across_the_whole_block() {
    let style = fixtures::StyleBuilder::new()
        .align(HAlign::Center, VAlign::Top)
        .build();
    let sheet = (0..3)
        .fold(SheetBuilder::new(), |b, i| b.column_px(i, 57))
        .styled("A1", "ab", style)
        .merge("A1:B1")
        .build();
    let mut grid = mount_with(sheet, 300.0, 100.0, bare_options());
    common::repaint(&mut grid);
    let glyphs = common::glyphs(&grid);
    // Two 7px glyphs centered in 114px: start at (114 - 14) / 2.
    assert_eq!(glyphs[0], ("a".to_string(), 50.0, 3.0));
    assert_eq!(glyphs[1], ("b".to_string(), 57.0, 3.0));
}
