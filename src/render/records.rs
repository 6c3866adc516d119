//! Per-frame table of painted cells, for hit-testing and image anchoring.

use std::collections::HashMap;

use serde::Serialize;

/// Where a cell (or merged block) was drawn this frame and what it showed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellPaintRecord {
    /// A1 address of the cell (the anchor for merged blocks)
    pub address: String,
    pub row: u32,
    pub col: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Resolved display text
    pub text: String,
}

impl CellPaintRecord {
    /// Half-open containment: the left and top edges belong to the cell.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Paint records of the last frame, in paint order
#[derive(Debug, Clone, Default)]
pub struct PaintRecords {
    records: Vec<CellPaintRecord>,
    by_cell: HashMap<(u32, u32), usize>,
}

impl PaintRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.by_cell.clear();
    }

    pub fn push(&mut self, record: CellPaintRecord) {
        self.by_cell
            .insert((record.row, record.col), self.records.len());
        self.records.push(record);
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&CellPaintRecord> {
        self.by_cell
            .get(&(row, col))
            .and_then(|&i| self.records.get(i))
    }

    pub fn by_address(&self, address: &str) -> Option<&CellPaintRecord> {
        self.records.iter().find(|r| r.address == address)
    }

    pub fn records(&self) -> &[CellPaintRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cell drawn under surface point `(x, y)`.
    ///
    /// Later records win, matching what is visible on screen.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&CellPaintRecord> {
        self.records.iter().rev().find(|r| r.contains(x, y))
    }

    /// Display text under surface point `(x, y)`.
    pub fn text_at(&self, x: f64, y: f64) -> Option<&str> {
        self.hit_test(x, y).map(|r| r.text.as_str())
    }
}
