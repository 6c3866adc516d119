//! Merged-cell resolution.
//!
//! Every declared merge becomes a group whose top-left cell is the anchor.
//! The anchor paints the whole block; the other members are covered and
//! never paint on their own, but they still pull the block's rows and
//! columns into the visible set when they intersect the viewport.

use std::ops::Range;

use crate::cell_ref::format_address;
use crate::types::MergeRange;

use super::AxisIndex;

/// How a cell takes part in painting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRole {
    /// Not merged; paints its own rectangle
    Single,
    /// Top-left cell of a merge; paints the whole block
    Anchor(MergeRange),
    /// Covered by the merge anchored elsewhere; paints nothing
    Covered(MergeRange),
}

/// Lookup from any cell to its merge group
///
/// Groups are kept as ranges, never expanded cell by cell, so lookups cost
/// the same for a 2-cell merge and a whole-column block.
#[derive(Debug, Clone, Default)]
pub struct MergeResolver {
    groups: Vec<MergeRange>,
    /// Group positions ordered by start row
    by_start: Vec<usize>,
    /// Highest end row among `by_start[..=i]`
    reach: Vec<u32>,
}

impl MergeResolver {
    pub fn new(merges: &[MergeRange]) -> Self {
        let mut by_start: Vec<usize> = (0..merges.len()).collect();
        by_start.sort_by_key(|&i| merges.get(i).map_or(0, |m| m.start_row));
        let reach = by_start
            .iter()
            .filter_map(|&i| merges.get(i))
            .scan(0, |max, m| {
                *max = m.end_row.max(*max);
                Some(*max)
            })
            .collect();
        Self {
            groups: merges.to_vec(),
            by_start,
            reach,
        }
    }

    pub fn groups(&self) -> &[MergeRange] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group containing `(row, col)`. The first declared wins if several do.
    pub fn group_of(&self, row: u32, col: u32) -> Option<&MergeRange> {
        let started = self
            .by_start
            .partition_point(|&i| self.groups.get(i).is_some_and(|m| m.start_row <= row));
        // Walk back while some earlier group can still reach `row`.
        (0..started)
            .rev()
            .take_while(|&k| self.reach.get(k).is_some_and(|&end| end >= row))
            .filter_map(|k| self.by_start.get(k).copied())
            .filter(|&i| self.groups.get(i).is_some_and(|m| m.contains(row, col)))
            .min()
            .and_then(|i| self.groups.get(i))
    }

    pub fn role(&self, row: u32, col: u32) -> MergeRole {
        match self.group_of(row, col) {
            None => MergeRole::Single,
            Some(m) if m.start_row == row && m.start_col == col => MergeRole::Anchor(*m),
            Some(m) => MergeRole::Covered(*m),
        }
    }

    /// Address of the anchor cell for a merged cell
    pub fn master_address(&self, row: u32, col: u32) -> Option<String> {
        self.group_of(row, col)
            .map(|m| format_address(m.start_row, m.start_col))
    }

    /// Close the visible row/column positions under merge membership.
    ///
    /// Any group with a member at a visible (row, col) pair contributes all of
    /// its rows and columns that exist on the axes. Added rows and columns can
    /// reveal further groups, so this repeats until nothing changes.
    pub fn expand(
        &self,
        rows: &mut PositionSpans,
        cols: &mut PositionSpans,
        row_axis: &AxisIndex,
        col_axis: &AxisIndex,
    ) {
        if self.groups.is_empty() || rows.is_empty() || cols.is_empty() {
            return;
        }
        let mut pending: Vec<(Range<usize>, Range<usize>)> = self
            .groups
            .iter()
            .map(|m| {
                (
                    row_axis.range(m.start_row, m.end_row),
                    col_axis.range(m.start_col, m.end_col),
                )
            })
            .filter(|(r, c)| !r.is_empty() && !c.is_empty())
            .collect();
        loop {
            let mut changed = false;
            pending.retain(|(r, c)| {
                if !rows.intersects(r) || !cols.intersects(c) {
                    return true;
                }
                changed |= rows.insert(r.clone());
                changed |= cols.insert(c.clone());
                false
            });
            if !changed {
                break;
            }
        }
    }
}

/// Sorted, disjoint ranges of positions on one axis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionSpans {
    spans: Vec<Range<usize>>,
}

impl PositionSpans {
    pub fn new(range: Range<usize>) -> Self {
        let mut spans = Self::default();
        spans.insert(range);
        spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn spans(&self) -> &[Range<usize>] {
        &self.spans
    }

    pub fn intersects(&self, range: &Range<usize>) -> bool {
        self.spans
            .iter()
            .any(|s| s.start < range.end && range.start < s.end)
    }

    /// Add `range`. Returns whether any position was new.
    pub fn insert(&mut self, range: Range<usize>) -> bool {
        if range.is_empty()
            || self
                .spans
                .iter()
                .any(|s| s.start <= range.start && range.end <= s.end)
        {
            return false;
        }
        self.spans.push(range);
        self.spans.sort_by_key(|s| s.start);
        let mut merged: Vec<Range<usize>> = Vec::with_capacity(self.spans.len());
        for span in self.spans.drain(..) {
            match merged.last_mut() {
                Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
                _ => merged.push(span),
            }
        }
        self.spans = merged;
        true
    }

    /// Every position, ascending
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.spans.iter().flat_map(Clone::clone)
    }
}
