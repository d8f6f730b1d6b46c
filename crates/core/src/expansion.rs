//! Detail-view expansion state that survives table refreshes.
//!
//! The table addresses rows by position, not by a stable key, so every
//! refresh that prepends rows would leave expanded detail panels attached
//! to the wrong records. [`ExpandedRows`] tracks the expanded positions and
//! the row count seen at the previous refresh, and shifts the positions by
//! the growth in between.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedRows {
    rows: BTreeSet<usize>,
    last_total: usize,
}

impl ExpandedRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known set of expanded positions and row count.
    pub fn with_state(rows: impl IntoIterator<Item = usize>, last_total: usize) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            last_total,
        }
    }

    /// Record that the detail view at `pos` was opened.
    pub fn expand(&mut self, pos: usize) -> bool {
        self.rows.insert(pos)
    }

    /// Record that the detail view at `pos` was closed.
    pub fn collapse(&mut self, pos: usize) -> bool {
        self.rows.remove(&pos)
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.rows.contains(&pos)
    }

    /// Expanded positions in ascending order.
    pub fn positions(&self) -> Vec<usize> {
        self.rows.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row count observed at the most recent refresh.
    pub fn last_total(&self) -> usize {
        self.last_total
    }

    /// Re-label expanded positions after a refresh that produced
    /// `new_total` rows, returning the positions whose detail view must be
    /// re-opened.
    ///
    /// Positions shift only when the table grew. Positions that no longer
    /// exist in the new table are dropped.
    pub fn reindex(&mut self, new_total: usize) -> Vec<usize> {
        let delta = new_total.saturating_sub(self.last_total);
        self.last_total = new_total;

        let shifted: BTreeSet<usize> = self
            .rows
            .iter()
            .map(|pos| pos + delta)
            .filter(|pos| *pos < new_total)
            .collect();

        self.rows = shifted;
        self.positions()
    }
}
