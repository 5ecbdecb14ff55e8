//! Core data model types for data-driven input.
//!
//! Every reader turns its source into [`Row`]s, which are then collected into a
//! [`crate::index::DataSetIndex`] keyed by a primary-key column.

use std::collections::BTreeMap;

/// One record's cell values, addressed by column ordinal.
///
/// Ordinals are the zero-based position of the cell in its source row, so they are stable within
/// a single dataset. A null cell has no entry; a present-but-empty cell is stored as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: BTreeMap<usize, String>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the value at `ordinal`, replacing any previous value there.
    pub fn insert(&mut self, ordinal: usize, value: impl Into<String>) {
        self.cells.insert(ordinal, value.into());
    }

    /// Returns the cell at `ordinal`, if present.
    pub fn get(&self, ordinal: usize) -> Option<&str> {
        self.cells.get(&ordinal).map(String::as_str)
    }

    /// Returns `true` if a cell is recorded at `ordinal`.
    pub fn contains(&self, ordinal: usize) -> bool {
        self.cells.contains_key(&ordinal)
    }

    /// Number of recorded cells (not the highest ordinal).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate `(ordinal, value)` pairs in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.cells.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Cell values in ordinal order, without their ordinals.
    pub fn values(&self) -> Vec<&str> {
        self.cells.values().map(String::as_str).collect()
    }
}

impl FromIterator<(usize, String)> for Row {
    fn from_iter<I: IntoIterator<Item = (usize, String)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl<S: Into<String>> From<Vec<S>> for Row {
    /// Builds a dense row: the n-th element lands at ordinal n.
    fn from(values: Vec<S>) -> Self {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i, v.into()))
            .collect()
    }
}
