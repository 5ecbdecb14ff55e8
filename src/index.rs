//! Keyed collection of parsed rows.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{DataInputError, DataInputResult};
use crate::types::Row;

/// In-memory dataset: primary-key value -> [`Row`].
///
/// Built once by a reader and read-only afterwards. Keys are unique; when a source contains the
/// same key twice the later row replaces the earlier one without any error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSetIndex {
    source: String,
    rows: HashMap<String, Row>,
}

impl DataSetIndex {
    /// Create an empty index labelled with the source it is built from (a path, sheet name, ...).
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            rows: HashMap::new(),
        }
    }

    /// Label of the source this index was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Insert `row` under `key`. Last write wins.
    pub fn put(&mut self, key: impl Into<String>, row: Row) {
        let key = key.into();
        if let Some(previous) = self.rows.insert(key, row) {
            debug!(
                source = %self.source,
                replaced_cells = previous.len(),
                "duplicate data id, keeping the later row"
            );
        }
    }

    /// Strict lookup: fails with [`DataInputError::MissingDataId`] when `key` is absent.
    pub fn get(&self, key: &str) -> DataInputResult<&Row> {
        self.rows.get(key).ok_or_else(|| DataInputError::MissingDataId {
            id: key.to_owned(),
        })
    }

    /// Permissive lookup: `None` when `key` is absent.
    pub fn find(&self, key: &str) -> Option<&Row> {
        self.rows.get(key)
    }

    pub fn has_data_id(&self, key: &str) -> bool {
        self.rows.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::DataSetIndex;
    use crate::error::DataInputError;
    use crate::types::Row;

    #[test]
    fn put_overwrites_silently_on_collision() {
        let mut idx = DataSetIndex::new("mem");
        idx.put("k", Row::from(vec!["k", "first"]));
        idx.put("k", Row::from(vec!["k", "second"]));

        assert_eq!(idx.len(), 1);
        assert_eq!(idx.get("k").unwrap().get(1), Some("second"));
    }

    #[test]
    fn strict_and_permissive_lookups_differ_only_on_absence() {
        let mut idx = DataSetIndex::new("mem");
        idx.put("present", Row::from(vec!["present"]));

        assert!(idx.get("present").is_ok());
        assert!(idx.find("present").is_some());

        let err = idx.get("absent").unwrap_err();
        assert!(matches!(err, DataInputError::MissingDataId { ref id } if id == "absent"));
        assert!(idx.find("absent").is_none());
    }

    #[test]
    fn has_data_id_is_a_plain_existence_check() {
        let mut idx = DataSetIndex::new("mem");
        assert!(!idx.has_data_id(""));
        idx.put("", Row::new());
        assert!(idx.has_data_id(""));
        assert_eq!(idx.source(), "mem");
    }
}
