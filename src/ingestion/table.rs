//! Structured-table reader.
//!
//! Behaviour-test runners hand scenario data over as an already-parsed grid whose first row is
//! the header. [`TableReader`] indexes such a grid by a named key column.

use tracing::debug;

use crate::error::{DataInputError, DataInputResult};
use crate::index::DataSetIndex;
use crate::lookup::DataLookup;

use super::key::KeyColumn;
use super::row::{row_from_cells, BlankCellPolicy};

/// Row/column accessors of an external table provider.
pub trait TableSource {
    /// Number of rows, header included.
    fn height(&self) -> usize;

    /// Number of cells in `row`.
    fn width_of(&self, row: usize) -> usize;

    /// Cell text, `None` for a null cell or out-of-range position.
    fn cell(&self, row: usize, col: usize) -> Option<&str>;
}

impl TableSource for [Vec<String>] {
    fn height(&self) -> usize {
        self.len()
    }

    fn width_of(&self, row: usize) -> usize {
        self.get(row).map_or(0, Vec::len)
    }

    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.get(row)?.get(col).map(String::as_str)
    }
}

impl TableSource for [Vec<Option<String>>] {
    fn height(&self) -> usize {
        self.len()
    }

    fn width_of(&self, row: usize) -> usize {
        self.get(row).map_or(0, Vec::len)
    }

    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.get(row)?.get(col)?.as_deref()
    }
}

impl<'a> TableSource for [Vec<&'a str>] {
    fn height(&self) -> usize {
        self.len()
    }

    fn width_of(&self, row: usize) -> usize {
        self.get(row).map_or(0, Vec::len)
    }

    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.get(row)?.get(col).copied()
    }
}

impl<T> TableSource for Vec<T>
where
    [T]: TableSource,
{
    fn height(&self) -> usize {
        self.as_slice().height()
    }

    fn width_of(&self, row: usize) -> usize {
        self.as_slice().width_of(row)
    }

    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.as_slice().cell(row, col)
    }
}

/// Options for [`TableReader`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOptions {
    /// Use ordinal 0 when the key column is not in the header instead of failing.
    pub fallback_to_first_column: bool,
    /// Treatment of blank, non-null cells.
    pub blank_cells: BlankCellPolicy,
}

/// A dataset built from an in-memory table.
#[derive(Debug, Clone)]
pub struct TableReader {
    index: DataSetIndex,
    header: Vec<String>,
    key_ordinal: usize,
}

impl TableReader {
    /// Index `table` by the column labelled `key_column` in its header row.
    ///
    /// The header itself is not stored as data. Rows with no key cell are skipped; a repeated
    /// key replaces the earlier row.
    pub fn from_table<S>(table: &S, key_column: &str, options: &TableOptions) -> DataInputResult<Self>
    where
        S: TableSource + ?Sized,
    {
        if table.height() == 0 {
            return Err(DataInputError::EmptySource {
                source_label: "table".to_string(),
            });
        }

        let header: Vec<String> = (0..table.width_of(0))
            .map(|col| table.cell(0, col).unwrap_or("").to_owned())
            .collect();
        let key_ordinal = KeyColumn::from(key_column)
            .resolve(Some(&header), options.fallback_to_first_column)?;

        let mut index = DataSetIndex::new(format!("table[{key_column}]"));
        for r in 1..table.height() {
            let key = match table.cell(r, key_ordinal).map(str::trim) {
                Some(k) if !k.is_empty() => k.to_owned(),
                _ => {
                    debug!(row = r, key_ordinal, "table row has no key cell, skipped");
                    continue;
                }
            };
            let cells = (0..table.width_of(r)).map(|col| table.cell(r, col));
            index.put(key, row_from_cells(cells, options.blank_cells));
        }

        debug!(source = %index.source(), rows = index.len(), "indexed table");
        Ok(Self {
            index,
            header,
            key_ordinal,
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Ordinal the key column resolved to.
    pub fn key_ordinal(&self) -> usize {
        self.key_ordinal
    }

    pub fn into_dataset(self) -> DataSetIndex {
        self.index
    }
}

impl DataLookup for TableReader {
    fn dataset(&self) -> &DataSetIndex {
        &self.index
    }
}
