//! Uniform query surface over any dataset, independent of the source format.
//!
//! Test helpers should take `&impl DataLookup` (or `&dyn DataLookup`) rather than a concrete
//! reader, so the same helper works for a pipe-delimited file, a workbook or a table handed over
//! by a behaviour-test runner.
//!
//! Each query comes in two flavours:
//!
//! - strict ([`DataLookup::row_at`], [`DataLookup::value_at`]): a missing data id or cell is an
//!   error
//! - permissive ([`DataLookup::find_row`], [`DataLookup::find_value`]): a missing data id or cell
//!   is `None`
//!
//! ```rust
//! use data_driven_input::ingestion::delimited::{DelimitedOptions, DelimitedReader};
//! use data_driven_input::lookup::DataLookup;
//!
//! # fn main() -> Result<(), data_driven_input::DataInputError> {
//! let input = "data_set_id_1|val1|val2\n";
//! let reader = DelimitedReader::from_reader(input.as_bytes(), "inline", &DelimitedOptions::pipe())?;
//!
//! assert!(reader.has_data_id("data_set_id_1"));
//! assert_eq!(reader.value_at("data_set_id_1", 1)?, "val1");
//! assert_eq!(reader.find_value("data_set_id_2", 1), None);
//! # Ok(())
//! # }
//! ```

use crate::error::{DataInputError, DataInputResult};
use crate::index::DataSetIndex;
use crate::types::Row;

/// Read-only access to a keyed dataset.
pub trait DataLookup {
    /// The dataset backing this lookup.
    fn dataset(&self) -> &DataSetIndex;

    /// Returns `true` if `id` is a key of the dataset. Never fails.
    fn has_data_id(&self, id: &str) -> bool {
        self.dataset().has_data_id(id)
    }

    /// Strict row lookup.
    fn row_at(&self, id: &str) -> DataInputResult<&Row> {
        self.dataset().get(id)
    }

    /// Permissive row lookup.
    fn find_row(&self, id: &str) -> Option<&Row> {
        self.dataset().find(id)
    }

    /// Strict cell lookup.
    ///
    /// Fails with [`DataInputError::MissingDataId`] when `id` is absent and with
    /// [`DataInputError::CellAccess`] when the row has no cell at `column`.
    fn value_at(&self, id: &str, column: usize) -> DataInputResult<&str> {
        let row = self.row_at(id)?;
        row.get(column).ok_or_else(|| DataInputError::CellAccess {
            id: id.to_owned(),
            column,
            message: format!("row has {} cell(s), none at this ordinal", row.len()),
        })
    }

    /// Permissive cell lookup.
    fn find_value(&self, id: &str, column: usize) -> Option<&str> {
        self.find_row(id).and_then(|row| row.get(column))
    }

    /// Iterate all data ids in arbitrary order.
    fn data_ids(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.dataset().keys())
    }
}

impl DataLookup for DataSetIndex {
    fn dataset(&self) -> &DataSetIndex {
        self
    }
}

impl<T: DataLookup + ?Sized> DataLookup for &T {
    fn dataset(&self) -> &DataSetIndex {
        (**self).dataset()
    }
}
