//! `data-driven-input` loads test data into an in-memory, keyed dataset and answers lookups
//! against it, whatever the file format.
//!
//! A data-driven test addresses each scenario by a **data id** (the value of a primary-key
//! column) and reads further columns of that row by ordinal. Readers build the
//! [`index::DataSetIndex`] once, at construction; afterwards every query goes through the
//! [`lookup::DataLookup`] trait.
//!
//! ## What you can read
//!
//! **Sources (auto-detected by extension):**
//!
//! - **Comma-separated**: `.csv`
//! - **Pipe-separated**: `.txt`, `.psv`, `.pipe`, `.dat`
//! - **Workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xls`, `.xlsm`, `.xlsb`,
//!   `.ods`
//! - **In-memory tables** handed over by a behaviour-test runner (header row first), via
//!   [`ingestion::table::TableReader`]
//!
//! **Row model:**
//!
//! Cells are text, addressed by their zero-based column ordinal in the source. A null cell has
//! no entry in its [`types::Row`]; an empty cell is `""` unless
//! [`ingestion::BlankCellPolicy::Skip`] is chosen. Numeric spreadsheet cells are truncated to an
//! integer string by default.
//!
//! **Keys:**
//!
//! The first column is the data id unless a [`ingestion::KeyColumn`] says otherwise. When a key
//! appears twice, the later row replaces the earlier one.
//!
//! ## Quick example
//!
//! ```no_run
//! use data_driven_input::ingestion::{open_data_source, SourceOptions};
//! use data_driven_input::lookup::DataLookup;
//!
//! # fn main() -> Result<(), data_driven_input::DataInputError> {
//! // testdata/logins.txt:
//! //   valid_user|alice|s3cret
//! //   locked_user|bob|hunter2
//! let logins = open_data_source("testdata/logins.txt", &SourceOptions::default())?;
//!
//! assert!(logins.has_data_id("valid_user"));
//! let user = logins.value_at("valid_user", 1)?; // strict: errors if absent
//! let maybe = logins.find_value("unknown_user", 1); // permissive: None if absent
//! # let _ = (user, maybe);
//! # Ok(())
//! # }
//! ```
//!
//! ## Keyed by a header column
//!
//! ```rust
//! use data_driven_input::ingestion::table::{TableOptions, TableReader};
//! use data_driven_input::lookup::DataLookup;
//!
//! # fn main() -> Result<(), data_driven_input::DataInputError> {
//! let table = vec![
//!     vec!["type", "udid", "alias"],
//!     vec!["android", "emulator-5554", "pixel"],
//! ];
//! let devices = TableReader::from_table(&table, "alias", &TableOptions::default())?;
//! assert_eq!(devices.value_at("pixel", 1)?, "emulator-5554");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: readers, the unified entrypoint and observer hooks
//! - [`index`]: the keyed dataset
//! - [`lookup`]: the query trait shared by every reader
//! - [`types`]: the row type
//! - [`config`]: JSON description of a source
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod index;
pub mod ingestion;
pub mod lookup;
pub mod types;

pub use error::{DataInputError, DataInputResult};
pub use index::DataSetIndex;
pub use lookup::DataLookup;
pub use types::Row;
