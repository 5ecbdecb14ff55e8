//! Readers and the unified entrypoint.
//!
//! Most callers should use [`open_data_source`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`SourceOptions`])
//! - reads and indexes the whole source into a [`crate::index::DataSetIndex`]
//! - optionally reports success/failure/alerts to a [`SourceObserver`]
//!
//! Format-specific readers are also available under:
//! - [`delimited`]
//! - `spreadsheet` (cargo feature `excel`)
//! - [`table`] for grids already parsed by a behaviour-test runner

pub mod delimited;
pub mod key;
pub mod observability;
pub mod row;
#[cfg(feature = "excel")]
pub mod spreadsheet;
pub mod table;
pub mod unified;

pub use key::KeyColumn;
pub use observability::{
    CompositeObserver, FileObserver, SourceContext, SourceObserver, SourceSeverity, SourceStats,
    TracingObserver,
};
pub use row::BlankCellPolicy;
pub use unified::{
    open_data_source, DataSource, DataSourceFormat, NumericCellFormat, SheetSelection, SourceOptions,
    SpreadsheetOptions,
};
