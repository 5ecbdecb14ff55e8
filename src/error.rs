use thiserror::Error;

/// Convenience result type for data-input operations.
pub type DataInputResult<T> = Result<T, DataInputError>;

/// Error type returned by readers and lookups.
///
/// This is a single error enum shared across delimited, spreadsheet (optional) and table
/// ingestion, and the strict lookup paths of [`crate::lookup::DataLookup`].
#[derive(Debug, Error)]
pub enum DataInputError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-file reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "excel")]
    /// Spreadsheet reader error (feature-gated behind `excel`).
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// A JSON source configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// A record in the source could not be turned into a keyed row.
    #[error("malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    /// The named primary-key column does not appear in the header row.
    #[error("key column '{column}' not found in header. headers={headers:?}")]
    HeaderKeyNotFound { column: String, headers: Vec<String> },

    /// The source has no rows at all (not even a header).
    #[error("source '{source_label}' is empty")]
    EmptySource { source_label: String },

    /// The source format could not be determined or is not compiled in.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },

    /// Strict lookup of a data id that is not in the dataset.
    #[error("missing data id '{id}'")]
    MissingDataId { id: String },

    /// A row exists but the requested cell cannot be read.
    #[error("cannot read column {column} of data id '{id}': {message}")]
    CellAccess {
        id: String,
        column: usize,
        message: String,
    },
}
