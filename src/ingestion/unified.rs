//! Unified entrypoint for path-based sources.
//!
//! Most callers should use [`open_data_source`], which reads a file into a [`DataSource`] that
//! answers every [`DataLookup`] query regardless of the file format.
//!
//! - If [`SourceOptions::format`] is `None`, the format is inferred from the file extension.
//! - If an [`super::observability::SourceObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{DataInputError, DataInputResult};
use crate::index::DataSetIndex;
use crate::lookup::DataLookup;

use super::delimited::{DelimitedOptions, DelimitedReader};
use super::key::KeyColumn;
use super::observability::{SourceContext, SourceObserver, SourceSeverity, SourceStats};
use super::row::BlankCellPolicy;
#[cfg(feature = "excel")]
use super::spreadsheet::SpreadsheetReader;
use super::table::TableReader;

/// Supported source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceFormat {
    /// Delimited text with the given single-byte separator.
    Delimited { delimiter: u8 },
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Spreadsheet,
}

impl DataSourceFormat {
    /// Comma-separated values.
    pub const CSV: Self = Self::Delimited { delimiter: b',' };
    /// Pipe-separated values.
    pub const PIPE: Self = Self::Delimited { delimiter: b'|' };

    /// Parse a source format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::CSV),
            "psv" | "pipe" | "txt" | "dat" => Some(Self::PIPE),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

/// How to choose sheet(s) when reading a workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SheetSelection {
    /// Read the first sheet (default).
    #[default]
    First,
    /// Read a single named sheet.
    Sheet(String),
    /// Read all sheets into one dataset.
    AllSheets,
    /// Read only the listed sheets (in order) into one dataset.
    Sheets(Vec<String>),
}

/// Text rendering of numeric spreadsheet cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericCellFormat {
    /// Truncate to an integer string (`3.7` reads as `"3"`).
    #[default]
    Truncate,
    /// Keep the fractional part when there is one.
    Natural,
}

/// Options for the spreadsheet reader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpreadsheetOptions {
    pub sheets: SheetSelection,
    /// If `true`, the first non-empty row of each sheet is a header and is not stored as data.
    pub has_header: bool,
    pub key_column: KeyColumn,
    /// Use ordinal 0 when a named key column is not in the header instead of failing.
    pub fallback_to_first_column: bool,
    pub numeric_cells: NumericCellFormat,
}

/// Options controlling [`open_data_source`].
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct SourceOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<DataSourceFormat>,
    /// Primary-key column for either format.
    pub key_column: KeyColumn,
    /// Whether the source starts with a header row.
    pub has_header: bool,
    /// Use ordinal 0 when a named key column is not in the header instead of failing.
    pub fallback_to_first_column: bool,
    /// Delimited-specific: treatment of blank, non-null cells.
    pub blank_cells: BlankCellPolicy,
    /// Delimited-specific: honour `"` quoting instead of reading one record per line.
    pub quoting: bool,
    /// Spreadsheet-specific options.
    pub sheets: SheetSelection,
    pub numeric_cells: NumericCellFormat,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn SourceObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: SourceSeverity,
}

impl fmt::Debug for SourceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceOptions")
            .field("format", &self.format)
            .field("key_column", &self.key_column)
            .field("has_header", &self.has_header)
            .field("fallback_to_first_column", &self.fallback_to_first_column)
            .field("blank_cells", &self.blank_cells)
            .field("quoting", &self.quoting)
            .field("sheets", &self.sheets)
            .field("numeric_cells", &self.numeric_cells)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            format: None,
            key_column: KeyColumn::default(),
            has_header: false,
            fallback_to_first_column: false,
            blank_cells: BlankCellPolicy::default(),
            quoting: false,
            sheets: SheetSelection::default(),
            numeric_cells: NumericCellFormat::default(),
            observer: None,
            alert_at_or_above: SourceSeverity::Critical,
        }
    }
}

impl SourceOptions {
    fn delimited(&self, delimiter: u8) -> DelimitedOptions {
        DelimitedOptions {
            delimiter,
            has_header: self.has_header,
            key_column: self.key_column.clone(),
            fallback_to_first_column: self.fallback_to_first_column,
            blank_cells: self.blank_cells,
            quoting: self.quoting,
        }
    }

    #[cfg(feature = "excel")]
    fn spreadsheet(&self) -> SpreadsheetOptions {
        SpreadsheetOptions {
            sheets: self.sheets.clone(),
            has_header: self.has_header,
            key_column: self.key_column.clone(),
            fallback_to_first_column: self.fallback_to_first_column,
            numeric_cells: self.numeric_cells,
        }
    }
}

/// A dataset from any supported source.
#[derive(Debug, Clone)]
pub enum DataSource {
    Delimited(DelimitedReader),
    #[cfg(feature = "excel")]
    Spreadsheet(SpreadsheetReader),
    Table(TableReader),
}

impl DataLookup for DataSource {
    fn dataset(&self) -> &DataSetIndex {
        match self {
            Self::Delimited(r) => r.dataset(),
            #[cfg(feature = "excel")]
            Self::Spreadsheet(r) => r.dataset(),
            Self::Table(r) => r.dataset(),
        }
    }
}

impl From<DelimitedReader> for DataSource {
    fn from(r: DelimitedReader) -> Self {
        Self::Delimited(r)
    }
}

#[cfg(feature = "excel")]
impl From<SpreadsheetReader> for DataSource {
    fn from(r: SpreadsheetReader) -> Self {
        Self::Spreadsheet(r)
    }
}

impl From<TableReader> for DataSource {
    fn from(r: TableReader) -> Self {
        Self::Table(r)
    }
}

/// Unified entry point for path-based sources.
///
/// The returned source is fully indexed; any I/O or format error is returned instead and no
/// partial dataset is kept.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row count stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// ```no_run
/// use data_driven_input::ingestion::{open_data_source, SourceOptions};
/// use data_driven_input::lookup::DataLookup;
///
/// # fn main() -> Result<(), data_driven_input::DataInputError> {
/// // `.txt` selects the pipe-delimited reader.
/// let logins = open_data_source("testdata/logins.txt", &SourceOptions::default())?;
/// let password = logins.value_at("valid_user", 2)?;
/// # let _ = password;
/// # Ok(())
/// # }
/// ```
pub fn open_data_source(path: impl AsRef<Path>, options: &SourceOptions) -> DataInputResult<DataSource> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let ctx = SourceContext {
        path: path.to_path_buf(),
        format: fmt,
    };

    let result = match fmt {
        DataSourceFormat::Delimited { delimiter } => {
            DelimitedReader::from_path(path, &options.delimited(delimiter)).map(DataSource::from)
        }
        DataSourceFormat::Spreadsheet => open_spreadsheet_dispatch(path, options),
    };

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(source) => obs.on_success(
                &ctx,
                SourceStats {
                    rows: source.dataset().len(),
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn severity_for_error(e: &DataInputError) -> SourceSeverity {
    match e {
        DataInputError::Io(_) => SourceSeverity::Critical,
        DataInputError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => SourceSeverity::Critical,
            _ => SourceSeverity::Error,
        },
        #[cfg(feature = "excel")]
        DataInputError::Spreadsheet(err) => match err {
            calamine::Error::Io(_) => SourceSeverity::Critical,
            _ => SourceSeverity::Error,
        },
        _ => SourceSeverity::Error,
    }
}

fn infer_format_from_path(path: &Path) -> DataInputResult<DataSourceFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| DataInputError::UnsupportedFormat {
            message: format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ),
        })?;

    DataSourceFormat::from_extension(ext).ok_or_else(|| DataInputError::UnsupportedFormat {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

#[cfg_attr(not(feature = "excel"), allow(unused_variables))]
fn open_spreadsheet_dispatch(path: &Path, options: &SourceOptions) -> DataInputResult<DataSource> {
    #[cfg(feature = "excel")]
    {
        SpreadsheetReader::from_path(path, &options.spreadsheet()).map(DataSource::from)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(DataInputError::UnsupportedFormat {
            message: "spreadsheet ingestion not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{infer_format_from_path, DataSourceFormat};
    use crate::error::DataInputError;

    #[test]
    fn extension_selects_format() {
        assert_eq!(DataSourceFormat::from_extension("CSV"), Some(DataSourceFormat::CSV));
        assert_eq!(DataSourceFormat::from_extension("txt"), Some(DataSourceFormat::PIPE));
        assert_eq!(DataSourceFormat::from_extension("xlsx"), Some(DataSourceFormat::Spreadsheet));
        assert_eq!(DataSourceFormat::from_extension("json"), None);
    }

    #[test]
    fn missing_extension_is_unsupported() {
        let err = infer_format_from_path(Path::new("testdata/logins")).unwrap_err();
        assert!(matches!(err, DataInputError::UnsupportedFormat { .. }));
        assert!(err.to_string().contains("no extension"));
    }
}
