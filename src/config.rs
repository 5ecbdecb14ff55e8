//! JSON-backed description of a data source.
//!
//! Suites that keep their test data layout in a file can describe each source once and open it
//! with [`DataSourceConfig::open`]:
//!
//! ```json
//! {
//!   "path": "testdata/devices.csv",
//!   "has_header": true,
//!   "key_column": "alias"
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DataInputError, DataInputResult};
use crate::ingestion::key::KeyColumn;
use crate::ingestion::row::BlankCellPolicy;
use crate::ingestion::unified::{
    open_data_source, DataSource, DataSourceFormat, NumericCellFormat, SheetSelection, SourceOptions,
};

/// Format names accepted in a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigFormat {
    Csv,
    Pipe,
    Spreadsheet,
}

/// Serializable description of one data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataSourceConfig {
    pub path: PathBuf,
    /// Inferred from the extension when absent.
    #[serde(default)]
    pub format: Option<ConfigFormat>,
    /// Overrides the separator of a delimited format.
    #[serde(default)]
    pub delimiter: Option<char>,
    #[serde(default)]
    pub has_header: bool,
    #[serde(default)]
    pub key_column: KeyColumn,
    #[serde(default)]
    pub fallback_to_first_column: bool,
    /// Single sheet to read; the first sheet when absent.
    #[serde(default)]
    pub sheet: Option<String>,
    /// Read every sheet (takes precedence over `sheet`).
    #[serde(default)]
    pub all_sheets: bool,
    #[serde(default)]
    pub blank_cells: BlankCellPolicy,
    /// Honour `"` quoting in delimited files; otherwise every line is one record.
    #[serde(default)]
    pub quoting: bool,
    #[serde(default)]
    pub numeric_cells: NumericCellFormat,
}

impl DataSourceConfig {
    /// Options equivalent to this config, without an observer.
    pub fn to_options(&self) -> DataInputResult<SourceOptions> {
        let delimiter = match self.delimiter {
            Some(c) if c.is_ascii() => Some(c as u8),
            Some(c) => {
                return Err(DataInputError::UnsupportedFormat {
                    message: format!("delimiter '{c}' is not a single-byte character"),
                });
            }
            None => None,
        };

        let format = match (self.format, delimiter) {
            (Some(ConfigFormat::Spreadsheet), _) => Some(DataSourceFormat::Spreadsheet),
            (_, Some(d)) => Some(DataSourceFormat::Delimited { delimiter: d }),
            (Some(ConfigFormat::Csv), None) => Some(DataSourceFormat::CSV),
            (Some(ConfigFormat::Pipe), None) => Some(DataSourceFormat::PIPE),
            (None, None) => None,
        };

        let sheets = match (&self.sheet, self.all_sheets) {
            (_, true) => SheetSelection::AllSheets,
            (Some(name), false) => SheetSelection::Sheet(name.clone()),
            (None, false) => SheetSelection::First,
        };

        Ok(SourceOptions {
            format,
            key_column: self.key_column.clone(),
            has_header: self.has_header,
            fallback_to_first_column: self.fallback_to_first_column,
            blank_cells: self.blank_cells,
            quoting: self.quoting,
            sheets,
            numeric_cells: self.numeric_cells,
            ..SourceOptions::default()
        })
    }

    /// Open the described source.
    pub fn open(&self) -> DataInputResult<DataSource> {
        open_data_source(&self.path, &self.to_options()?)
    }
}

/// Load a source description from a JSON file.
pub fn load_config(path: &Path) -> DataInputResult<DataSourceConfig> {
    let content = std::fs::read_to_string(path)?;
    load_config_str(&content)
}

/// Load a source description from a JSON string.
pub fn load_config_str(content: &str) -> DataInputResult<DataSourceConfig> {
    Ok(serde_json::from_str(content)?)
}
