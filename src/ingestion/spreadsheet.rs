#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::debug;

use crate::error::{DataInputError, DataInputResult};
use crate::index::DataSetIndex;
use crate::lookup::DataLookup;
use crate::types::Row;

use super::unified::{NumericCellFormat, SheetSelection, SpreadsheetOptions};

/// A dataset read from one or more sheets of a workbook (`.xlsx`, `.xls`, `.ods`, etc.).
#[derive(Debug, Clone)]
pub struct SpreadsheetReader {
    index: DataSetIndex,
    sheets: Vec<String>,
}

impl SpreadsheetReader {
    /// Read and index a workbook.
    ///
    /// Behavior:
    /// - Picks sheets according to `options.sheets` (first sheet by default); rows of several
    ///   sheets share one dataset, later sheets overwriting earlier keys
    /// - Records every non-empty cell by its absolute column ordinal (column A is 0)
    /// - Keys each row by its cell in the key column; rows without a key cell are skipped
    /// - With `has_header`, the first non-empty row of each sheet is the header
    pub fn from_path(path: impl AsRef<Path>, options: &SpreadsheetOptions) -> DataInputResult<Self> {
        let path = path.as_ref();
        let mut workbook = open_workbook_auto(path)?;

        let sheets: Vec<String> = match &options.sheets {
            SheetSelection::First => workbook.sheet_names().into_iter().take(1).collect(),
            SheetSelection::Sheet(name) => vec![name.clone()],
            SheetSelection::AllSheets => workbook.sheet_names().to_vec(),
            SheetSelection::Sheets(names) => names.clone(),
        };
        if sheets.is_empty() {
            return Err(DataInputError::EmptySource {
                source_label: path.display().to_string(),
            });
        }

        let mut index = DataSetIndex::new(path.display().to_string());
        for sheet in &sheets {
            let range = workbook.worksheet_range(sheet)?;
            index_sheet_range(sheet, &range, options, &mut index)?;
        }

        debug!(source = %index.source(), sheets = sheets.len(), rows = index.len(), "indexed workbook");
        Ok(Self { index, sheets })
    }

    /// Names of the sheets that were read, in order.
    pub fn sheets(&self) -> &[String] {
        &self.sheets
    }

    pub fn into_dataset(self) -> DataSetIndex {
        self.index
    }
}

impl DataLookup for SpreadsheetReader {
    fn dataset(&self) -> &DataSetIndex {
        &self.index
    }
}

fn index_sheet_range(
    sheet: &str,
    range: &Range<Data>,
    options: &SpreadsheetOptions,
    index: &mut DataSetIndex,
) -> DataInputResult<()> {
    let col_offset = range.start().map(|(_, c)| c as usize).unwrap_or(0);
    let row_offset = range.start().map(|(r, _)| r as usize).unwrap_or(0);

    let mut key_idx = if options.has_header {
        None
    } else {
        Some(options.key_column.resolve(None, options.fallback_to_first_column)?)
    };

    let mut skipped = 0usize;
    for (idx0, cells) in range.rows().enumerate() {
        let row = sheet_row(cells, col_offset, options.numeric_cells);
        if row.is_empty() {
            continue;
        }

        let key_idx = match key_idx {
            Some(idx) => idx,
            None => {
                let header = header_cells(&row);
                let idx = options
                    .key_column
                    .resolve(Some(&header), options.fallback_to_first_column)
                    .map_err(|e| wrap_err_with_sheet(sheet, e))?;
                key_idx = Some(idx);
                continue;
            }
        };

        let key = row
            .get(key_idx)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned);
        match key {
            Some(key) => index.put(key, row),
            None => {
                skipped += 1;
                debug!(sheet, row = row_offset + idx0 + 1, "row has no key cell, skipped");
            }
        }
    }

    if key_idx.is_none() {
        return Err(DataInputError::EmptySource {
            source_label: format!("sheet '{sheet}'"),
        });
    }
    if skipped > 0 {
        debug!(sheet, skipped, "rows without a key cell");
    }
    Ok(())
}

fn wrap_err_with_sheet(sheet: &str, err: DataInputError) -> DataInputError {
    match err {
        DataInputError::HeaderKeyNotFound { column, headers } => DataInputError::HeaderKeyNotFound {
            column: format!("{sheet}:{column}"),
            headers,
        },
        other => other,
    }
}

fn sheet_row(cells: &[Data], col_offset: usize, numeric: NumericCellFormat) -> Row {
    cells
        .iter()
        .enumerate()
        .filter_map(|(i, c)| cell_to_string(c, numeric).map(|v| (col_offset + i, v)))
        .collect()
}

/// Dense header vector so that a position in it is the column ordinal.
fn header_cells(row: &Row) -> Vec<String> {
    let width = row.iter().map(|(ordinal, _)| ordinal + 1).max().unwrap_or(0);
    (0..width)
        .map(|ordinal| row.get(ordinal).unwrap_or("").to_owned())
        .collect()
}

/// Text form of a cell, `None` for empty cells.
fn cell_to_string(c: &Data, numeric: NumericCellFormat) -> Option<String> {
    let s = match c {
        Data::Empty => return None,
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f, numeric),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
    };
    Some(s)
}

/// Integral values print without a fraction at any magnitude. NaN and infinities keep their
/// `f64` spelling.
fn format_float(f: f64, numeric: NumericCellFormat) -> String {
    let integral = match numeric {
        NumericCellFormat::Truncate => f.trunc(),
        NumericCellFormat::Natural if f.fract() == 0.0 => f,
        NumericCellFormat::Natural => return f.to_string(),
    };
    if !integral.is_finite() {
        return integral.to_string();
    }
    // -0.3 truncates to -0.0, which should read as "0".
    let integral = if integral == 0.0 { 0.0 } else { integral };
    format!("{integral:.0}")
}
