//! Delimited-file reader (comma- or pipe-separated test data).
//!
//! By default every line is one record, split on the delimiter with [`parse_delimited_line`]'s
//! rules: a `"` is ordinary text. Set [`DelimitedOptions::quoting`] to read RFC 4180 style
//! quoted fields through the `csv` crate instead; a quoted field may then span lines.
//!
//! [`parse_delimited_line`]: super::row::parse_delimited_line

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{DataInputError, DataInputResult};
use crate::index::DataSetIndex;
use crate::lookup::DataLookup;

use super::key::KeyColumn;
use super::row::{row_from_cells, split_fields, BlankCellPolicy};

/// Options for [`DelimitedReader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedOptions {
    /// Field separator byte.
    pub delimiter: u8,
    /// If `true`, the first non-empty line is a header and is not stored as data.
    pub has_header: bool,
    /// Column supplying the data id. Named columns require `has_header`.
    pub key_column: KeyColumn,
    /// Use ordinal 0 when a named key column is not in the header instead of failing.
    pub fallback_to_first_column: bool,
    /// Treatment of blank, non-null cells.
    pub blank_cells: BlankCellPolicy,
    /// Honour `"` quoting (a quoted field may contain the delimiter or a line break).
    /// Off by default: each line is one record.
    pub quoting: bool,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: false,
            key_column: KeyColumn::default(),
            fallback_to_first_column: false,
            blank_cells: BlankCellPolicy::default(),
            quoting: false,
        }
    }
}

impl DelimitedOptions {
    /// Comma-separated, no header, keyed by the first column.
    pub fn comma() -> Self {
        Self::default()
    }

    /// Pipe-separated, no header, keyed by the first column.
    pub fn pipe() -> Self {
        Self {
            delimiter: b'|',
            ..Self::default()
        }
    }
}

/// A dataset read from a delimited text source.
#[derive(Debug, Clone)]
pub struct DelimitedReader {
    index: DataSetIndex,
    header: Option<Vec<String>>,
}

impl DelimitedReader {
    /// Read and index a delimited file.
    ///
    /// Rules:
    ///
    /// - empty lines are ignored
    /// - every other line becomes one row, cells indexed by position
    /// - the key cell is trimmed; a line without a (non-blank) key cell is an error
    /// - a repeated key replaces the earlier row
    pub fn from_path(path: impl AsRef<Path>, options: &DelimitedOptions) -> DataInputResult<Self> {
        let path = path.as_ref();
        let label = path.display().to_string();
        if options.quoting {
            let rdr = builder(options).from_path(path)?;
            Self::from_csv_reader(rdr, label, options)
        } else {
            let file = File::open(path)?;
            Self::from_lines(BufReader::new(file), label, options)
        }
    }

    /// Read and index delimited data from any reader. `label` names the source in errors and logs.
    pub fn from_reader<R: Read>(
        input: R,
        label: impl Into<String>,
        options: &DelimitedOptions,
    ) -> DataInputResult<Self> {
        if options.quoting {
            Self::from_csv_reader(builder(options).from_reader(input), label.into(), options)
        } else {
            Self::from_lines(BufReader::new(input), label.into(), options)
        }
    }

    fn from_lines<R: BufRead>(
        input: R,
        label: String,
        options: &DelimitedOptions,
    ) -> DataInputResult<Self> {
        if !options.delimiter.is_ascii() {
            return Err(DataInputError::UnsupportedFormat {
                message: format!(
                    "delimiter byte 0x{:02x} is not ASCII; enable quoting to read it as raw bytes",
                    options.delimiter
                ),
            });
        }
        let delimiter = char::from(options.delimiter);

        let mut indexer = RecordIndexer::new(label, options)?;
        for (idx0, line) in input.lines().enumerate() {
            let line = line?;
            let fields: Vec<&str> = split_fields(&line, delimiter).collect();
            indexer.push(idx0 + 1, &fields)?;
        }
        indexer.finish()
    }

    fn from_csv_reader<R: Read>(
        mut rdr: csv::Reader<R>,
        label: String,
        options: &DelimitedOptions,
    ) -> DataInputResult<Self> {
        let mut indexer = RecordIndexer::new(label, options)?;
        for result in rdr.records() {
            let record = result?;
            let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
            let fields: Vec<&str> = record.iter().collect();
            indexer.push(line, &fields)?;
        }
        indexer.finish()
    }

    /// Header cells, when the reader was configured with `has_header`.
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Consume the reader, keeping only its dataset.
    pub fn into_dataset(self) -> DataSetIndex {
        self.index
    }
}

impl DataLookup for DelimitedReader {
    fn dataset(&self) -> &DataSetIndex {
        &self.index
    }
}

/// Keys and stores split records, whichever way they were split.
struct RecordIndexer<'o> {
    options: &'o DelimitedOptions,
    index: DataSetIndex,
    header: Option<Vec<String>>,
    key_idx: Option<usize>,
}

impl<'o> RecordIndexer<'o> {
    fn new(label: String, options: &'o DelimitedOptions) -> DataInputResult<Self> {
        let key_idx = if options.has_header {
            None
        } else {
            Some(options.key_column.resolve(None, options.fallback_to_first_column)?)
        };
        Ok(Self {
            options,
            index: DataSetIndex::new(label),
            header: None,
            key_idx,
        })
    }

    fn push(&mut self, line: usize, fields: &[&str]) -> DataInputResult<()> {
        if fields.iter().all(|cell| cell.trim().is_empty()) {
            return Ok(());
        }

        let key_idx = match self.key_idx {
            Some(idx) => idx,
            None => {
                let cells: Vec<String> = fields.iter().map(|c| (*c).to_owned()).collect();
                let idx = self
                    .options
                    .key_column
                    .resolve(Some(&cells), self.options.fallback_to_first_column)?;
                self.header = Some(cells);
                self.key_idx = Some(idx);
                return Ok(());
            }
        };

        let key = match fields.get(key_idx).map(|k| k.trim()) {
            Some(k) if !k.is_empty() => k.to_owned(),
            Some(_) => {
                return Err(DataInputError::MalformedRecord {
                    line,
                    message: format!("blank key in column {key_idx}"),
                });
            }
            None => {
                return Err(DataInputError::MalformedRecord {
                    line,
                    message: format!("record has {} field(s), key column is {key_idx}", fields.len()),
                });
            }
        };

        let row = row_from_cells(fields.iter().copied().map(Some), self.options.blank_cells);
        self.index.put(key, row);
        Ok(())
    }

    fn finish(self) -> DataInputResult<DelimitedReader> {
        if self.options.has_header && self.header.is_none() {
            return Err(DataInputError::EmptySource {
                source_label: self.index.source().to_owned(),
            });
        }

        debug!(source = %self.index.source(), rows = self.index.len(), "indexed delimited source");
        Ok(DelimitedReader {
            index: self.index,
            header: self.header,
        })
    }
}

fn builder(options: &DelimitedOptions) -> csv::ReaderBuilder {
    let mut b = csv::ReaderBuilder::new();
    b.delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .quoting(true);
    b
}

#[cfg(test)]
mod tests {
    use super::{DelimitedOptions, DelimitedReader};
    use crate::error::DataInputError;
    use crate::ingestion::key::KeyColumn;
    use crate::ingestion::row::{parse_delimited_line, BlankCellPolicy};
    use crate::lookup::DataLookup;

    fn read(input: &str, options: &DelimitedOptions) -> Result<DelimitedReader, DataInputError> {
        DelimitedReader::from_reader(input.as_bytes(), "inline", options)
    }

    #[test]
    fn pipe_file_scenario() {
        let r = read("data_set_id_1|val1|val2\n", &DelimitedOptions::pipe()).unwrap();
        assert!(r.has_data_id("data_set_id_1"));
        assert_eq!(r.value_at("data_set_id_1", 1).unwrap(), "val1");
        assert_eq!(r.value_at("data_set_id_1", 2).unwrap(), "val2");
    }

    #[test]
    fn key_is_trimmed_and_blank_lines_skipped() {
        let input = "  login_ok ,alice,secret\n\n , , \nlogin_bad,bob,wrong\n";
        let r = read(input, &DelimitedOptions::comma()).unwrap();
        assert_eq!(r.dataset().len(), 2);
        assert!(r.has_data_id("login_ok"));
        // Only the key is trimmed; the stored cell is the raw field.
        assert_eq!(r.value_at("login_ok", 0).unwrap(), "  login_ok ");
        assert_eq!(r.value_at("login_bad", 2).unwrap(), "wrong");
    }

    #[test]
    fn duplicate_key_last_write_wins() {
        let r = read("k|first\nk|second\n", &DelimitedOptions::pipe()).unwrap();
        assert_eq!(r.dataset().len(), 1);
        assert_eq!(r.value_at("k", 1).unwrap(), "second");
    }

    #[test]
    fn ragged_rows_are_accepted() {
        let r = read("a|1\nb|1|2|3\nc\n", &DelimitedOptions::pipe()).unwrap();
        assert_eq!(r.find_row("b").map(|row| row.len()), Some(4));
        assert_eq!(r.find_value("c", 1), None);
    }

    #[test]
    fn named_key_column_uses_header() {
        let options = DelimitedOptions {
            has_header: true,
            key_column: KeyColumn::from("alias"),
            ..DelimitedOptions::comma()
        };
        let r = read("type,udid,alias\nandroid,emulator-5554,pixel\nios,0000-AAAA,iphone\n", &options)
            .unwrap();

        assert!(!r.has_data_id("type"));
        assert!(!r.has_data_id("alias"));
        assert_eq!(r.value_at("pixel", 1).unwrap(), "emulator-5554");
        assert_eq!(r.value_at("iphone", 0).unwrap(), "ios");
        assert_eq!(r.header().map(|h| h.len()), Some(3));
    }

    #[test]
    fn missing_key_cell_is_malformed() {
        let options = DelimitedOptions {
            key_column: KeyColumn::from(2),
            ..DelimitedOptions::pipe()
        };
        let err = read("a|b|c\nd|e\n", &options).unwrap_err();
        assert!(matches!(err, DataInputError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn stray_quote_does_not_swallow_following_lines() {
        let r = read("case_1|\"Main St|open\ncase_2|ok\ncase_3|fine\n", &DelimitedOptions::pipe()).unwrap();
        assert_eq!(r.dataset().len(), 3);
        assert_eq!(r.value_at("case_1", 1).unwrap(), "\"Main St");
        assert_eq!(r.value_at("case_1", 2).unwrap(), "open");
        assert_eq!(r.value_at("case_3", 1).unwrap(), "fine");
    }

    #[test]
    fn reader_rows_match_the_line_parser() {
        let lines = ["k1|a||c|", "k2|\"x|y\"|z"];
        let input: String = lines.iter().map(|l| format!("{l}\r\n")).collect();
        let r = read(&input, &DelimitedOptions::pipe()).unwrap();

        for (key, line) in ["k1", "k2"].iter().zip(lines) {
            let expected = parse_delimited_line(line, '|', BlankCellPolicy::Keep);
            assert_eq!(r.row_at(key).unwrap(), &expected);
        }
    }

    #[test]
    fn quoting_is_opt_in() {
        let input = "greeting,\"hello, world\",end\n";
        let plain = read(input, &DelimitedOptions::comma()).unwrap();
        assert_eq!(plain.value_at("greeting", 1).unwrap(), "\"hello");

        let quoted = DelimitedOptions {
            quoting: true,
            ..DelimitedOptions::comma()
        };
        let r = read(input, &quoted).unwrap();
        assert_eq!(r.value_at("greeting", 1).unwrap(), "hello, world");
        assert_eq!(r.value_at("greeting", 2).unwrap(), "end");
    }

    #[test]
    fn non_ascii_delimiter_needs_quoting_mode() {
        let options = DelimitedOptions {
            delimiter: 0xA6,
            ..DelimitedOptions::default()
        };
        let err = read("a\n", &options).unwrap_err();
        assert!(matches!(err, DataInputError::UnsupportedFormat { .. }));
    }

    #[test]
    fn header_only_reader_requires_a_header() {
        let options = DelimitedOptions {
            has_header: true,
            ..DelimitedOptions::comma()
        };
        let err = read("", &options).unwrap_err();
        assert!(matches!(err, DataInputError::EmptySource { .. }));
    }
}
