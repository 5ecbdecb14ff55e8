//! Row parsing shared by every reader.

use serde::{Deserialize, Serialize};

use crate::types::Row;

/// What to do with a cell that is present but blank (empty or whitespace-only).
///
/// Null cells are always skipped; this only decides about blank, non-null ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlankCellPolicy {
    /// Store blank cells verbatim (an empty cell reads back as `""`).
    #[default]
    Keep,
    /// Leave blank cells out of the row, as if they were null.
    Skip,
}

impl BlankCellPolicy {
    fn admits(self, cell: &str) -> bool {
        match self {
            Self::Keep => true,
            Self::Skip => !cell.trim().is_empty(),
        }
    }
}

/// Split one raw line on `delimiter` and assign each field its ordinal.
///
/// Fields are not trimmed. Trailing empty fields keep their ordinals under
/// [`BlankCellPolicy::Keep`], so `"a|b||"` has four cells.
pub fn parse_delimited_line(line: &str, delimiter: char, policy: BlankCellPolicy) -> Row {
    row_from_cells(split_fields(line, delimiter).map(Some), policy)
}

/// Raw fields of one line, line terminator removed. No quoting is recognised.
pub(crate) fn split_fields(line: &str, delimiter: char) -> std::str::Split<'_, char> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.split(delimiter)
}

/// Build a row from an already-split record. `None` cells are skipped.
pub fn row_from_cells<'a, I>(cells: I, policy: BlankCellPolicy) -> Row
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    cells
        .into_iter()
        .enumerate()
        .filter_map(|(ordinal, cell)| match cell {
            Some(value) if policy.admits(value) => Some((ordinal, value.to_owned())),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{parse_delimited_line, row_from_cells, BlankCellPolicy};

    #[test]
    fn pipe_line_is_indexed_by_position() {
        let row = parse_delimited_line("data_set_id_1|val1|val2\n", '|', BlankCellPolicy::Keep);
        assert_eq!(row.get(0), Some("data_set_id_1"));
        assert_eq!(row.get(1), Some("val1"));
        assert_eq!(row.get(2), Some("val2"));
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn trailing_empty_fields_are_tolerated() {
        let keep = parse_delimited_line("a,b,,\r\n", ',', BlankCellPolicy::Keep);
        assert_eq!(keep.len(), 4);
        assert_eq!(keep.get(3), Some(""));

        let skip = parse_delimited_line("a,b,,", ',', BlankCellPolicy::Skip);
        assert_eq!(skip.len(), 2);
        assert!(!skip.contains(2));
    }

    #[test]
    fn quote_characters_are_plain_text() {
        let row = parse_delimited_line("case_1|\"Main St|open\n", '|', BlankCellPolicy::Keep);
        assert_eq!(row.values(), vec!["case_1", "\"Main St", "open"]);
    }

    #[test]
    fn null_cells_are_skipped_without_error() {
        let row = row_from_cells(vec![Some("k"), None, Some("v")], BlankCellPolicy::Keep);
        assert_eq!(row.len(), 2);
        assert_eq!(row.get(1), None);
        assert_eq!(row.get(2), Some("v"));
    }

    #[test]
    fn skip_policy_drops_whitespace_only_cells() {
        let row = row_from_cells(vec![Some("k"), Some("   "), Some("v")], BlankCellPolicy::Skip);
        assert_eq!(row.iter().collect::<Vec<_>>(), vec![(0, "k"), (2, "v")]);
    }
}
