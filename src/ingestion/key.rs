//! Primary-key column selection.

use serde::{Deserialize, Serialize};

use crate::error::{DataInputError, DataInputResult};

/// Which column supplies the data id of each row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyColumn {
    /// A fixed column ordinal.
    Ordinal(usize),
    /// A header label, resolved to an ordinal once against the header row.
    Named(String),
}

impl Default for KeyColumn {
    fn default() -> Self {
        Self::Ordinal(0)
    }
}

impl From<usize> for KeyColumn {
    fn from(ordinal: usize) -> Self {
        Self::Ordinal(ordinal)
    }
}

impl From<&str> for KeyColumn {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

impl KeyColumn {
    /// Resolve to an ordinal.
    ///
    /// `header` is `None` when the source has no header row. An unmatched name is an error unless
    /// `fallback_to_first_column` is set, in which case ordinal 0 is used.
    pub fn resolve(
        &self,
        header: Option<&[String]>,
        fallback_to_first_column: bool,
    ) -> DataInputResult<usize> {
        let name = match self {
            Self::Ordinal(ordinal) => return Ok(*ordinal),
            Self::Named(name) => name,
        };

        let found = header.and_then(|cells| cells.iter().position(|h| h.trim() == name.trim()));
        match found {
            Some(ordinal) => Ok(ordinal),
            None if fallback_to_first_column => Ok(0),
            None => Err(DataInputError::HeaderKeyNotFound {
                column: name.clone(),
                headers: header.map(<[String]>::to_vec).unwrap_or_default(),
            }),
        }
    }
}
