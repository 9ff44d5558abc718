use std::fmt;

use serde::Deserialize;

/// A column addressed by header name or by zero-based position.
///
/// In TOML, `code = "Code"` names a column and `code = 0` indexes one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Index(usize),
    Name(String),
}

impl ColumnRef {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Position of the column; names match case-insensitively.
    pub fn resolve(&self, headers: &[String]) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Name(name) => headers
                .iter()
                .position(|header| header.eq_ignore_ascii_case(name.trim())),
        }
    }
}

impl From<usize> for ColumnRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}
