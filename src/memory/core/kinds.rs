//! Memory record kinds.
//!
//! The `memories` table holds two kinds of rows: structured facts
//! (subject/relation/object triples) and free-text episodes. The import
//! pipeline only ever writes episodes, but the kind is modelled in full so the
//! stats queries and the table's `CHECK` constraint share one source of truth.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The category of a row in the `memories` table.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    /// A subject/relation/object triple.
    Fact,
    /// A free-text record of something that happened (an imported message).
    Episode,
}

/// Parse error for [`MemoryKind`].
#[derive(Debug, Clone)]
pub struct MemoryKindParseError {
    value: String,
}

impl MemoryKindParseError {
    /// The raw value that failed parsing.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for MemoryKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid memory kind: {}", self.value)
    }
}

impl std::error::Error for MemoryKindParseError {}

impl MemoryKind {
    /// All kinds accepted by the store.
    pub const ALL: &'static [Self] = &[Self::Fact, Self::Episode];

    /// Stable storage identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fact => "fact",
            Self::Episode => "episode",
        }
    }
}

impl fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryKind {
    type Err = MemoryKindParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fact" => Ok(Self::Fact),
            "episode" => Ok(Self::Episode),
            _ => Err(MemoryKindParseError {
                value: value.to_string(),
            }),
        }
    }
}
