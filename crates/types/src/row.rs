//! Stable row identifiers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of one list entry, independent of its position in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(Uuid);

impl RowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RowId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}
