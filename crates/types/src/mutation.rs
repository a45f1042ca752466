//! Mutation sample size

use serde::{Deserialize, Serialize};

/// Number of mutations sampled from the design, within [`MutationSize::MIN`, `MutationSize::MAX`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct MutationSize(u32);

impl MutationSize {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 100_000;

    /// Returns `None` when `value` is outside the accepted range
    pub fn new(value: u32) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for MutationSize {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            format!(
                "mutation size {} outside {}..={}",
                value,
                Self::MIN,
                Self::MAX
            )
        })
    }
}

impl From<MutationSize> for u32 {
    fn from(size: MutationSize) -> Self {
        size.0
    }
}

impl std::fmt::Display for MutationSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
