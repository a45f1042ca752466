//! Test records attached to the test setup page.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which of the two page lists an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    /// Tests run against every mutation
    Tests,
    /// Reference tests with a pass-rate threshold
    Reference,
}

impl ListKind {
    /// Whether records in this list are reference tests
    pub fn is_reference(self) -> bool {
        matches!(self, ListKind::Reference)
    }
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListKind::Tests => write!(f, "tests"),
            ListKind::Reference => write!(f, "reference tests"),
        }
    }
}

fn default_percentage() -> u8 {
    100
}

/// One test attached to the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestFile {
    /// Unique name across both lists
    pub name: String,
    /// Command line that runs the test
    pub command: String,
    /// Test script, relative to the project directory when inside it
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Reference test (has a pass-rate threshold)
    #[serde(default)]
    pub reference: bool,
    /// Reference test used as an early-exit probe
    #[serde(default)]
    pub probe: bool,
    /// Pass-rate threshold in percent (0-100)
    #[serde(default = "default_percentage")]
    pub percentage: u8,
}

impl TestFile {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            path: None,
            reference: false,
            probe: false,
            percentage: default_percentage(),
        }
    }

    /// Create a reference test with the given pass-rate threshold
    pub fn reference(name: impl Into<String>, command: impl Into<String>, percentage: u8) -> Self {
        Self {
            reference: true,
            percentage,
            ..Self::new(name, command)
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Text shown in the percentage column of the reference list
    pub fn percentage_label(&self) -> String {
        self.percentage.to_string()
    }
}
