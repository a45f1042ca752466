//! Serializable copy of a completed test setup page

use crate::entry::check_record;
use crate::error::SnapshotError;
use mcy_create_types::{ListKind, MutationSize, TestFile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What the wizard writes out when it finishes, and reads back to resume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSetupSnapshot {
    /// Version of the file format
    #[serde(default = "default_version")]
    pub version: u32,
    pub mutation_size: MutationSize,
    pub tests: Vec<TestFile>,
    #[serde(default)]
    pub reference_tests: Vec<TestFile>,
}

fn default_version() -> u32 {
    1
}

impl TestSetupSnapshot {
    pub fn new(
        mutation_size: MutationSize,
        tests: Vec<TestFile>,
        reference_tests: Vec<TestFile>,
    ) -> Self {
        Self {
            version: default_version(),
            mutation_size,
            tests,
            reference_tests,
        }
    }

    /// Check the invariants the page relies on
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.tests.is_empty() {
            return Err(SnapshotError::NoTests);
        }
        let mut seen = HashSet::new();
        let lists = [
            (ListKind::Tests, &self.tests),
            (ListKind::Reference, &self.reference_tests),
        ];
        for (kind, files) in lists {
            for file in files {
                check_record(file)
                    .map_err(|e| SnapshotError::InvalidEntry(file.name.clone(), e))?;
                if file.reference != kind.is_reference() {
                    return Err(SnapshotError::WrongList(kind, file.name.clone()));
                }
                if !seen.insert(file.name.as_str()) {
                    return Err(SnapshotError::DuplicateName(file.name.clone()));
                }
            }
        }
        Ok(())
    }
}
