//! Contract with the test entry dialog
//!
//! The page never builds `TestFile` records itself. It describes what it
//! wants in an [`EntryRequest`] and hands it to a [`TestEntryFlow`], which
//! returns the accepted record or `None` when the user cancels.

use crate::error::EntryError;
use mcy_create_types::TestFile;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Everything the entry dialog needs to open
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRequest {
    /// Cleaned project directory; test scripts are resolved against it
    pub base_dir: PathBuf,
    /// Reference mode adds the pass-rate threshold
    pub reference: bool,
    /// Record being edited, `None` when adding
    pub existing: Option<TestFile>,
    /// Names already used by other entries of either list
    pub taken_names: BTreeSet<String>,
}

impl EntryRequest {
    pub fn is_edit(&self) -> bool {
        self.existing.is_some()
    }

    pub fn is_name_taken(&self, name: &str) -> bool {
        self.taken_names.contains(name)
    }

    /// Initial values for the dialog's fields
    pub fn initial(&self) -> TestFile {
        match &self.existing {
            Some(file) => file.clone(),
            None if self.reference => TestFile::reference("", "", 100),
            None => TestFile::new("", ""),
        }
    }
}

/// Modal entry flow: blocks until the user accepts or cancels
pub trait TestEntryFlow {
    /// Returns the accepted record, or `None` if the dialog was cancelled
    fn exec(&mut self, request: &EntryRequest) -> Option<TestFile>;
}

/// Check a record before the dialog is allowed to accept it
pub fn validate_entry(file: &TestFile, request: &EntryRequest) -> Result<(), EntryError> {
    let name = file.name.trim();
    check_name(name)?;
    if request.is_name_taken(name) {
        return Err(EntryError::DuplicateName(name.to_string()));
    }
    check_contents(file)
}

/// Rules every stored record satisfies, whatever produced it
pub(crate) fn check_record(file: &TestFile) -> Result<(), EntryError> {
    check_name(&file.name)?;
    check_contents(file)
}

fn check_name(name: &str) -> Result<(), EntryError> {
    if name.is_empty() {
        return Err(EntryError::EmptyName);
    }
    if name
        .chars()
        .any(|c| c.is_whitespace() || c == '[' || c == ']')
    {
        return Err(EntryError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn check_contents(file: &TestFile) -> Result<(), EntryError> {
    if file.command.trim().is_empty() {
        return Err(EntryError::EmptyCommand);
    }
    if file.percentage > 100 {
        return Err(EntryError::PercentageOutOfRange(file.percentage));
    }
    Ok(())
}

/// Normalise a record the dialog is about to return: trimmed text, the
/// reference flag of the request, and a script path relative to `base_dir`
/// when it lies inside it.
pub fn finish_entry(mut file: TestFile, request: &EntryRequest) -> TestFile {
    file.name = file.name.trim().to_string();
    file.command = file.command.trim().to_string();
    file.reference = request.reference;
    if !request.reference {
        file.probe = false;
    }
    file.path = file
        .path
        .take()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| relative_to(&p, &request.base_dir));
    file
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    match path.strip_prefix(base) {
        Ok(rel) if path.is_absolute() => rel.to_path_buf(),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(reference: bool, taken: &[&str]) -> EntryRequest {
        EntryRequest {
            base_dir: PathBuf::from("/work/proj"),
            reference,
            existing: None,
            taken_names: taken.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_valid_entry() {
        let file = TestFile::new("sim", "bash test_sim.sh");
        assert_eq!(validate_entry(&file, &request(false, &["eq"])), Ok(()));
    }

    #[test]
    fn test_rejects_duplicate_name() {
        let file = TestFile::new("eq", "bash test_eq.sh");
        assert_eq!(
            validate_entry(&file, &request(false, &["eq"])),
            Err(EntryError::DuplicateName("eq".to_string()))
        );
    }

    #[test]
    fn test_rejects_malformed_entries() {
        let req = request(false, &[]);
        assert_eq!(
            validate_entry(&TestFile::new("  ", "x"), &req),
            Err(EntryError::EmptyName)
        );
        assert_eq!(
            validate_entry(&TestFile::new("a b", "x"), &req),
            Err(EntryError::InvalidName("a b".to_string()))
        );
        assert_eq!(
            validate_entry(&TestFile::new("t[1]", "x"), &req),
            Err(EntryError::InvalidName("t[1]".to_string()))
        );
        assert_eq!(
            validate_entry(&TestFile::new("a", " "), &req),
            Err(EntryError::EmptyCommand)
        );
        assert_eq!(
            validate_entry(&TestFile::reference("a", "x", 101), &request(true, &[])),
            Err(EntryError::PercentageOutOfRange(101))
        );
    }

    #[test]
    fn test_initial_values() {
        assert!(!request(false, &[]).initial().reference);
        let reference = request(true, &[]).initial();
        assert!(reference.reference);
        assert_eq!(reference.percentage, 100);

        let mut edit = request(false, &[]);
        edit.existing = Some(TestFile::new("eq", "make eq"));
        assert!(edit.is_edit());
        assert_eq!(edit.initial().name, "eq");
    }

    #[test]
    fn test_finish_entry_relativizes_path() {
        let file = TestFile::new(" sim ", " bash run.sh ").with_path("/work/proj/tests/run.sh");
        let done = finish_entry(file, &request(false, &[]));
        assert_eq!(done.name, "sim");
        assert_eq!(done.command, "bash run.sh");
        assert_eq!(done.path, Some(PathBuf::from("tests/run.sh")));

        let outside = TestFile::new("o", "x").with_path("/elsewhere/run.sh");
        let done = finish_entry(outside, &request(false, &[]));
        assert_eq!(done.path, Some(PathBuf::from("/elsewhere/run.sh")));

        let empty = TestFile::new("e", "x").with_path("");
        assert_eq!(finish_entry(empty, &request(false, &[])).path, None);
    }

    #[test]
    fn test_finish_entry_applies_mode() {
        let mut file = TestFile::new("p", "x");
        file.probe = true;
        let done = finish_entry(file, &request(false, &[]));
        assert!(!done.reference);
        assert!(!done.probe);

        let done = finish_entry(TestFile::new("r", "x"), &request(true, &[]));
        assert!(done.reference);
    }
}
