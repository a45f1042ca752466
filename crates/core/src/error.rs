//! Error types for the wizard controller

use mcy_create_types::MutationSize;
use thiserror::Error;

/// Rejected input for the mutation size field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationSizeError {
    #[error("'{0}' is not a whole number")]
    NotANumber(String),
    #[error("mutation size {0} is outside {}..={}", MutationSize::MIN, MutationSize::MAX)]
    OutOfRange(u64),
    #[error("mutation size {0} is outside {}..={}", MutationSize::MIN, MutationSize::MAX)]
    TooLarge(String),
}

/// Reasons the entry dialog refuses to accept a test
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("test name is empty")]
    EmptyName,
    #[error("test name '{0}' may not contain whitespace or brackets")]
    InvalidName(String),
    #[error("a test named '{0}' already exists")]
    DuplicateName(String),
    #[error("test command is empty")]
    EmptyCommand,
    #[error("percentage {0} is above 100")]
    PercentageOutOfRange(u8),
}

/// Lookup or update of a field the wizard does not know about
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown wizard field '{0}'")]
    Unknown(String),
}

/// A saved setup that cannot be loaded into the page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("test name '{0}' appears more than once")]
    DuplicateName(String),
    #[error("{0} entry '{1}' has the wrong reference flag")]
    WrongList(mcy_create_types::ListKind, String),
    #[error("setup has no tests")]
    NoTests,
    #[error("entry '{0}' is invalid: {1}")]
    InvalidEntry(String, EntryError),
}
