//! mcy-create-core: Controller logic for the mcy project wizard.
//!
//! This crate contains the test setup page controller, the contract with
//! the test entry dialog, and the host wizard's field registry and page
//! navigation. Nothing here depends on GTK, so the page can be driven and
//! tested headlessly.

pub mod constants;
mod entry;
mod error;
mod snapshot;
mod test_list;
mod test_setup;
mod wizard;

pub use constants::{FIELD_DIRECTORY, FIELD_MUTATIONS_SIZE, NO_FIXED_SUCCESSOR, SETUP_FILE_NAME};
pub use entry::{finish_entry, validate_entry, EntryRequest, TestEntryFlow};
pub use error::{EntryError, FieldError, MutationSizeError, SnapshotError};
pub use snapshot::TestSetupSnapshot;
pub use test_list::{TestList, TestRow};
pub use test_setup::{parse_mutation_size, CompleteChangedCallback, ReferenceColumn, TestSetupPage};
pub use wizard::{clean_path, FieldRegistry, PageNavigator, WizardFields};

// Re-export types used in the controller's signatures for convenience
pub use mcy_create_types::{ListKind, MutationSize, RowId, TestFile};
