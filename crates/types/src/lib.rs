//! mcy-create-types: Shared data types for the mcy project wizard.
//!
//! This crate contains pure data types (test records, row identifiers,
//! field values) shared by the controller and UI crates. These types have
//! no GTK dependencies, making them suitable as a foundation layer.

pub mod mutation;
pub mod row;
pub mod test_file;

pub use mutation::MutationSize;
pub use row::RowId;
pub use test_file::{ListKind, TestFile};
