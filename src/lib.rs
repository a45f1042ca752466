//! mcy-create: wizard for setting up a new mcy mutation coverage project
//!
//! This library provides:
//! - The GTK wizard window and its pages
//! - The add/edit test dialog
//! - Configuration and saved setup files
//!
//! The page controller itself lives in `mcy-create-core`, which has no GTK
//! dependency.

pub mod config;
pub mod ui;

// Re-export commonly used types
pub use config::AppConfig;
pub use mcy_create_core::{TestSetupPage, TestSetupSnapshot};
