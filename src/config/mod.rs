//! Configuration management

mod settings;
mod setup_file;

pub use settings::{AppConfig, WindowConfig, WizardDefaults};
pub use setup_file::{load_setup, save_setup};
