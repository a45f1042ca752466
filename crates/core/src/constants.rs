//! Shared constants for the wizard

/// Wizard field holding the project directory (base path for test files)
pub const FIELD_DIRECTORY: &str = "directory";

/// Wizard field holding the mutation sample size
pub const FIELD_MUTATIONS_SIZE: &str = "mutations_size";

/// Page id meaning "no fixed successor": the host picks the next page in order
pub const NO_FIXED_SUCCESSOR: i32 = -1;

/// File written into the project directory when the wizard finishes
pub const SETUP_FILE_NAME: &str = "mcy-create.json";
