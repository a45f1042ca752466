//! Saved test setups
//!
//! The wizard writes its result into the project directory and can resume
//! from such a file later.

use anyhow::{Context, Result};
use log::info;
use mcy_create_core::{TestSetupSnapshot, SETUP_FILE_NAME};
use std::path::{Path, PathBuf};

/// Write `snapshot` into `directory`, returning the path of the written file
pub fn save_setup(directory: &Path, snapshot: &TestSetupSnapshot) -> Result<PathBuf> {
    snapshot.validate()?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Could not create {}", directory.display()))?;

    let path = directory.join(SETUP_FILE_NAME);
    let content = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(&path, content).with_context(|| format!("Could not write {}", path.display()))?;
    info!("Saved test setup to {}", path.display());
    Ok(path)
}

/// Read a saved setup and check it can be loaded into the page
pub fn load_setup(path: &Path) -> Result<TestSetupSnapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    let snapshot: TestSetupSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Invalid setup file {}", path.display()))?;
    snapshot.validate()?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcy_create_core::{MutationSize, TestFile};

    fn snapshot() -> TestSetupSnapshot {
        TestSetupSnapshot::new(
            MutationSize::new(100).unwrap(),
            vec![TestFile::new("sim", "bash test_sim.sh").with_path("test_sim.sh")],
            vec![TestFile::reference("eq", "bash test_eq.sh", 95)],
        )
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_setup(dir.path(), &snapshot()).unwrap();
        assert_eq!(path, dir.path().join(SETUP_FILE_NAME));
        assert_eq!(load_setup(&path).unwrap(), snapshot());
    }

    #[test]
    fn test_load_rejects_duplicate_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETUP_FILE_NAME);
        let json = r#"{
            "mutation_size": 5,
            "tests": [{"name": "a", "command": "x"}],
            "reference_tests": [{"name": "a", "command": "y", "reference": true}]
        }"#;
        std::fs::write(&path, json).unwrap();
        let err = load_setup(&path).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_load_rejects_invalid_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETUP_FILE_NAME);
        let json = r#"{
            "mutation_size": 5,
            "tests": [{"name": "sim", "command": "make sim"}],
            "reference_tests": [{"name": "", "command": "", "reference": true, "percentage": 250}]
        }"#;
        std::fs::write(&path, json).unwrap();
        let err = load_setup(&path).unwrap_err();
        assert!(err.to_string().contains("is invalid"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_setup(&dir.path().join("missing.json")).is_err());
    }
}
