use std::path::{Path, PathBuf};

use super::error::StorageError;

pub const SCENARIO_EXTENSION: &str = "json";
pub const BACKUP_DIR: &str = "backups";

/// Reject anything that is not `[A-Za-z0-9_-]+` before a path is built from it.
pub fn validate_scenario_id(id: &str) -> Result<(), StorageError> {
    let invalid = |reason| StorageError::InvalidId {
        id: id.to_owned(),
        reason,
    };

    if id.trim().is_empty() {
        return Err(invalid("scenario id cannot be empty"));
    }
    if id.contains("..") || id.contains('/') || id.contains('\\') {
        return Err(invalid("contains path separators"));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(invalid("only letters, digits, '_' and '-' are allowed"));
    }
    Ok(())
}

/// Directory layout: `<base>/<id>.json` plus `<base>/backups/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    base: PathBuf,
}

impl StoragePaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.base.join(BACKUP_DIR)
    }

    pub fn scenario_file(&self, id: &str) -> Result<PathBuf, StorageError> {
        validate_scenario_id(id)?;
        Ok(self.base.join(format!("{id}.{SCENARIO_EXTENSION}")))
    }

    pub fn ensure(&self) -> Result<(), StorageError> {
        let backups = self.backup_dir();
        std::fs::create_dir_all(&backups)
            .map_err(|source| StorageError::io("create directory", backups, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_generated_and_hand_written_ids() {
        for id in ["1f0c2a9e-5b3", "scenario_01", "ABC-def"] {
            assert!(validate_scenario_id(id).is_ok(), "{id} should be accepted");
        }
    }

    #[test]
    fn rejects_traversal_and_unsafe_characters() {
        for id in ["", "   ", "../etc", "a/b", "a\\b", "..", "name.json", "space id", "ümlaut"] {
            match validate_scenario_id(id) {
                Err(StorageError::InvalidId { .. }) => {}
                other => panic!("expected {id:?} to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn scenario_file_lives_under_base() {
        let paths = StoragePaths::new("/data/scenarios");
        let file = paths.scenario_file("abc").expect("valid id");
        assert_eq!(file, PathBuf::from("/data/scenarios/abc.json"));
        assert_eq!(paths.backup_dir(), PathBuf::from("/data/scenarios/backups"));
    }
}
