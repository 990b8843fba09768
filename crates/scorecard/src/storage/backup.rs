use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, SubsecRound, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::scenario::{Scenario, ScenarioError};

use super::error::StorageError;
use super::json::{read_scenario, write_atomic};
use super::paths::{validate_scenario_id, StoragePaths, SCENARIO_EXTENSION};

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A backup file on disk. `created` comes from the timestamp in the filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    pub created: NaiveDateTime,
}

/// Timestamped copies of committed scenario files under `<base>/backups/`,
/// named `<id>_<YYYYMMDD_HHMMSS>.json`.
#[derive(Debug, Clone)]
pub struct BackupManager {
    paths: StoragePaths,
}

impl BackupManager {
    pub fn new(paths: StoragePaths) -> Self {
        Self { paths }
    }

    /// Copy the committed file for `scenario_id` into the backup directory.
    /// Two backups within the same second share a name; the later one wins.
    pub fn create(&self, scenario_id: &str) -> Result<BackupInfo, StorageError> {
        let source = self.paths.scenario_file(scenario_id)?;
        if !source.is_file() {
            return Err(StorageError::NotFound(scenario_id.to_owned()));
        }

        let dir = self.paths.backup_dir();
        fs::create_dir_all(&dir)
            .map_err(|source| StorageError::io("create directory", &dir, source))?;

        let bytes = fs::read(&source).map_err(|err| StorageError::io("read", &source, err))?;
        let created = Utc::now().naive_utc().trunc_subsecs(0);
        let filename = backup_filename(scenario_id, created);
        let path = dir.join(&filename);
        write_atomic(&path, &bytes)?;

        info!(scenario = %scenario_id, backup = %filename, "backup created");
        Ok(BackupInfo {
            filename,
            path,
            created,
        })
    }

    /// All backups for `scenario_id`, newest first.
    pub fn list(&self, scenario_id: &str) -> Result<Vec<BackupInfo>, StorageError> {
        validate_scenario_id(scenario_id)?;

        let dir = self.paths.backup_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|source| StorageError::io("list", &dir, source))?;
        let mut backups = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| StorageError::io("list", &dir, source))?
                .path();
            let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if let Some(created) = parse_backup_filename(filename, scenario_id) {
                backups.push(BackupInfo {
                    filename: filename.to_owned(),
                    path: path.clone(),
                    created,
                });
            }
        }

        backups.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(backups)
    }

    /// Parse a backup back into a scenario value. The file must belong to
    /// `scenario_id`; the committed scenario file is left untouched.
    pub fn restore(&self, scenario_id: &str, filename: &str) -> Result<Scenario, StorageError> {
        validate_scenario_id(scenario_id)?;
        if parse_backup_filename(filename, scenario_id).is_none() {
            return Err(StorageError::BackupNotFound(filename.to_owned()));
        }

        let path = self.paths.backup_dir().join(filename);
        if !path.is_file() {
            return Err(StorageError::BackupNotFound(filename.to_owned()));
        }

        let scenario = read_scenario(&path)?;
        if scenario.id != scenario_id {
            return Err(StorageError::Invalid {
                path,
                source: ScenarioError::validation(format!(
                    "backup holds scenario '{}', expected '{scenario_id}'",
                    scenario.id
                )),
            });
        }
        debug!(scenario = %scenario_id, backup = %filename, "backup restored");
        Ok(scenario)
    }

    /// Keep the `keep` most recent backups of `scenario_id` and delete the rest.
    /// Returns the number of files removed.
    pub fn cleanup(&self, scenario_id: &str, keep: usize) -> Result<usize, StorageError> {
        let backups = self.list(scenario_id)?;
        let mut removed = 0;
        for backup in backups.iter().skip(keep) {
            remove_backup(&backup.path)?;
            removed += 1;
        }

        if removed > 0 {
            info!(scenario = %scenario_id, removed, keep, "old backups pruned");
        }
        Ok(removed)
    }
}

fn remove_backup(path: &Path) -> Result<(), StorageError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(StorageError::io("delete", path, err)),
    }
}

pub(crate) fn backup_filename(scenario_id: &str, created: NaiveDateTime) -> String {
    format!(
        "{scenario_id}_{}.{SCENARIO_EXTENSION}",
        created.format(BACKUP_TIMESTAMP_FORMAT)
    )
}

/// Timestamp of a backup filename when it belongs to `scenario_id`. Prefix
/// matching alone would also claim backups of `a_b` for scenario `a`, so the
/// remainder must be exactly a timestamp.
pub(crate) fn parse_backup_filename(filename: &str, scenario_id: &str) -> Option<NaiveDateTime> {
    let stem = filename.strip_suffix(&format!(".{SCENARIO_EXTENSION}"))?;
    let stamp = stem.strip_prefix(scenario_id)?.strip_prefix('_')?;
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .and_then(|date| date.and_hms_opt(14, 5, 9))
            .expect("valid timestamp")
    }

    #[test]
    fn filename_embeds_id_and_second_resolution_timestamp() {
        assert_eq!(backup_filename("abc-1", stamp()), "abc-1_20250601_140509.json");
    }

    #[test]
    fn parsing_ignores_backups_of_other_scenarios() {
        let name = backup_filename("a_b", stamp());
        assert_eq!(parse_backup_filename(&name, "a_b"), Some(stamp()));
        assert_eq!(parse_backup_filename(&name, "a"), None);
        assert_eq!(parse_backup_filename("a_b_20250601_140509.tmp", "a_b"), None);
    }
}
