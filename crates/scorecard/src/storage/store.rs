use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::scenario::Scenario;

use super::backup::{BackupInfo, BackupManager};
use super::error::StorageError;
use super::integrity::scenario_hash;
use super::json::JsonScenarioRepository;
use super::paths::StoragePaths;
use super::repository::ScenarioRepository;

pub const DEFAULT_BACKUP_RETENTION: usize = 5;

/// How [`FileStore::save`] treats the file it is about to overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub backup_on_save: bool,
    pub backup_retention: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            backup_on_save: false,
            backup_retention: DEFAULT_BACKUP_RETENTION,
        }
    }
}

/// Listing row for a stored scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub id: String,
    pub title: String,
    pub modified_at: DateTime<Utc>,
    pub weights_locked: bool,
}

/// JSON repository plus backup management for one storage directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    repository: JsonScenarioRepository,
    backups: BackupManager,
    options: StoreOptions,
}

impl FileStore {
    /// Create the directory layout if needed and return a store rooted there.
    pub fn open(paths: StoragePaths, options: StoreOptions) -> Result<Self, StorageError> {
        paths.ensure()?;
        Ok(Self {
            repository: JsonScenarioRepository::new(paths.clone()),
            backups: BackupManager::new(paths),
            options,
        })
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn paths(&self) -> &StoragePaths {
        self.repository.paths()
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Save using the configured backup policy.
    pub fn save(&self, scenario: &Scenario) -> Result<Option<BackupInfo>, StorageError> {
        self.save_with(scenario, self.options.backup_on_save)
    }

    /// Save, first copying the committed file aside when `create_backup` is set
    /// and a committed file exists. Old backups beyond the retention count are
    /// pruned after a successful save.
    pub fn save_with(
        &self,
        scenario: &Scenario,
        create_backup: bool,
    ) -> Result<Option<BackupInfo>, StorageError> {
        let backup = if create_backup && self.repository.exists(&scenario.id)? {
            Some(self.backups.create(&scenario.id)?)
        } else {
            None
        };

        self.repository.save(scenario)?;

        if backup.is_some() {
            self.backups
                .cleanup(&scenario.id, self.options.backup_retention)?;
        }
        Ok(backup)
    }

    pub fn load(&self, id: &str) -> Result<Scenario, StorageError> {
        self.repository.load(id)
    }

    pub fn exists(&self, id: &str) -> Result<bool, StorageError> {
        self.repository.exists(id)
    }

    pub fn list(&self) -> Result<Vec<String>, StorageError> {
        self.repository.list()
    }

    pub fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.repository.delete(id)
    }

    /// Every loadable scenario, most recently modified first. Files that fail
    /// to load are logged and skipped.
    pub fn summaries(&self) -> Result<Vec<ScenarioSummary>, StorageError> {
        let mut summaries = Vec::new();
        for id in self.repository.list()? {
            match self.repository.load(&id) {
                Ok(scenario) => summaries.push(ScenarioSummary {
                    id: scenario.id,
                    title: scenario.title,
                    modified_at: scenario.modified_at,
                    weights_locked: scenario.weights_locked,
                }),
                Err(err) => warn!(scenario = %id, error = %err, "skipping unreadable scenario"),
            }
        }

        summaries.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        Ok(summaries)
    }

    pub fn list_backups(&self, id: &str) -> Result<Vec<BackupInfo>, StorageError> {
        self.backups.list(id)
    }

    pub fn restore_from_backup(&self, id: &str, filename: &str) -> Result<Scenario, StorageError> {
        self.backups.restore(id, filename)
    }

    pub fn cleanup_old_backups(&self, id: &str, keep: usize) -> Result<usize, StorageError> {
        self.backups.cleanup(id, keep)
    }

    pub fn hash(&self, scenario: &Scenario) -> Result<String, StorageError> {
        scenario_hash(scenario)
    }
}

impl ScenarioRepository for FileStore {
    fn save(&self, scenario: &Scenario) -> Result<(), StorageError> {
        FileStore::save(self, scenario).map(|_| ())
    }

    fn load(&self, id: &str) -> Result<Scenario, StorageError> {
        FileStore::load(self, id)
    }

    fn exists(&self, id: &str) -> Result<bool, StorageError> {
        FileStore::exists(self, id)
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        FileStore::list(self)
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        FileStore::delete(self, id)
    }
}
