//! Crash-safe local persistence for scenarios: validated paths, atomic JSON
//! writes, timestamped backups and integrity hashing.

mod backup;
mod error;
mod integrity;
mod json;
mod paths;
mod repository;
mod store;

pub use backup::{BackupInfo, BackupManager};
pub use error::StorageError;
pub use integrity::scenario_hash;
pub use json::JsonScenarioRepository;
pub use paths::{validate_scenario_id, StoragePaths, BACKUP_DIR};
pub use repository::ScenarioRepository;
pub use store::{FileStore, ScenarioSummary, StoreOptions, DEFAULT_BACKUP_RETENTION};
