use crate::scenario::Scenario;

use super::error::StorageError;

/// Storage abstraction for whole scenarios. The engine only depends on this
/// capability set, so other backends can slot in beside the JSON files.
pub trait ScenarioRepository: Send + Sync {
    fn save(&self, scenario: &Scenario) -> Result<(), StorageError>;
    fn load(&self, id: &str) -> Result<Scenario, StorageError>;
    fn exists(&self, id: &str) -> Result<bool, StorageError>;
    fn list(&self) -> Result<Vec<String>, StorageError>;
    fn delete(&self, id: &str) -> Result<(), StorageError>;
}
