use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::scenario::Scenario;

use super::error::StorageError;
use super::paths::{validate_scenario_id, StoragePaths, SCENARIO_EXTENSION};
use super::repository::ScenarioRepository;

const TEMP_EXTENSION: &str = "tmp";

/// One pretty-printed JSON document per scenario at `<base>/<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonScenarioRepository {
    paths: StoragePaths,
}

impl JsonScenarioRepository {
    pub fn new(paths: StoragePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }
}

impl ScenarioRepository for JsonScenarioRepository {
    fn save(&self, scenario: &Scenario) -> Result<(), StorageError> {
        let path = self.paths.scenario_file(&scenario.id)?;
        let bytes = serde_json::to_vec_pretty(scenario).map_err(|source| {
            StorageError::Serialize {
                id: scenario.id.clone(),
                source,
            }
        })?;

        let base = self.paths.base();
        fs::create_dir_all(base)
            .map_err(|source| StorageError::io("create directory", base, source))?;
        write_atomic(&path, &bytes)?;

        info!(scenario = %scenario.id, path = %path.display(), "scenario saved");
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Scenario, StorageError> {
        let path = self.paths.scenario_file(id)?;
        if !path.is_file() {
            return Err(StorageError::NotFound(id.to_owned()));
        }

        let scenario = read_scenario(&path)?;
        debug!(scenario = %id, "scenario loaded");
        Ok(scenario)
    }

    fn exists(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.paths.scenario_file(id)?.is_file())
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        let base = self.paths.base();
        if !base.exists() {
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(base).map_err(|source| StorageError::io("list", base, source))?;

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| StorageError::io("list", base, source))?
                .path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(SCENARIO_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                if validate_scenario_id(stem).is_ok() {
                    ids.push(stem.to_owned());
                }
            }
        }

        ids.sort();
        Ok(ids)
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        let path = self.paths.scenario_file(id)?;
        if !path.is_file() {
            return Err(StorageError::NotFound(id.to_owned()));
        }

        fs::remove_file(&path).map_err(|source| StorageError::io("delete", &path, source))?;
        info!(scenario = %id, "scenario deleted");
        Ok(())
    }
}

/// Parse and validate a scenario document.
pub(crate) fn read_scenario(path: &Path) -> Result<Scenario, StorageError> {
    let raw = fs::read_to_string(path).map_err(|source| StorageError::io("read", path, source))?;
    let scenario: Scenario = serde_json::from_str(&raw).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    scenario.validate().map_err(|source| StorageError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(scenario)
}

/// Write to a sibling temp file, flush it to disk, then rename over `path`.
/// Readers of `path` see either the old document or the new one, never a
/// partial write. The temp file is removed if anything fails.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let temp = path.with_extension(TEMP_EXTENSION);

    let result = File::create(&temp)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&temp, path));

    result.map_err(|source| {
        if temp.exists() {
            let _ = fs::remove_file(&temp);
        }
        StorageError::io("write", path, source)
    })
}
