use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::scenario::{CatalogError, CriteriaCatalog};
use crate::storage::{StoragePaths, StoreOptions, DEFAULT_BACKUP_RETENTION};

const DEFAULT_STORAGE_DIR: &str = ".scorecard_scenarios";
const DEFAULT_ACTOR: &str = "facilitator";

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
    pub telemetry: TelemetryConfig,
    /// Actor recorded in audit events when a command does not name one.
    pub actor: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_dir = env::var("APP_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_storage_dir());

        let backup_on_save = match env::var("APP_BACKUP_ON_SAVE") {
            Ok(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidBackupFlag(raw))?,
            Err(_) => true,
        };

        let backup_retention = match env::var("APP_BACKUP_RETENTION") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|keep| *keep > 0)
                .ok_or(ConfigError::InvalidRetention(raw))?,
            Err(_) => DEFAULT_BACKUP_RETENTION,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let actor = env::var("APP_ACTOR")
            .ok()
            .filter(|actor| !actor.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ACTOR.to_string());

        Ok(Self {
            environment,
            storage: StorageConfig {
                base_dir,
                backup_on_save,
                backup_retention,
            },
            catalog: CatalogConfig {
                criteria_path: env::var("APP_CRITERIA_PATH").ok().map(PathBuf::from),
                descriptions_csv: env::var("APP_CRITERIA_DESCRIPTIONS").ok().map(PathBuf::from),
            },
            telemetry: TelemetryConfig { log_level },
            actor,
        })
    }
}

/// Where scenarios live and how saves treat existing files.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub base_dir: PathBuf,
    pub backup_on_save: bool,
    pub backup_retention: usize,
}

impl StorageConfig {
    pub fn paths(&self) -> StoragePaths {
        StoragePaths::new(self.base_dir.clone())
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            backup_on_save: self.backup_on_save,
            backup_retention: self.backup_retention,
        }
    }
}

/// Criteria seed list used for new scenarios.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub criteria_path: Option<PathBuf>,
    pub descriptions_csv: Option<PathBuf>,
}

impl CatalogConfig {
    /// Load the configured catalog, falling back to the embedded one, and apply
    /// the full anchor descriptions when a CSV is configured.
    pub fn load_catalog(&self) -> Result<CriteriaCatalog, CatalogError> {
        let catalog = match &self.criteria_path {
            Some(path) => CriteriaCatalog::from_path(path)?,
            None => CriteriaCatalog::embedded()?,
        };

        match &self.descriptions_csv {
            Some(path) => catalog.with_descriptions_file(path),
            None => Ok(catalog),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn default_storage_dir() -> PathBuf {
    match env::var("HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home).join(DEFAULT_STORAGE_DIR),
        _ => PathBuf::from(DEFAULT_STORAGE_DIR),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBackupFlag(String),
    InvalidRetention(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBackupFlag(raw) => {
                write!(f, "APP_BACKUP_ON_SAVE must be true or false, got '{raw}'")
            }
            ConfigError::InvalidRetention(raw) => write!(
                f,
                "APP_BACKUP_RETENTION must be a positive integer, got '{raw}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
