use std::path::PathBuf;

use crate::scenario::{ErrorKind, ScenarioError};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid scenario id '{id}': {reason}")]
    InvalidId { id: String, reason: &'static str },
    #[error("Scenario with id '{0}' not found")]
    NotFound(String),
    #[error("backup '{0}' not found")]
    BackupNotFound(String),
    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed scenario document {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("scenario document {path} violates invariants: {source}")]
    Invalid {
        path: PathBuf,
        source: ScenarioError,
    },
    #[error("failed to serialize scenario '{id}': {source}")]
    Serialize {
        id: String,
        source: serde_json::Error,
    },
}

impl StorageError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::InvalidId { .. } | StorageError::Invalid { .. } => ErrorKind::Validation,
            StorageError::NotFound(_) | StorageError::BackupNotFound(_) => ErrorKind::NotFound,
            StorageError::Io { .. } | StorageError::Parse { .. } | StorageError::Serialize { .. } => {
                ErrorKind::Io
            }
        }
    }
}
