use serde::Serialize;

/// Coarse classification shared by every engine error so presentation layers can
/// branch without matching individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    State,
    Locked,
    Io,
}

/// Domain failures raised by the scenario services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: &'static str, id: String },
    #[error("invalid state transition: {0}")]
    State(String),
    #[error("{0}")]
    Locked(String),
}

impl ScenarioError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn option_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "Option",
            id: id.to_owned(),
        }
    }

    pub(crate) fn criterion_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "Criterion",
            id: id.to_owned(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScenarioError::Validation(_) => ErrorKind::Validation,
            ScenarioError::NotFound { .. } => ErrorKind::NotFound,
            ScenarioError::State(_) => ErrorKind::State,
            ScenarioError::Locked(_) => ErrorKind::Locked,
        }
    }
}
