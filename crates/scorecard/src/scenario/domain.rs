use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::audit::AuditEvent;
use super::error::ScenarioError;
use super::timestamp;

pub const MIN_RAW_SCORE: u8 = 1;
pub const MAX_RAW_SCORE: u8 = 5;
pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_RATIONALE_CHARS: usize = 500;

/// Descriptions of what the top and bottom of the 1-5 scale mean for a criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchors {
    pub hi: String,
    pub lo: String,
}

/// Weighted dimension of comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub name: String,
    pub weight: u32,
    pub anchors: Anchors,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Alternative being evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOption {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A 1-5 rating of one option against one criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub option_id: String,
    pub criterion_id: String,
    pub raw: u8,
    #[serde(default)]
    pub rationale: Option<String>,
}

impl Score {
    pub fn matches(&self, option_id: &str, criterion_id: &str) -> bool {
        self.option_id == option_id && self.criterion_id == criterion_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RationalePolicy {
    Required,
    #[default]
    Optional,
    Skippable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowDefault {
    #[default]
    ByCriterion,
    ByOption,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub rationale_policy: RationalePolicy,
    #[serde(default)]
    pub flow_default: FlowDefault,
    #[serde(default = "default_sensitivity_step")]
    pub sensitivity_step: f64,
}

fn default_sensitivity_step() -> f64 {
    1.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rationale_policy: RationalePolicy::default(),
            flow_default: FlowDefault::default(),
            sensitivity_step: default_sensitivity_step(),
        }
    }
}

/// Aggregate root and the sole unit of persistence.
///
/// Services never edit a scenario in place: each mutation clones the value,
/// applies the change and hands back the new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub modified_at: DateTime<Utc>,
    #[serde(default)]
    pub weights_locked: bool,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub options: Vec<ScenarioOption>,
    #[serde(default)]
    pub scores: Vec<Score>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub audit: Vec<AuditEvent>,
}

impl Scenario {
    pub fn criterion(&self, criterion_id: &str) -> Option<&Criterion> {
        self.criteria
            .iter()
            .find(|criterion| criterion.id == criterion_id)
    }

    pub fn option(&self, option_id: &str) -> Option<&ScenarioOption> {
        self.options.iter().find(|option| option.id == option_id)
    }

    pub fn score(&self, option_id: &str, criterion_id: &str) -> Option<&Score> {
        self.scores
            .iter()
            .find(|score| score.matches(option_id, criterion_id))
    }

    pub(crate) fn score_position(&self, option_id: &str, criterion_id: &str) -> Option<usize> {
        self.scores
            .iter()
            .position(|score| score.matches(option_id, criterion_id))
    }

    /// Check every field-level invariant. Used when a scenario enters the engine
    /// from outside, e.g. after being read back from disk.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        validate_title(&self.title)?;
        ensure_unique_ids("criterion", self.criteria.iter().map(|c| c.id.as_str()))?;
        ensure_unique_ids("option", self.options.iter().map(|o| o.id.as_str()))?;

        let mut pairs = HashSet::new();
        for score in &self.scores {
            validate_raw(score.raw)?;
            if let Some(rationale) = &score.rationale {
                validate_rationale(rationale)?;
            }
            if !pairs.insert((score.option_id.as_str(), score.criterion_id.as_str())) {
                return Err(ScenarioError::validation(format!(
                    "duplicate score for option '{}' on criterion '{}'",
                    score.option_id, score.criterion_id
                )));
            }
        }

        if !(self.settings.sensitivity_step > 0.0) {
            return Err(ScenarioError::validation(
                "sensitivityStep must be greater than zero",
            ));
        }

        Ok(())
    }
}

pub(crate) fn validate_title(title: &str) -> Result<(), ScenarioError> {
    if title.trim().is_empty() {
        return Err(ScenarioError::validation("Scenario title cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ScenarioError::validation(format!(
            "Scenario title must be {MAX_TITLE_CHARS} characters or less"
        )));
    }
    Ok(())
}

pub(crate) fn validate_raw(raw: u8) -> Result<(), ScenarioError> {
    if (MIN_RAW_SCORE..=MAX_RAW_SCORE).contains(&raw) {
        Ok(())
    } else {
        Err(ScenarioError::validation(format!(
            "Score must be between {MIN_RAW_SCORE} and {MAX_RAW_SCORE}, got {raw}"
        )))
    }
}

pub(crate) fn validate_rationale(rationale: &str) -> Result<(), ScenarioError> {
    if rationale.chars().count() > MAX_RATIONALE_CHARS {
        return Err(ScenarioError::validation(format!(
            "Rationale must be {MAX_RATIONALE_CHARS} characters or less"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_unique_ids<'a>(
    entity: &str,
    ids: impl IntoIterator<Item = &'a str>,
) -> Result<(), ScenarioError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ScenarioError::validation(format!(
                "duplicate {entity} id '{id}'"
            )));
        }
    }
    Ok(())
}
