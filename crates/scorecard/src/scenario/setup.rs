use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::catalog::CriteriaCatalog;
use super::domain::{
    ensure_unique_ids, validate_title, Criterion, Scenario, ScenarioOption, Settings,
};
use super::error::ScenarioError;

pub const MAX_OPTION_NAME_CHARS: usize = 100;
const SCENARIO_ID_LEN: usize = 12;

/// Completion snapshot of a scenario's scoring grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub total_cells: usize,
    pub scored_cells: usize,
    pub percent_complete: f64,
    pub weights_locked: bool,
}

/// Builds fresh scenarios from a title, option names and either custom
/// criteria or the catalog seed list.
#[derive(Debug, Clone)]
pub struct ScenarioSetup {
    catalog: Arc<CriteriaCatalog>,
}

impl ScenarioSetup {
    pub fn new(catalog: Arc<CriteriaCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CriteriaCatalog {
        &self.catalog
    }

    pub fn create<S: AsRef<str>>(
        &self,
        title: &str,
        option_names: &[S],
        custom_criteria: Option<Vec<Criterion>>,
    ) -> Result<Scenario, ScenarioError> {
        validate_title(title)?;

        if option_names.is_empty() {
            return Err(ScenarioError::validation("At least one option is required"));
        }

        let mut options = Vec::with_capacity(option_names.len());
        for (index, name) in option_names.iter().enumerate() {
            let name = name.as_ref();
            if name.trim().is_empty() {
                return Err(ScenarioError::validation(format!(
                    "Option {} name cannot be empty",
                    index + 1
                )));
            }
            if name.chars().count() > MAX_OPTION_NAME_CHARS {
                return Err(ScenarioError::validation(format!(
                    "Option {} name must be {MAX_OPTION_NAME_CHARS} characters or less",
                    index + 1
                )));
            }
            options.push(ScenarioOption {
                id: format!("opt{}", index + 1),
                name: name.to_owned(),
                notes: None,
            });
        }

        let criteria = match custom_criteria {
            Some(criteria) => {
                ensure_unique_ids("criterion", criteria.iter().map(|c| c.id.as_str()))?;
                criteria
            }
            None => self.catalog.criteria().to_vec(),
        };

        let now = Utc::now();
        let scenario = Scenario {
            id: new_scenario_id(),
            title: title.to_owned(),
            created_at: now,
            modified_at: now,
            weights_locked: false,
            criteria,
            options,
            scores: Vec::new(),
            settings: Settings::default(),
            audit: Vec::new(),
        };

        info!(
            scenario = %scenario.id,
            options = scenario.options.len(),
            criteria = scenario.criteria.len(),
            "scenario created"
        );

        Ok(scenario)
    }

    pub fn progress(&self, scenario: &Scenario) -> Progress {
        let total_cells = scenario.options.len() * scenario.criteria.len();
        let scored_cells = scenario
            .scores
            .iter()
            .filter(|score| {
                scenario.option(&score.option_id).is_some()
                    && scenario.criterion(&score.criterion_id).is_some()
            })
            .count();
        let percent_complete = if total_cells > 0 {
            scored_cells as f64 / total_cells as f64 * 100.0
        } else {
            0.0
        };

        Progress {
            total_cells,
            scored_cells,
            percent_complete,
            weights_locked: scenario.weights_locked,
        }
    }
}

/// Short random id that satisfies the storage id rules (`[A-Za-z0-9_-]+`).
fn new_scenario_id() -> String {
    Uuid::new_v4()
        .to_string()
        .chars()
        .take(SCENARIO_ID_LEN)
        .collect()
}
