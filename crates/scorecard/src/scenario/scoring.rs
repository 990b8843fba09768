use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use super::audit::{AuditDetails, AuditLog, ScoreChange};
use super::domain::{validate_rationale, validate_raw, Scenario, Score, MAX_RAW_SCORE};
use super::error::ScenarioError;

/// Raw value given to a score that is created by attaching a rationale first.
pub const DEFAULT_RAW_SCORE: u8 = 3;

/// Weighted total and its share of the maximum achievable total (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptionTotal {
    pub total: u64,
    pub normalized: f64,
}

/// Records ratings and rationales against a scenario's option/criterion grid.
#[derive(Debug, Default, Clone)]
pub struct ScoringService {
    audit: AuditLog,
}

impl ScoringService {
    pub fn new(audit: AuditLog) -> Self {
        Self { audit }
    }

    /// Create or replace the score for `(option_id, criterion_id)`.
    ///
    /// An existing score keeps its position and its rationale unless a new
    /// rationale is supplied. Always appends a `score_changed` event.
    pub fn set_score(
        &self,
        scenario: &Scenario,
        option_id: &str,
        criterion_id: &str,
        raw: u8,
        actor: &str,
        rationale: Option<&str>,
    ) -> Result<Scenario, ScenarioError> {
        validate_raw(raw)?;
        if scenario.option(option_id).is_none() {
            return Err(ScenarioError::option_not_found(option_id));
        }
        if scenario.criterion(criterion_id).is_none() {
            return Err(ScenarioError::criterion_not_found(criterion_id));
        }
        if let Some(rationale) = rationale {
            validate_rationale(rationale)?;
        }

        let mut updated = scenario.clone();
        let old_value = match updated.score_position(option_id, criterion_id) {
            Some(index) => {
                let existing = &mut updated.scores[index];
                let previous = existing.raw;
                existing.raw = raw;
                if let Some(rationale) = rationale {
                    existing.rationale = Some(rationale.to_owned());
                }
                Some(previous)
            }
            None => {
                updated.scores.push(Score {
                    option_id: option_id.to_owned(),
                    criterion_id: criterion_id.to_owned(),
                    raw,
                    rationale: rationale.map(str::to_owned),
                });
                None
            }
        };

        debug!(
            scenario = %scenario.id,
            option_id,
            criterion_id,
            ?old_value,
            new_value = raw,
            "score recorded"
        );

        Ok(self.audit.append(
            updated,
            actor,
            AuditDetails::ScoreChanged(ScoreChange {
                option_id: option_id.to_owned(),
                criterion_id: criterion_id.to_owned(),
                old_value,
                new_value: raw,
            }),
        ))
    }

    /// Attach a rationale to a score, creating the score with
    /// [`DEFAULT_RAW_SCORE`] when none exists yet.
    ///
    /// Rationale edits are not written to the audit history; only raw values
    /// are. `_actor` is accepted so callers treat both edits alike.
    pub fn set_rationale(
        &self,
        scenario: &Scenario,
        option_id: &str,
        criterion_id: &str,
        rationale: &str,
        _actor: &str,
    ) -> Result<Scenario, ScenarioError> {
        validate_rationale(rationale)?;

        let mut updated = scenario.clone();
        match updated.score_position(option_id, criterion_id) {
            Some(index) => updated.scores[index].rationale = Some(rationale.to_owned()),
            None => updated.scores.push(Score {
                option_id: option_id.to_owned(),
                criterion_id: criterion_id.to_owned(),
                raw: DEFAULT_RAW_SCORE,
                rationale: Some(rationale.to_owned()),
            }),
        }

        Ok(updated)
    }

    pub fn totals(&self, scenario: &Scenario) -> BTreeMap<String, OptionTotal> {
        compute_totals(scenario)
            .into_iter()
            .map(|(option_id, total)| (option_id.to_owned(), total))
            .collect()
    }
}

/// Weighted totals for every option, in option order.
pub(crate) fn compute_totals(scenario: &Scenario) -> Vec<(&str, OptionTotal)> {
    let weights: HashMap<&str, u64> = scenario
        .criteria
        .iter()
        .map(|criterion| (criterion.id.as_str(), u64::from(criterion.weight)))
        .collect();
    let max_possible: u64 = scenario
        .criteria
        .iter()
        .map(|criterion| u64::from(criterion.weight) * u64::from(MAX_RAW_SCORE))
        .sum();

    scenario
        .options
        .iter()
        .map(|option| {
            let total: u64 = scenario
                .scores
                .iter()
                .filter(|score| score.option_id == option.id)
                .map(|score| {
                    let weight = weights
                        .get(score.criterion_id.as_str())
                        .copied()
                        .unwrap_or(0);
                    u64::from(score.raw) * weight
                })
                .sum();
            let normalized = normalize(total, max_possible);
            (option.id.as_str(), OptionTotal { total, normalized })
        })
        .collect()
}

pub(crate) fn normalize(total: u64, max_possible: u64) -> f64 {
    normalize_fractional(total as f64, max_possible as f64)
}

pub(crate) fn normalize_fractional(total: f64, max_possible: f64) -> f64 {
    if max_possible > 0.0 {
        total / max_possible * 100.0
    } else {
        0.0
    }
}
