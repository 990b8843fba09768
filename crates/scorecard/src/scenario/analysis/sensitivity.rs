use serde::Serialize;

use super::super::domain::{Scenario, MAX_RAW_SCORE};
use super::super::error::ScenarioError;
use super::super::scoring::normalize_fractional;

/// Leaderboard row computed with a fractional weight for the varied criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityEntry {
    pub option_id: String,
    pub name: String,
    pub total: f64,
    pub normalized: f64,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityReport {
    pub criterion_id: String,
    pub pct: f64,
    pub original_weight: f64,
    pub adjusted_weight: f64,
    pub original: Vec<SensitivityEntry>,
    pub adjusted: Vec<SensitivityEntry>,
}

impl SensitivityReport {
    pub fn original_winner(&self) -> Option<&str> {
        self.original.first().map(|entry| entry.option_id.as_str())
    }

    pub fn adjusted_winner(&self) -> Option<&str> {
        self.adjusted.first().map(|entry| entry.option_id.as_str())
    }

    /// Whether the weight change puts a different option on top.
    pub fn winner_changed(&self) -> bool {
        self.original_winner() != self.adjusted_winner()
    }
}

/// `max(0, w + w × pct / 100)`, kept fractional.
fn scale_weight(original: f64, pct: f64) -> f64 {
    (original + original * pct / 100.0).max(0.0)
}

pub(super) fn sensitivity(
    scenario: &Scenario,
    criterion_id: &str,
    pct: f64,
) -> Result<SensitivityReport, ScenarioError> {
    let index = scenario
        .criteria
        .iter()
        .position(|criterion| criterion.id == criterion_id)
        .ok_or_else(|| ScenarioError::criterion_not_found(criterion_id))?;

    if !pct.is_finite() {
        return Err(ScenarioError::validation(format!(
            "sensitivity percentage must be a finite number, got {pct}"
        )));
    }

    let original_weight = f64::from(scenario.criteria[index].weight);
    let adjusted_weight = scale_weight(original_weight, pct);

    Ok(SensitivityReport {
        criterion_id: criterion_id.to_owned(),
        pct,
        original_weight,
        adjusted_weight,
        original: weighted_board(scenario, index, original_weight),
        adjusted: weighted_board(scenario, index, adjusted_weight),
    })
}

/// Leaderboard with criterion `index` weighted at `weight`; every other
/// criterion keeps its stored weight. Ties share a rank and keep option order.
fn weighted_board(scenario: &Scenario, index: usize, weight: f64) -> Vec<SensitivityEntry> {
    let weights: Vec<f64> = scenario
        .criteria
        .iter()
        .enumerate()
        .map(|(position, criterion)| {
            if position == index {
                weight
            } else {
                f64::from(criterion.weight)
            }
        })
        .collect();
    let max_possible: f64 = weights
        .iter()
        .map(|weight| weight * f64::from(MAX_RAW_SCORE))
        .sum();

    let mut entries: Vec<SensitivityEntry> = scenario
        .options
        .iter()
        .map(|option| {
            let total: f64 = scenario
                .scores
                .iter()
                .filter(|score| score.option_id == option.id)
                .filter_map(|score| {
                    let position = scenario
                        .criteria
                        .iter()
                        .position(|criterion| criterion.id == score.criterion_id)?;
                    Some(f64::from(score.raw) * weights[position])
                })
                .sum();
            SensitivityEntry {
                option_id: option.id.clone(),
                name: option.name.clone(),
                total,
                normalized: normalize_fractional(total, max_possible),
                rank: 0,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.total.total_cmp(&a.total));

    let mut rank = 1;
    for index in 0..entries.len() {
        if index > 0 && entries[index].total < entries[index - 1].total {
            rank = index + 1;
        }
        entries[index].rank = rank;
    }

    entries
}
