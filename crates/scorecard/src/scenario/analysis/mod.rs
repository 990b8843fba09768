//! Read-only computations over a scenario snapshot. Nothing here mutates the
//! scenario it is given.

mod breakdown;
mod ranking;
mod sensitivity;

pub use breakdown::{Contributions, CriterionSummary, OptionContribution};
pub use ranking::{DeltaReport, LeaderboardEntry, OptionDelta};
pub use sensitivity::{SensitivityEntry, SensitivityReport};

use super::domain::Scenario;
use super::error::ScenarioError;

#[derive(Debug, Default, Clone)]
pub struct AnalysisEngine;

impl AnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    /// Options ranked by weighted total, highest first, with competition ranks.
    pub fn leaderboard(&self, scenario: &Scenario) -> Vec<LeaderboardEntry> {
        ranking::leaderboard(scenario)
    }

    /// Per-criterion weighted contributions for the requested options.
    pub fn contributions(&self, scenario: &Scenario, option_ids: &[&str]) -> Contributions {
        breakdown::contributions(scenario, option_ids)
    }

    /// Gap between each option's total and the winner's.
    pub fn delta_to_winner(&self, scenario: &Scenario) -> DeltaReport {
        ranking::delta_to_winner(scenario)
    }

    /// Leaderboard before and after scaling one criterion's weight by `pct` percent.
    pub fn sensitivity(
        &self,
        scenario: &Scenario,
        criterion_id: &str,
        pct: f64,
    ) -> Result<SensitivityReport, ScenarioError> {
        sensitivity::sensitivity(scenario, criterion_id, pct)
    }
}
