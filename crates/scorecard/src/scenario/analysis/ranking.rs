use serde::Serialize;

use super::super::domain::Scenario;
use super::super::scoring::compute_totals;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub option_id: String,
    pub name: String,
    pub total: u64,
    pub normalized: f64,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDelta {
    pub option_id: String,
    pub total: u64,
    pub delta: u64,
}

/// Winner plus every option's gap to it, in scenario option order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeltaReport {
    pub winner: Option<String>,
    pub options: Vec<OptionDelta>,
}

impl DeltaReport {
    pub fn get(&self, option_id: &str) -> Option<&OptionDelta> {
        self.options.iter().find(|entry| entry.option_id == option_id)
    }

    pub fn winner_total(&self) -> u64 {
        self.winner
            .as_deref()
            .and_then(|winner| self.get(winner))
            .map_or(0, |entry| entry.total)
    }
}

pub(super) fn leaderboard(scenario: &Scenario) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = compute_totals(scenario)
        .into_iter()
        .zip(&scenario.options)
        .map(|((option_id, totals), option)| LeaderboardEntry {
            option_id: option_id.to_owned(),
            name: option.name.clone(),
            total: totals.total,
            normalized: totals.normalized,
            rank: 0,
        })
        .collect();

    // Stable: equal totals keep scenario option order.
    entries.sort_by(|a, b| b.total.cmp(&a.total));

    let mut rank = 1;
    for index in 0..entries.len() {
        if index > 0 && entries[index].total < entries[index - 1].total {
            rank = index + 1;
        }
        entries[index].rank = rank;
    }

    entries
}

pub(super) fn delta_to_winner(scenario: &Scenario) -> DeltaReport {
    let totals = compute_totals(scenario);

    let mut winner: Option<(&str, u64)> = None;
    for (option_id, entry) in &totals {
        if winner.map_or(true, |(_, best)| entry.total > best) {
            winner = Some((*option_id, entry.total));
        }
    }
    let winner_total = winner.map_or(0, |(_, total)| total);

    let options = totals
        .iter()
        .map(|(option_id, entry)| OptionDelta {
            option_id: (*option_id).to_owned(),
            total: entry.total,
            delta: winner_total - entry.total,
        })
        .collect();

    DeltaReport {
        winner: winner.map(|(option_id, _)| option_id.to_owned()),
        options,
    }
}
