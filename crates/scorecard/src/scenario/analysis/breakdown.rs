use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::super::domain::Scenario;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionSummary {
    pub criterion_id: String,
    pub name: String,
    pub weight: u32,
}

/// Weighted score (`raw × weight`) per criterion the option was scored on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionContribution {
    pub option_id: String,
    pub by_criterion: BTreeMap<String, u64>,
    pub total: u64,
}

impl OptionContribution {
    /// Contribution of one criterion; unscored criteria contribute zero.
    pub fn criterion(&self, criterion_id: &str) -> u64 {
        self.by_criterion.get(criterion_id).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributions {
    /// Every criterion of the scenario, in scenario order.
    pub criteria: Vec<CriterionSummary>,
    /// One entry per requested option id, in request order.
    pub options: Vec<OptionContribution>,
}

impl Contributions {
    pub fn get(&self, option_id: &str) -> Option<&OptionContribution> {
        self.options.iter().find(|entry| entry.option_id == option_id)
    }
}

pub(super) fn contributions(scenario: &Scenario, option_ids: &[&str]) -> Contributions {
    let weights: HashMap<&str, u64> = scenario
        .criteria
        .iter()
        .map(|criterion| (criterion.id.as_str(), u64::from(criterion.weight)))
        .collect();

    let criteria = scenario
        .criteria
        .iter()
        .map(|criterion| CriterionSummary {
            criterion_id: criterion.id.clone(),
            name: criterion.name.clone(),
            weight: criterion.weight,
        })
        .collect();

    let mut options: Vec<OptionContribution> = Vec::with_capacity(option_ids.len());
    for option_id in option_ids {
        if options.iter().any(|entry| entry.option_id == *option_id) {
            continue;
        }

        let mut by_criterion = BTreeMap::new();
        let mut total = 0;
        for score in scenario
            .scores
            .iter()
            .filter(|score| score.option_id == *option_id)
        {
            let weight = weights
                .get(score.criterion_id.as_str())
                .copied()
                .unwrap_or(0);
            let weighted = u64::from(score.raw) * weight;
            by_criterion.insert(score.criterion_id.clone(), weighted);
            total += weighted;
        }

        options.push(OptionContribution {
            option_id: (*option_id).to_owned(),
            by_criterion,
            total,
        });
    }

    Contributions { criteria, options }
}
