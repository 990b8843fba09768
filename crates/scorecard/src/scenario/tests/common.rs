use chrono::{TimeZone, Utc};

use crate::scenario::domain::{Anchors, Criterion, Scenario, ScenarioOption, Settings};
use crate::scenario::scoring::ScoringService;

pub(super) const ACTOR: &str = "facilitator";

pub(super) fn criterion(id: &str, weight: u32) -> Criterion {
    Criterion {
        id: id.to_string(),
        name: format!("Criterion {id}"),
        weight,
        anchors: Anchors {
            hi: "best in class".to_string(),
            lo: "unacceptable".to_string(),
        },
        active: true,
    }
}

pub(super) fn option(id: &str, name: &str) -> ScenarioOption {
    ScenarioOption {
        id: id.to_string(),
        name: name.to_string(),
        notes: None,
    }
}

/// Two criteria weighted 10 and 5, two options and no scores.
pub(super) fn scenario() -> Scenario {
    scenario_with(
        vec![criterion("c1", 10), criterion("c2", 5)],
        vec![option("opt1", "Alpha"), option("opt2", "Bravo")],
    )
}

pub(super) fn scenario_with(criteria: Vec<Criterion>, options: Vec<ScenarioOption>) -> Scenario {
    let created = Utc
        .with_ymd_and_hms(2025, 1, 15, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    Scenario {
        id: "scn-test".to_string(),
        title: "Primary endpoint selection".to_string(),
        created_at: created,
        modified_at: created,
        weights_locked: false,
        criteria,
        options,
        scores: Vec::new(),
        settings: Settings::default(),
        audit: Vec::new(),
    }
}

/// Apply `(option_id, criterion_id, raw)` ratings through the scoring service.
pub(super) fn scored(base: Scenario, ratings: &[(&str, &str, u8)]) -> Scenario {
    let service = ScoringService::default();
    ratings
        .iter()
        .try_fold(base, |acc, (option_id, criterion_id, raw)| {
            service.set_score(&acc, option_id, criterion_id, *raw, ACTOR, None)
        })
        .expect("ratings apply")
}
