use super::domain::{RationalePolicy, Scenario, Settings};

pub fn can_lock_weights(scenario: &Scenario) -> bool {
    !scenario.weights_locked
}

pub fn can_unlock_weights(scenario: &Scenario) -> bool {
    scenario.weights_locked
}

pub fn is_rationale_required(settings: &Settings) -> bool {
    settings.rationale_policy == RationalePolicy::Required
}

pub fn is_rationale_skippable(settings: &Settings) -> bool {
    matches!(
        settings.rationale_policy,
        RationalePolicy::Optional | RationalePolicy::Skippable
    )
}
