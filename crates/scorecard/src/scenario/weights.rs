use tracing::debug;

use super::audit::{AuditDetails, AuditLog, WeightChange};
use super::domain::Scenario;
use super::error::ScenarioError;
use super::policy::{can_lock_weights, can_unlock_weights};

/// Lock state machine and weight edits for a scenario's criteria.
///
/// `Unlocked --lock--> Locked --unlock(reason)--> Unlocked`. Weights can only be
/// edited while unlocked; every legal call returns a new scenario carrying one
/// extra audit event.
#[derive(Debug, Default, Clone)]
pub struct WeightsService {
    audit: AuditLog,
}

impl WeightsService {
    pub fn new(audit: AuditLog) -> Self {
        Self { audit }
    }

    pub fn lock(&self, scenario: &Scenario, actor: &str) -> Result<Scenario, ScenarioError> {
        if !can_lock_weights(scenario) {
            return Err(ScenarioError::State("Weights are already locked".to_string()));
        }

        let mut updated = scenario.clone();
        updated.weights_locked = true;
        debug!(scenario = %scenario.id, actor, "weights locked");

        Ok(self.audit.append(updated, actor, AuditDetails::WeightsLocked))
    }

    pub fn unlock(
        &self,
        scenario: &Scenario,
        actor: &str,
        reason: &str,
    ) -> Result<Scenario, ScenarioError> {
        if !can_unlock_weights(scenario) {
            return Err(ScenarioError::State(
                "Weights are already unlocked".to_string(),
            ));
        }

        let mut updated = scenario.clone();
        updated.weights_locked = false;
        debug!(scenario = %scenario.id, actor, reason, "weights unlocked");

        Ok(self.audit.append(
            updated,
            actor,
            AuditDetails::WeightsUnlocked {
                reason: reason.to_owned(),
            },
        ))
    }

    /// Replace one criterion's weight. The lock is checked before the value or
    /// the criterion id, so a locked scenario always reports `Locked`.
    pub fn set_weight(
        &self,
        scenario: &Scenario,
        criterion_id: &str,
        weight: i64,
        actor: &str,
        reason: &str,
    ) -> Result<Scenario, ScenarioError> {
        if scenario.weights_locked {
            return Err(ScenarioError::Locked(
                "Cannot change weights: weights are locked".to_string(),
            ));
        }

        if weight < 0 {
            return Err(ScenarioError::validation("Weight must be non-negative"));
        }
        let new_weight = u32::try_from(weight).map_err(|_| {
            ScenarioError::validation(format!("Weight must not exceed {}", u32::MAX))
        })?;

        let index = scenario
            .criteria
            .iter()
            .position(|criterion| criterion.id == criterion_id)
            .ok_or_else(|| ScenarioError::criterion_not_found(criterion_id))?;

        let mut updated = scenario.clone();
        let old_weight = updated.criteria[index].weight;
        updated.criteria[index].weight = new_weight;

        Ok(self.audit.append(
            updated,
            actor,
            AuditDetails::WeightChanged(WeightChange {
                criterion_id: criterion_id.to_owned(),
                old_weight,
                new_weight,
                reason: reason.to_owned(),
            }),
        ))
    }

    pub fn total_weight(&self, scenario: &Scenario) -> u64 {
        scenario
            .criteria
            .iter()
            .map(|criterion| u64::from(criterion.weight))
            .sum()
    }
}
