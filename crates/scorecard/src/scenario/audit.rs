use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::domain::Scenario;
use super::timestamp;

pub const SCORE_CHANGED: &str = "score_changed";
pub const WEIGHT_CHANGED: &str = "weight_changed";
pub const WEIGHTS_LOCKED: &str = "weights_locked";
pub const WEIGHTS_UNLOCKED: &str = "weights_unlocked";

/// One entry of a scenario's append-only history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "AuditRecord", try_from = "AuditRecord")]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub details: AuditDetails,
}

impl AuditEvent {
    /// Wire `type` of the event, e.g. `score_changed`.
    pub fn kind(&self) -> &str {
        self.details.kind()
    }
}

/// Typed payload per event kind. Kinds written by other tooling are kept
/// verbatim in [`AuditDetails::Other`] so they survive a load/save cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditDetails {
    ScoreChanged(ScoreChange),
    WeightChanged(WeightChange),
    WeightsLocked,
    WeightsUnlocked { reason: String },
    Other {
        kind: String,
        details: Map<String, Value>,
    },
}

impl AuditDetails {
    pub fn kind(&self) -> &str {
        match self {
            AuditDetails::ScoreChanged(_) => SCORE_CHANGED,
            AuditDetails::WeightChanged(_) => WEIGHT_CHANGED,
            AuditDetails::WeightsLocked => WEIGHTS_LOCKED,
            AuditDetails::WeightsUnlocked { .. } => WEIGHTS_UNLOCKED,
            AuditDetails::Other { kind, .. } => kind.as_str(),
        }
    }

    /// The wire `details` object for this event.
    pub fn to_map(&self) -> Map<String, Value> {
        let value = match self {
            AuditDetails::ScoreChanged(change) => json!({
                "optionId": change.option_id,
                "criterionId": change.criterion_id,
                "oldValue": change.old_value,
                "newValue": change.new_value,
            }),
            AuditDetails::WeightChanged(change) => json!({
                "criterionId": change.criterion_id,
                "oldWeight": change.old_weight,
                "newWeight": change.new_weight,
                "reason": change.reason,
            }),
            AuditDetails::WeightsLocked => json!({}),
            AuditDetails::WeightsUnlocked { reason } => json!({ "reason": reason }),
            AuditDetails::Other { details, .. } => return details.clone(),
        };

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn from_parts(kind: String, details: Map<String, Value>) -> Result<Self, String> {
        let parsed = match kind.as_str() {
            SCORE_CHANGED => AuditDetails::ScoreChanged(parse_payload(&kind, details)?),
            WEIGHT_CHANGED => AuditDetails::WeightChanged(parse_payload(&kind, details)?),
            WEIGHTS_LOCKED => AuditDetails::WeightsLocked,
            WEIGHTS_UNLOCKED => {
                let payload: UnlockPayload = parse_payload(&kind, details)?;
                AuditDetails::WeightsUnlocked {
                    reason: payload.reason,
                }
            }
            _ => AuditDetails::Other { kind, details },
        };
        Ok(parsed)
    }
}

fn parse_payload<T>(kind: &str, details: Map<String, Value>) -> Result<T, String>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_value(Value::Object(details))
        .map_err(|err| format!("invalid details for audit event '{kind}': {err}"))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreChange {
    pub option_id: String,
    pub criterion_id: String,
    pub old_value: Option<u8>,
    pub new_value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightChange {
    pub criterion_id: String,
    pub old_weight: u32,
    pub new_weight: u32,
    pub reason: String,
}

#[derive(Deserialize)]
struct UnlockPayload {
    reason: String,
}

/// On-disk shape: `{timestamp, actor, type, details}`.
#[derive(Serialize, Deserialize)]
struct AuditRecord {
    #[serde(alias = "ts", deserialize_with = "timestamp::deserialize")]
    timestamp: DateTime<Utc>,
    actor: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    details: Map<String, Value>,
}

impl From<AuditEvent> for AuditRecord {
    fn from(event: AuditEvent) -> Self {
        Self {
            timestamp: event.timestamp,
            actor: event.actor,
            kind: event.details.kind().to_owned(),
            details: event.details.to_map(),
        }
    }
}

impl TryFrom<AuditRecord> for AuditEvent {
    type Error = String;

    fn try_from(record: AuditRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            timestamp: record.timestamp,
            actor: record.actor,
            details: AuditDetails::from_parts(record.kind, record.details)?,
        })
    }
}

/// Appends actor-attributed events to scenarios. Every mutating service routes
/// through here.
#[derive(Debug, Default, Clone)]
pub struct AuditLog;

impl AuditLog {
    pub fn new() -> Self {
        Self
    }

    /// Return a copy of `scenario` with one more event at the end of its history.
    pub fn log_event(&self, scenario: &Scenario, actor: &str, details: AuditDetails) -> Scenario {
        self.append(scenario.clone(), actor, details)
    }

    /// Events in chronological order, optionally narrowed by type and actor.
    pub fn history<'a>(
        &self,
        scenario: &'a Scenario,
        kind: Option<&str>,
        actor: Option<&str>,
    ) -> Vec<&'a AuditEvent> {
        scenario
            .audit
            .iter()
            .filter(|event| kind.map_or(true, |kind| event.kind() == kind))
            .filter(|event| actor.map_or(true, |actor| event.actor == actor))
            .collect()
    }

    pub fn log_score_change(
        &self,
        scenario: &Scenario,
        actor: &str,
        option_id: &str,
        criterion_id: &str,
        old_value: Option<u8>,
        new_value: u8,
    ) -> Scenario {
        self.log_event(
            scenario,
            actor,
            AuditDetails::ScoreChanged(ScoreChange {
                option_id: option_id.to_owned(),
                criterion_id: criterion_id.to_owned(),
                old_value,
                new_value,
            }),
        )
    }

    pub fn log_weight_change(
        &self,
        scenario: &Scenario,
        actor: &str,
        criterion_id: &str,
        old_weight: u32,
        new_weight: u32,
        reason: &str,
    ) -> Scenario {
        self.log_event(
            scenario,
            actor,
            AuditDetails::WeightChanged(WeightChange {
                criterion_id: criterion_id.to_owned(),
                old_weight,
                new_weight,
                reason: reason.to_owned(),
            }),
        )
    }

    pub fn log_weights_locked(&self, scenario: &Scenario, actor: &str) -> Scenario {
        self.log_event(scenario, actor, AuditDetails::WeightsLocked)
    }

    pub fn log_weights_unlocked(&self, scenario: &Scenario, actor: &str, reason: &str) -> Scenario {
        self.log_event(
            scenario,
            actor,
            AuditDetails::WeightsUnlocked {
                reason: reason.to_owned(),
            },
        )
    }

    /// Consume an already-copied scenario, push the event and stamp `modifiedAt`.
    pub(crate) fn append(
        &self,
        mut scenario: Scenario,
        actor: &str,
        details: AuditDetails,
    ) -> Scenario {
        let timestamp = Utc::now();
        scenario.audit.push(AuditEvent {
            timestamp,
            actor: actor.to_owned(),
            details,
        });
        scenario.modified_at = timestamp;
        scenario
    }
}
