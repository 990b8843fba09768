//! Scenario domain engine: entity model, lock policy, audit trail, the scoring
//! and weights services, and read-only analysis.

pub mod analysis;
pub mod audit;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod policy;
pub mod scoring;
pub mod setup;
mod timestamp;
pub mod weights;

#[cfg(test)]
mod tests;

pub use analysis::{
    AnalysisEngine, Contributions, CriterionSummary, DeltaReport, LeaderboardEntry,
    OptionContribution, OptionDelta, SensitivityEntry, SensitivityReport,
};
pub use audit::{AuditDetails, AuditEvent, AuditLog, ScoreChange, WeightChange};
pub use catalog::{CatalogError, CriteriaCatalog};
pub use domain::{
    Anchors, Criterion, FlowDefault, RationalePolicy, Scenario, ScenarioOption, Score, Settings,
};
pub use error::{ErrorKind, ScenarioError};
pub use scoring::{OptionTotal, ScoringService};
pub use setup::{Progress, ScenarioSetup};
pub use weights::WeightsService;
