use std::sync::Arc;

use scorecard::config::AppConfig;
use scorecard::error::AppError;
use scorecard::scenario::{AnalysisEngine, AuditLog, ScenarioSetup, ScoringService, WeightsService};
use scorecard::storage::FileStore;
use scorecard::telemetry;
use tracing::debug;

/// Everything a command needs: the opened store and the engine services.
pub(crate) struct AppContext {
    pub(crate) actor: String,
    pub(crate) store: FileStore,
    pub(crate) setup: ScenarioSetup,
    pub(crate) audit: AuditLog,
    pub(crate) scoring: ScoringService,
    pub(crate) weights: WeightsService,
    pub(crate) analysis: AnalysisEngine,
}

impl AppContext {
    pub(crate) fn init() -> Result<Self, AppError> {
        let config = AppConfig::load()?;
        telemetry::init(&config.telemetry)?;

        let catalog = config.catalog.load_catalog()?;
        let store = FileStore::open(config.storage.paths(), config.storage.store_options())?;
        debug!(
            environment = ?config.environment,
            base = %store.paths().base().display(),
            criteria = catalog.criteria().len(),
            "context ready"
        );

        let audit = AuditLog::new();
        Ok(Self {
            actor: config.actor,
            store,
            setup: ScenarioSetup::new(Arc::new(catalog)),
            scoring: ScoringService::new(audit.clone()),
            weights: WeightsService::new(audit.clone()),
            audit,
            analysis: AnalysisEngine::new(),
        })
    }
}
