use std::sync::Arc;

use scorecard::scenario::{
    AnalysisEngine, AuditDetails, AuditLog, CriteriaCatalog, ErrorKind, ScenarioError,
    ScenarioSetup, ScoringService, WeightsService,
};
use scorecard::storage::{FileStore, StoragePaths, StoreOptions};
use tempfile::TempDir;

const CATALOG: &str = r#"{"criteria": [
    {"id": "relevance", "name": "Clinical relevance", "weight": 10,
     "anchors": {"hi": "Directly measures how patients feel or survive", "lo": "Surrogate with no validation"}},
    {"id": "feasibility", "name": "Operational feasibility", "weight": 5,
     "anchors": {"hi": "Routine assessment", "lo": "Specialist equipment at every site"}}
]}"#;

#[test]
fn facilitated_session_from_setup_to_sensitivity() {
    let catalog = CriteriaCatalog::from_json(CATALOG).expect("catalog parses");
    let setup = ScenarioSetup::new(Arc::new(catalog));
    let audit = AuditLog::new();
    let scoring = ScoringService::new(audit.clone());
    let weights = WeightsService::new(audit.clone());
    let analysis = AnalysisEngine::new();

    let scenario = setup
        .create("Endpoint selection: heart failure", &["KCCQ", "6MWD"], None)
        .expect("scenario created");
    let scenario = weights.lock(&scenario, "chair").expect("weights locked");

    let blocked = weights.set_weight(&scenario, "feasibility", 9, "chair", "late change");
    assert_eq!(blocked.map_err(|err| err.kind()), Err(ErrorKind::Locked));

    let scenario = [
        ("opt1", "relevance", 5),
        ("opt1", "feasibility", 1),
        ("opt2", "relevance", 2),
        ("opt2", "feasibility", 5),
    ]
    .into_iter()
    .try_fold(scenario, |acc, (option_id, criterion_id, raw)| {
        scoring.set_score(&acc, option_id, criterion_id, raw, "panel", None)
    })
    .expect("grid scored");
    let scenario = scoring
        .set_rationale(&scenario, "opt2", "feasibility", "performed at every visit", "panel")
        .expect("rationale added");

    let progress = setup.progress(&scenario);
    assert_eq!(progress.scored_cells, progress.total_cells);
    assert!((progress.percent_complete - 100.0).abs() < 1e-9);

    let board = analysis.leaderboard(&scenario);
    assert_eq!(board[0].option_id, "opt1");
    assert_eq!(board[0].total, 55);
    assert_eq!(board[1].total, 45);

    let report = analysis
        .sensitivity(&scenario, "feasibility", 200.0)
        .expect("sensitivity runs");
    assert!(report.winner_changed());
    assert_eq!(scenario.criteria[1].weight, 5);

    let scenario = weights
        .unlock(&scenario, "chair", "sensitivity showed fragility")
        .and_then(|s| weights.set_weight(&s, "feasibility", 8, "chair", "panel vote"))
        .expect("reweighted");
    assert_eq!(weights.total_weight(&scenario), 18);

    let score_events = audit.history(&scenario, Some("score_changed"), None);
    assert_eq!(score_events.len(), 4);
    let chair_events = audit.history(&scenario, None, Some("chair"));
    let kinds: Vec<&str> = chair_events.iter().map(|event| event.kind()).collect();
    assert_eq!(kinds, vec!["weights_locked", "weights_unlocked", "weight_changed"]);
    assert!(matches!(
        chair_events[2].details,
        AuditDetails::WeightChanged(ref change) if change.old_weight == 5 && change.new_weight == 8
    ));

    let dir = TempDir::new().expect("temp dir");
    let store = FileStore::open(StoragePaths::new(dir.path()), StoreOptions::default())
        .expect("store opens");
    store.save(&scenario).expect("saved");
    let reloaded = store.load(&scenario.id).expect("reloaded");
    assert_eq!(reloaded, scenario);
    assert_eq!(analysis.leaderboard(&reloaded), analysis.leaderboard(&scenario));
    assert_eq!(
        store.hash(&reloaded).expect("hash"),
        store.hash(&scenario).expect("hash")
    );
}

#[test]
fn rejected_edits_leave_no_trace() {
    let catalog = CriteriaCatalog::from_json(CATALOG).expect("catalog parses");
    let setup = ScenarioSetup::new(Arc::new(catalog));
    let scoring = ScoringService::default();
    let scenario = setup
        .create("No-op edits", &["Only option"], None)
        .expect("scenario created");

    let attempts = [
        scoring.set_score(&scenario, "opt1", "relevance", 7, "panel", None),
        scoring.set_score(&scenario, "opt9", "relevance", 3, "panel", None),
        scoring.set_score(&scenario, "opt1", "unknown", 3, "panel", None),
    ];
    let kinds: Vec<ErrorKind> = attempts
        .iter()
        .map(|attempt| match attempt {
            Err(err) => err.kind(),
            Ok(_) => panic!("edit should have been rejected"),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![ErrorKind::Validation, ErrorKind::NotFound, ErrorKind::NotFound]
    );
    assert!(scenario.scores.is_empty());
    assert!(scenario.audit.is_empty());

    let unlocked = WeightsService::default().unlock(&scenario, "chair", "why");
    assert!(matches!(unlocked, Err(ScenarioError::State(_))));
}
