use std::fs;
use std::sync::Arc;

use scorecard::scenario::{CriteriaCatalog, Scenario, ScenarioSetup, ScoringService};
use scorecard::storage::{
    FileStore, ScenarioRepository, StorageError, StoragePaths, StoreOptions, BACKUP_DIR,
};
use tempfile::TempDir;

fn store(dir: &TempDir, options: StoreOptions) -> FileStore {
    FileStore::open(StoragePaths::new(dir.path()), options).expect("store opens")
}

fn new_scenario(title: &str) -> Scenario {
    let catalog = CriteriaCatalog::embedded().expect("embedded catalog");
    ScenarioSetup::new(Arc::new(catalog))
        .create(title, &["Overall survival", "Progression-free survival"], None)
        .expect("scenario created")
}

fn with_id(mut scenario: Scenario, id: &str) -> Scenario {
    scenario.id = id.to_string();
    scenario
}

#[test]
fn save_then_load_returns_an_equal_scenario() {
    let dir = TempDir::new().expect("temp dir");
    let store = store(&dir, StoreOptions::default());
    let scenario = ScoringService::default()
        .set_score(
            &new_scenario("Oncology endpoints"),
            "opt1",
            "clinical_relevance",
            5,
            "facilitator",
            Some("gold standard endpoint"),
        )
        .expect("score recorded");

    store.save(&scenario).expect("saved");
    let loaded = store.load(&scenario.id).expect("loaded");

    assert_eq!(loaded, scenario);
    assert!(store.exists(&scenario.id).expect("id valid"));
    assert_eq!(store.list().expect("listing"), vec![scenario.id.clone()]);

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .expect("read dir")
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().map_or(false, |ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp file must not survive a save");
}

#[test]
fn missing_scenarios_report_not_found() {
    let dir = TempDir::new().expect("temp dir");
    let store = store(&dir, StoreOptions::default());

    assert!(matches!(store.load("nope"), Err(StorageError::NotFound(id)) if id == "nope"));
    assert!(matches!(store.delete("nope"), Err(StorageError::NotFound(_))));
    assert!(!store.exists("nope").expect("valid id"));
}

#[test]
fn traversal_ids_are_rejected_before_touching_disk() {
    let dir = TempDir::new().expect("temp dir");
    let store = store(&dir, StoreOptions::default());
    let outside = dir.path().join("escape.json");

    let hostile = with_id(new_scenario("Hostile"), "../escape");
    match store.save(&hostile) {
        Err(StorageError::InvalidId { id, .. }) => assert_eq!(id, "../escape"),
        other => panic!("expected invalid id, got {other:?}"),
    }
    assert!(!outside.exists());
    assert!(!dir.path().join("..").join("escape.json").exists());

    for id in ["../escape", "a/b", "", "x.y"] {
        assert!(matches!(store.load(id), Err(StorageError::InvalidId { .. })));
        assert!(matches!(store.delete(id), Err(StorageError::InvalidId { .. })));
    }
}

#[test]
fn delete_removes_the_document() {
    let dir = TempDir::new().expect("temp dir");
    let store = store(&dir, StoreOptions::default());
    let scenario = new_scenario("Disposable");
    store.save(&scenario).expect("saved");

    store.delete(&scenario.id).expect("deleted");

    assert!(!store.exists(&scenario.id).expect("valid id"));
    assert!(store.list().expect("listing").is_empty());
}

#[test]
fn corrupt_and_invalid_documents_are_distinguished() {
    let dir = TempDir::new().expect("temp dir");
    let store = store(&dir, StoreOptions::default());
    let good = with_id(new_scenario("Readable"), "good");
    store.save(&good).expect("saved");

    fs::write(dir.path().join("broken.json"), "{ not json").expect("write corrupt file");
    let mut bad_value = serde_json::to_value(with_id(new_scenario("Bad"), "bad")).expect("to value");
    bad_value["title"] = serde_json::Value::String("   ".to_string());
    fs::write(dir.path().join("bad.json"), bad_value.to_string()).expect("write invalid file");
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write stray file");

    assert!(matches!(store.load("broken"), Err(StorageError::Parse { .. })));
    assert!(matches!(store.load("bad"), Err(StorageError::Invalid { .. })));
    assert_eq!(
        store.list().expect("listing"),
        vec!["bad".to_string(), "broken".to_string(), "good".to_string()]
    );

    let summaries = store.summaries().expect("summaries");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, "good");
    assert_eq!(summaries[0].title, "Readable");
}

#[test]
fn legacy_documents_with_naive_timestamps_load() {
    let dir = TempDir::new().expect("temp dir");
    let store = store(&dir, StoreOptions::default());
    let raw = r#"{
        "id": "legacy",
        "title": "Imported",
        "createdAt": "2024-03-01T10:00:00",
        "modifiedAt": "2024-03-02T11:30:00.250",
        "weightsLocked": true,
        "criteria": [
            {"id": "c1", "name": "Relevance", "weight": 4, "anchors": {"hi": "high", "lo": "low"}}
        ],
        "options": [{"id": "opt1", "name": "A"}],
        "scores": [{"optionId": "opt1", "criterionId": "c1", "raw": 2}],
        "audit": [
            {"ts": "2024-03-02T11:30:00", "actor": "x", "type": "weights_locked", "details": {}}
        ]
    }"#;
    fs::write(dir.path().join("legacy.json"), raw).expect("write legacy file");

    let loaded = store.load("legacy").expect("legacy loads");
    assert!(loaded.weights_locked);
    assert_eq!(loaded.criteria[0].weight, 4);
    assert!(loaded.criteria[0].active);
    assert_eq!(loaded.audit.len(), 1);
    assert_eq!(loaded.created_at.to_rfc3339(), "2024-03-01T10:00:00+00:00");
}

fn write_backup(dir: &TempDir, scenario: &Scenario, stamp: &str) -> String {
    let name = format!("{}_{stamp}.json", scenario.id);
    let body = serde_json::to_string(scenario).expect("serialize");
    fs::write(dir.path().join(BACKUP_DIR).join(&name), body).expect("write backup");
    name
}

#[test]
fn cleanup_keeps_the_newest_backups() {
    let dir = TempDir::new().expect("temp dir");
    let store = store(&dir, StoreOptions::default());
    let scenario = with_id(new_scenario("Backed up"), "kept");
    let neighbour = with_id(new_scenario("Neighbour"), "kept_x");

    let names: Vec<String> = (1..=7)
        .map(|second| write_backup(&dir, &scenario, &format!("20250102_0300{second:02}")))
        .collect();
    let foreign = write_backup(&dir, &neighbour, "20250102_030001");

    let listed = store.list_backups("kept").expect("listing");
    assert_eq!(listed.len(), 7);
    assert_eq!(listed[0].filename, names[6], "newest first");

    let removed = store.cleanup_old_backups("kept", 5).expect("cleanup");
    assert_eq!(removed, 2);

    let remaining: Vec<String> = store
        .list_backups("kept")
        .expect("listing")
        .into_iter()
        .map(|backup| backup.filename)
        .collect();
    let expected: Vec<String> = names.iter().rev().take(5).cloned().collect();
    assert_eq!(remaining, expected);
    assert!(dir.path().join(BACKUP_DIR).join(&foreign).exists());

    assert_eq!(store.cleanup_old_backups("kept", 5).expect("noop"), 0);
}

#[test]
fn restore_reads_a_backup_of_the_same_scenario_only() {
    let dir = TempDir::new().expect("temp dir");
    let store = store(&dir, StoreOptions::default());
    let original = with_id(new_scenario("Before"), "restorable");
    let name = write_backup(&dir, &original, "20250301_120000");
    let other = with_id(new_scenario("Other"), "other");
    let other_name = write_backup(&dir, &other, "20250301_120000");

    let restored = store
        .restore_from_backup("restorable", &name)
        .expect("restored");
    assert_eq!(restored, original);

    assert!(matches!(
        store.restore_from_backup("restorable", &other_name),
        Err(StorageError::BackupNotFound(_))
    ));
    assert!(matches!(
        store.restore_from_backup("restorable", "restorable_20991231_000000.json"),
        Err(StorageError::BackupNotFound(_))
    ));
    let mislabelled = "restorable_20250301_130000.json";
    fs::write(
        dir.path().join(BACKUP_DIR).join(mislabelled),
        serde_json::to_string(&other).expect("serialize"),
    )
    .expect("write mislabelled backup");
    assert!(matches!(
        store.restore_from_backup("restorable", mislabelled),
        Err(StorageError::Invalid { .. })
    ));
    assert!(matches!(
        store.restore_from_backup("../x", &name),
        Err(StorageError::InvalidId { .. })
    ));
}

#[test]
fn save_with_backup_copies_the_previous_document() {
    let dir = TempDir::new().expect("temp dir");
    let store = store(
        &dir,
        StoreOptions {
            backup_on_save: true,
            backup_retention: 5,
        },
    );
    let first = new_scenario("Version one");
    assert_eq!(store.save(&first).expect("first save"), None, "nothing to back up yet");

    let mut second = first.clone();
    second.title = "Version two".to_string();
    let backup = store
        .save(&second)
        .expect("second save")
        .expect("backup taken");

    let restored = store
        .restore_from_backup(&first.id, &backup.filename)
        .expect("backup readable");
    assert_eq!(restored.title, "Version one");
    assert_eq!(store.load(&first.id).expect("load").title, "Version two");

    let skipped = store.save_with(&second, false).expect("save without backup");
    assert!(skipped.is_none());
}

#[test]
fn backup_of_missing_scenario_is_not_found() {
    let dir = TempDir::new().expect("temp dir");
    let store = store(&dir, StoreOptions::default());
    assert!(matches!(
        store.backups().create("ghost"),
        Err(StorageError::NotFound(_))
    ));
}

#[test]
fn hash_is_stable_and_tracks_edits() {
    let dir = TempDir::new().expect("temp dir");
    let store = store(&dir, StoreOptions::default());
    let scenario = new_scenario("Hashed");
    store.save(&scenario).expect("saved");

    let before = store.hash(&scenario).expect("hash");
    let reloaded = store.load(&scenario.id).expect("loaded");
    assert_eq!(store.hash(&reloaded).expect("hash"), before);
    assert_eq!(before.len(), 64);
    assert!(before.chars().all(|c| c.is_ascii_hexdigit()));

    let mut edited = reloaded.clone();
    edited.criteria[0].weight += 1;
    assert_ne!(store.hash(&edited).expect("hash"), before);
}

#[test]
fn file_store_is_usable_through_the_repository_trait() {
    let dir = TempDir::new().expect("temp dir");
    let repository: Box<dyn ScenarioRepository> =
        Box::new(store(&dir, StoreOptions::default()));
    let scenario = new_scenario("Trait object");

    repository.save(&scenario).expect("saved");
    assert!(repository.exists(&scenario.id).expect("valid id"));
    assert_eq!(repository.load(&scenario.id).expect("loaded"), scenario);
    repository.delete(&scenario.id).expect("deleted");
    assert!(repository.list().expect("listing").is_empty());
}

#[test]
fn failed_write_leaves_no_temp_file_and_keeps_committed_documents() {
    let dir = TempDir::new().expect("temp dir");
    let store = store(&dir, StoreOptions::default());
    store
        .save(&with_id(new_scenario("Committed"), "kept"))
        .expect("first save");
    let kept_path = dir.path().join("kept.json");
    let kept_bytes = fs::read(&kept_path).expect("committed file");

    // A non-empty directory where the document should land makes the rename fail.
    let blocker = dir.path().join("blocked.json");
    fs::create_dir_all(&blocker).expect("blocker dir");
    fs::write(blocker.join("inner.txt"), b"occupied").expect("blocker contents");

    match store.save(&with_id(new_scenario("Blocked"), "blocked")) {
        Err(StorageError::Io { .. }) => {}
        other => panic!("expected io error, got {other:?}"),
    }

    assert!(!dir.path().join("blocked.tmp").exists());
    assert_eq!(
        fs::read(blocker.join("inner.txt")).expect("blocker untouched"),
        b"occupied"
    );
    assert_eq!(fs::read(&kept_path).expect("committed file"), kept_bytes);
}
