//! Integration tests for gridbulk
//!
//! These tests drive the public API end to end with scripted services and
//! temporary sled stores.

use gridbulk::batch::{BatchExecutor, EditError, EditTargetSet, RunStatus, SelectedFieldPatch, UpdateOutcome};
use gridbulk::columns::{ColumnStateManager, ColumnTemplate, Preferences, SortState, shape_id};
use gridbulk::config::EngineConfig;
use gridbulk::schema::{EntityTag, FieldCategory, FieldDefinition, FieldKind, FieldSource, categorize, infer_fields};
use gridbulk::services::{MockReferenceService, MockUpdateService, PersistenceService, SledStore};
use gridbulk::{BulkEditWorkflow, CancellationToken};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

/// Helper function to open a sled store in a fresh temporary directory
fn setup_store() -> (Arc<SledStore>, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = SledStore::open(dir.path().join("state")).unwrap();
    (Arc::new(store), dir)
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn reference_service() -> MockReferenceService {
    MockReferenceService::new()
        .with_records(
            EntityTag::League,
            vec![json!({"id": "l1", "name": "NFL"}), json!({"id": "l2", "name": "NBA"})],
        )
        .with_records(
            EntityTag::DivisionConference,
            vec![
                json!({"id": "d1", "name": "Pacific", "league_id": "l2"}),
                json!({"id": "d2", "name": "AFC West", "league_id": "l1"}),
            ],
        )
}

fn quick_config() -> EngineConfig {
    EngineConfig::from_toml_str("completion_delay_ms = 0").unwrap()
}

#[test]
fn test_team_entity_requires_division_conference() {
    let fields = infer_fields(&FieldSource::Entity(EntityTag::Team)).unwrap();
    let division: Vec<&FieldDefinition> = fields
        .iter()
        .filter(|f| f.name == "division_conference_id")
        .collect();

    assert_eq!(division.len(), 1);
    assert!(division[0].required);
}

#[test]
fn test_team_like_samples_always_get_required_division() {
    let samples = [
        json!({"name": "Broncos", "city": "Denver"}),
        json!({"name": "Lakers", "league_id": "l2"}),
        json!({"name": "Celtics", "city": "Boston", "division_conference_id": "d3"}),
    ];
    for sample in samples {
        let fields = infer_fields(&FieldSource::Sample(sample)).unwrap();
        assert!(
            fields
                .iter()
                .any(|f| f.name == "division_conference_id" && f.required)
        );
    }

    let league = infer_fields(&FieldSource::Sample(json!({"name": "NFL", "city": "NYC", "sport": "football"}))).unwrap();
    assert!(league.iter().all(|f| f.name != "division_conference_id"));
}

#[test]
fn test_categorize_partitions_every_entity() {
    for entity in EntityTag::ALL {
        let fields = infer_fields(&FieldSource::Entity(entity)).unwrap();
        let groups = categorize(&fields);

        let grouped: Vec<&str> = groups.values().flatten().map(|f| f.name.as_str()).collect();
        let unique: HashSet<&str> = grouped.iter().copied().collect();
        assert_eq!(grouped.len(), fields.len(), "{entity}");
        assert_eq!(unique.len(), fields.len(), "{entity}");
        assert!(groups.values().all(|g| !g.is_empty()));
    }
}

#[tokio::test]
async fn test_local_clear_patch() {
    let rows = vec![
        json!({"id": 1, "status": "live"}),
        json!({"id": 2, "status": "final"}),
        json!({"id": 3, "status": "delayed"}),
    ];
    let fields = vec![FieldDefinition::new("status", FieldKind::String)];
    let selection = [("status".to_string(), true)].into_iter().collect();
    let patch = SelectedFieldPatch::from_selection(&fields, &selection, &Default::default()).unwrap();
    let executor = BatchExecutor::new(Arc::new(MockUpdateService::new())).with_batch_size(10);

    let report = executor
        .run(&EditTargetSet::by_indices([0, 1, 2], rows), &patch, &CancellationToken::new(), |_| {})
        .await
        .unwrap();

    assert_eq!(report.outcome, UpdateOutcome { succeeded: 3, failed: 0 });
    let rows = report.rows.unwrap();
    assert!(rows.iter().all(|row| row["status"] == Value::Null));
    assert_eq!(rows[1]["id"], 2);
}

#[tokio::test]
async fn test_remote_run_with_one_rejection() {
    let remote = Arc::new(MockUpdateService::new().rejecting("p7"));
    let executor = BatchExecutor::new(remote.clone()).with_batch_size(10);
    let ids: Vec<String> = (1..=12).map(|i| format!("p{i}")).collect();
    let patch = SelectedFieldPatch::new().with("position", json!("QB"));
    let mut processed = Vec::new();

    let report = executor
        .run(
            &EditTargetSet::by_ids(EntityTag::Player, ids.clone()),
            &patch,
            &CancellationToken::new(),
            |p| processed.push(p.processed),
        )
        .await
        .unwrap();

    assert_eq!(processed, (1..=12).collect::<Vec<_>>());
    assert_eq!(report.outcome, UpdateOutcome { succeeded: 11, failed: 1 });
    assert_eq!(report.status, RunStatus::Partial);
    // items after the rejection were still attempted
    assert_eq!(remote.attempted_ids(), ids);
}

#[tokio::test]
async fn test_progress_is_monotonic_for_mixed_failures() {
    for (size, failing) in [(1, vec![]), (5, vec![0, 4]), (23, vec![3, 10, 11, 22])] {
        let mut remote = MockUpdateService::new();
        for index in &failing {
            remote = remote.rejecting(format!("g{index}"));
        }
        let executor = BatchExecutor::new(Arc::new(remote)).with_batch_size(4);
        let ids: Vec<String> = (0..size).map(|i| format!("g{i}")).collect();
        let mut seen = Vec::new();

        let report = executor
            .run(
                &EditTargetSet::by_ids(EntityTag::Game, ids),
                &SelectedFieldPatch::new().with("status", json!("final")),
                &CancellationToken::new(),
                |p| seen.push(p),
            )
            .await
            .unwrap();

        assert!(seen.windows(2).all(|w| w[0].processed < w[1].processed));
        assert_eq!(seen.len(), size);
        assert_eq!(report.outcome.failed, failing.len());
        assert_eq!(report.outcome.succeeded, size - failing.len());
        assert_eq!(seen.last().map(|p| p.outcome), Some(report.outcome));
    }
}

#[test]
fn test_new_shape_defaults() {
    let (store, _dir) = setup_store();
    let mut manager = ColumnStateManager::new(store);
    let state = manager.initialize_for(&columns(&["id", "name", "league_id"])).clone();

    assert_eq!(state.visibility.get("id"), Some(&false));
    assert_eq!(state.visibility.get("name"), Some(&true));
    assert_eq!(state.visibility.get("league_id"), Some(&false));
    assert_eq!(state.order, columns(&["id", "name", "league_id"]));
}

#[test]
fn test_column_state_reload_is_stable() {
    let (store, _dir) = setup_store();
    let cols = columns(&["id", "name", "city", "league_id"]);
    let shape = shape_id(&cols);
    {
        let mut manager = ColumnStateManager::new(store.clone());
        manager.initialize(&shape, &cols);
        manager.toggle_visibility("league_id");
        manager.move_column(2, 0);
        manager.sort("name");
    }
    let snapshot = |store: &SledStore| -> Vec<Option<String>> {
        ["order", "visibility", "sort"]
            .iter()
            .map(|part| store.get(&format!("gridbulk.columns.{shape}.{part}")))
            .collect()
    };
    let before = snapshot(&store);

    for _ in 0..3 {
        let mut manager = ColumnStateManager::new(store.clone());
        manager.initialize(&shape, &cols);
    }

    assert_eq!(snapshot(&store), before);
    let mut manager = ColumnStateManager::new(store.clone());
    let state = manager.initialize(&shape, &cols);
    assert_eq!(state.order[0], "city");
    assert_eq!(state.sort, Some(SortState::asc("name")));
}

#[test]
fn test_shapes_are_isolated_and_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state");
    let teams = columns(&["id", "name", "city"]);
    let games = columns(&["id", "home_score", "away_score"]);
    {
        let store = Arc::new(SledStore::open(&path).unwrap());
        let mut manager = ColumnStateManager::new(store.clone());
        manager.initialize_for(&teams);
        manager.toggle_visibility("city");
        manager.initialize_for(&games);
        store.flush().unwrap();
    }

    let store = Arc::new(SledStore::open(&path).unwrap());
    let mut manager = ColumnStateManager::new(store);
    assert_eq!(manager.initialize_for(&teams).visibility.get("city"), Some(&false));
    assert_eq!(manager.initialize_for(&games).visibility.get("home_score"), Some(&true));
}

#[test]
fn test_identifier_preference_and_templates() {
    let (store, _dir) = setup_store();
    let prefs = Preferences::new(store.clone());
    prefs.set_show_identifiers(true).unwrap();

    let mut manager = ColumnStateManager::new(store).with_identifiers_shown(prefs.show_identifiers());
    let cols = columns(&["id", "name", "league_id"]);
    manager.initialize_for(&cols);
    assert_eq!(manager.visible_columns(), vec!["id", "name", "league_id"]);

    manager.apply_template(&ColumnTemplate::showing("names only", &["name"]));
    assert_eq!(manager.visible_columns(), vec!["name"]);
}

#[tokio::test]
async fn test_confirm_without_fields_never_runs() {
    let remote = Arc::new(MockUpdateService::new());
    let mut flow = BulkEditWorkflow::new(Arc::new(reference_service()), remote.clone(), quick_config());
    flow.open(EditTargetSet::by_ids(EntityTag::Team, ["t1", "t2"])).await;
    let mut progress_calls = 0;

    let err = flow.confirm(|_| progress_calls += 1, |_| {}).await.unwrap_err();

    assert_eq!(err, EditError::NoFieldsSelected);
    assert_eq!(progress_calls, 0);
    assert!(remote.calls().is_empty());
    assert!(flow.state().is_ready());
}

#[tokio::test]
async fn test_full_session_over_local_rows() {
    let rows = vec![
        json!({"id": "t1", "name": "Broncos", "city": "Denver", "league_id": "l1"}),
        json!({"id": "t2", "name": "Lakers", "city": "Los Angeles", "league_id": "l2"}),
    ];
    let mut flow = BulkEditWorkflow::new(
        Arc::new(reference_service()),
        Arc::new(MockUpdateService::new()),
        quick_config(),
    );
    flow.open(EditTargetSet::by_indices([0, 1], rows)).await;

    let labels: Vec<&str> = flow
        .options_for("division_conference_id")
        .iter()
        .map(|o| o.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Pacific (NBA)", "AFC West (NFL)"]);

    flow.select_all_in_category(FieldCategory::Relationships, true);
    flow.select_field("league_id", false);
    flow.set_value("division_conference_id", json!("d2"));
    let mut patched = None;

    let report = flow
        .confirm(|_| {}, |report| patched = report.rows.clone())
        .await
        .unwrap();

    assert!(report.is_success());
    let patched = patched.unwrap();
    assert!(patched.iter().all(|row| row["division_conference_id"] == "d2"));
    assert_eq!(patched[0]["league_id"], "l1");
    assert!(flow.state().is_idle());
}

#[tokio::test]
async fn test_failed_reference_lookup_leaves_field_empty() {
    let reference = reference_service().failing(EntityTag::League);
    let mut flow = BulkEditWorkflow::new(
        Arc::new(reference),
        Arc::new(MockUpdateService::new()),
        quick_config(),
    );
    flow.open(EditTargetSet::by_ids(EntityTag::Team, ["t1"])).await;

    assert!(flow.options_for("league_id").is_empty());
    assert!(flow.options_for("division_conference_id").iter().all(|o| o.label.ends_with("(Unknown League)")));
    assert!(flow.state().is_ready());
}
