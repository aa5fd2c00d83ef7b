use patchtrail_engine::{EngineError, IncludeField, Tracker, TrackerConfig};
use patchtrail_model::EntitySchema;
use patchtrail_store::{
    CollectionName, Filter, MemoryEntityStore, MemoryHistoryStore,
};
use patchtrail_types::{OpKind, PatchOp};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn filter(doc: Value) -> Filter {
    match doc {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn make_tracker(
    schema: EntitySchema,
    config: TrackerConfig,
) -> (Tracker, Arc<MemoryEntityStore>, Arc<MemoryHistoryStore>) {
    let entities = Arc::new(MemoryEntityStore::new());
    let history = Arc::new(MemoryHistoryStore::new(CollectionName::resolve(
        &config.name,
        &config.naming,
    )));
    let tracker = Tracker::new(schema, config, entities.clone(), history.clone()).unwrap();
    (tracker, entities, history)
}

fn make_default() -> (Tracker, Arc<MemoryEntityStore>, Arc<MemoryHistoryStore>) {
    make_tracker(EntitySchema::new("post"), TrackerConfig::new("PostHistory"))
}

// ── Setup validation ─────────────────────────────────────────────

#[test]
fn empty_name_is_a_configuration_error() {
    let entities = Arc::new(MemoryEntityStore::new());
    let history = Arc::new(MemoryHistoryStore::new(CollectionName {
        model: "H".into(),
        collection: "h".into(),
    }));
    let err = Tracker::new(
        EntitySchema::new("post"),
        TrackerConfig::new("  "),
        entities,
        history,
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::Configuration(_)));
}

#[test]
fn reserved_extra_field_is_rejected() {
    let entities = Arc::new(MemoryEntityStore::new());
    let history = Arc::new(MemoryHistoryStore::new(CollectionName {
        model: "H".into(),
        collection: "h".into(),
    }));
    let config = TrackerConfig::new("PostHistory").with_include("ref", IncludeField::new());
    let err = Tracker::new(EntitySchema::new("post"), config, entities, history).unwrap_err();
    assert!(matches!(err, EngineError::Configuration(_)));
}

#[test]
fn malformed_exclude_pattern_is_rejected() {
    let entities = Arc::new(MemoryEntityStore::new());
    let history = Arc::new(MemoryHistoryStore::new(CollectionName {
        model: "H".into(),
        collection: "h".into(),
    }));
    let config = TrackerConfig::new("PostHistory").with_exclude("hidden");
    let err = Tracker::new(EntitySchema::new("post"), config, entities, history).unwrap_err();
    assert!(matches!(err, EngineError::Configuration(_)));
}

#[test]
fn collection_names_derive_from_the_logical_name() {
    let (tracker, _, _) = make_default();
    assert_eq!(tracker.collection().model, "PostHistory");
    assert_eq!(tracker.collection().collection, "post_history");
}

// ── Create and save ──────────────────────────────────────────────

#[tokio::test]
async fn creating_adds_one_patch() {
    let (tracker, _, _) = make_default();
    let post = tracker.create(json!({ "prop": "foo" })).await.unwrap();

    let records = tracker.history(&post.id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ref_id, post.id);
    assert_eq!(records[0].ops, vec![PatchOp::add("/prop", json!("foo"))]);
}

#[tokio::test]
async fn saving_a_change_adds_a_second_patch() {
    let (tracker, _, _) = make_default();
    let mut post = tracker.create(json!({ "prop": "foo" })).await.unwrap();

    post.data["prop"] = json!("bar");
    let record = tracker.save(&mut post).await.unwrap().unwrap();
    assert_eq!(record.ops, vec![PatchOp::replace("/prop", json!("bar"))]);

    assert_eq!(tracker.history(&post.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn saving_without_changes_adds_no_patch() {
    let (tracker, _, _) = make_default();
    let mut post = tracker.create(json!({ "prop": "baz" })).await.unwrap();

    assert!(tracker.save(&mut post).await.unwrap().is_none());
    assert_eq!(tracker.history(&post.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn loaded_entities_diff_against_their_loaded_state() {
    let (tracker, _, _) = make_default();
    let created = tracker.create(json!({ "prop": "a", "keep": 1 })).await.unwrap();

    let mut loaded = tracker.load_by_id(&created.id).await.unwrap().unwrap();
    loaded.data["prop"] = json!("b");
    let record = tracker.save(&mut loaded).await.unwrap().unwrap();
    assert_eq!(record.ops, vec![PatchOp::replace("/prop", json!("b"))]);
}

#[tokio::test]
async fn store_managed_timestamps_never_appear_in_ops() {
    let schema = EntitySchema::new("post").with_timestamps();
    let entities = Arc::new(MemoryEntityStore::with_schema(schema.clone()));
    let config = TrackerConfig::new("PostHistory");
    let history = Arc::new(MemoryHistoryStore::new(CollectionName::resolve(
        &config.name,
        &config.naming,
    )));
    let tracker = Tracker::new(schema, config, entities, history).unwrap();

    let mut post = tracker.create(json!({ "prop": "a" })).await.unwrap();
    post.data["prop"] = json!("b");
    tracker.save(&mut post).await.unwrap().unwrap();

    for record in tracker.history(&post.id).await.unwrap() {
        for op in &record.ops {
            assert!(!op.path.contains("createdAt"));
            assert!(!op.path.contains("updatedAt"));
        }
    }
}

// ── Exclusions and extras ────────────────────────────────────────

#[tokio::test]
async fn excluded_paths_never_reach_history() {
    let config = TrackerConfig::new("PostHistory").with_exclude("/hidden");
    let (tracker, _, _) = make_tracker(EntitySchema::new("post"), config);

    let post = tracker
        .create(json!({ "name": "x", "hidden": "h" }))
        .await
        .unwrap();

    let records = tracker.history(&post.id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ops, vec![PatchOp::add("/name", json!("x"))]);
}

#[tokio::test]
async fn fully_excluded_change_persists_no_record() {
    let config = TrackerConfig::new("PostHistory").with_exclude("/hidden");
    let (tracker, _, _) = make_tracker(EntitySchema::new("post"), config);

    let mut post = tracker.create(json!({ "name": "x" })).await.unwrap();
    post.data["hidden"] = json!("h");
    assert!(tracker.save(&mut post).await.unwrap().is_none());
    assert_eq!(tracker.history(&post.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn includes_copy_entity_fields_onto_records() {
    let config = TrackerConfig::new("CommentHistory")
        .with_include("user", IncludeField::new().from("/author"));
    let (tracker, _, _) = make_tracker(EntitySchema::new("comment"), config);

    let comment = tracker
        .create(json!({ "text": "wat", "author": "u-7" }))
        .await
        .unwrap();

    let records = tracker.history(&comment.id).await.unwrap();
    assert_eq!(records[0].extra.get("user"), Some(&json!("u-7")));
}

#[tokio::test]
async fn missing_required_include_fails_the_patch_step() {
    let config = TrackerConfig::new("CommentHistory")
        .with_include("user", IncludeField::new().required());
    let (tracker, entities, _) = make_tracker(EntitySchema::new("comment"), config);

    let err = tracker.create(json!({ "text": "wat" })).await.unwrap_err();
    assert!(matches!(err, EngineError::MissingInclude(_)));
    // The entity write itself is not compensated.
    assert_eq!(entities.len().await, 1);
}

#[tokio::test]
async fn original_values_are_tracked_when_enabled() {
    let config = TrackerConfig::new("PostHistory").with_original_values();
    let (tracker, _, _) = make_tracker(EntitySchema::new("post"), config);

    let mut post = tracker.create(json!({ "prop": "foo" })).await.unwrap();
    post.data["prop"] = json!("bar");
    let record = tracker.save(&mut post).await.unwrap().unwrap();

    assert_eq!(record.ops[0].op, OpKind::Replace);
    assert_eq!(record.ops[0].original_value, Some(json!("foo")));

    // Creation ops have no prior value to attach.
    let records = tracker.history(&post.id).await.unwrap();
    assert_eq!(records[0].ops[0].original_value, None);
}

// ── Filter-based updates ─────────────────────────────────────────

#[tokio::test]
async fn update_one_patches_the_matched_entity() {
    let (tracker, _, _) = make_default();
    let post = tracker.create(json!({ "prop": "foo" })).await.unwrap();

    let outcome = tracker
        .update_one(
            &filter(json!({ "prop": "foo" })),
            &filter(json!({ "$set": { "prop": "bar" } })),
        )
        .await
        .unwrap();
    assert_eq!(outcome.modified, 1);

    let records = tracker.history(&post.id).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].ops, vec![PatchOp::replace("/prop", json!("bar"))]);
}

#[tokio::test]
async fn update_one_matching_nothing_is_a_no_op() {
    let (tracker, _, history) = make_default();
    tracker.create(json!({ "prop": "foo" })).await.unwrap();

    let outcome = tracker
        .update_one(
            &filter(json!({ "prop": "nope" })),
            &filter(json!({ "$set": { "prop": "bar" } })),
        )
        .await
        .unwrap();
    assert_eq!((outcome.matched, outcome.modified), (0, 0));
    assert_eq!(history.len().await, 1);
}

#[tokio::test]
async fn update_one_survives_invalidating_its_own_filter() {
    // The update rewrites the exact field the filter matched on.
    let (tracker, _, _) = make_default();
    let post = tracker.create(json!({ "status": "open" })).await.unwrap();

    tracker
        .update_one(
            &filter(json!({ "status": "open" })),
            &filter(json!({ "$set": { "status": "closed" } })),
        )
        .await
        .unwrap();

    let records = tracker.history(&post.id).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[1].ops,
        vec![PatchOp::replace("/status", json!("closed"))]
    );
}

#[tokio::test]
async fn bulk_update_pairs_each_entity_with_its_own_prior_view() {
    // Two matching entities; the update invalidates the filter for both.
    // Each still gets exactly one correctly-paired record.
    let (tracker, _, _) = make_default();
    let first = tracker
        .create(json!({ "group": "g", "n": 1 }))
        .await
        .unwrap();
    let second = tracker
        .create(json!({ "group": "g", "n": 2 }))
        .await
        .unwrap();

    let outcome = tracker
        .update_many(
            &filter(json!({ "group": "g" })),
            &filter(json!({ "$set": { "group": "h" } })),
        )
        .await
        .unwrap();
    assert_eq!((outcome.matched, outcome.modified), (2, 2));

    for id in [&first.id, &second.id] {
        let records = tracker.history(id).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[1].ops,
            vec![PatchOp::replace("/group", json!("h"))]
        );
    }
}

#[tokio::test]
async fn bulk_update_modifying_nothing_adds_no_records() {
    let (tracker, _, history) = make_default();
    tracker.create(json!({ "group": "g" })).await.unwrap();

    tracker
        .update_many(
            &filter(json!({ "group": "g" })),
            &filter(json!({ "$set": { "group": "g" } })),
        )
        .await
        .unwrap();
    assert_eq!(history.len().await, 1);
}

// ── Removal ──────────────────────────────────────────────────────

#[tokio::test]
async fn removing_an_entity_purges_its_history() {
    let (tracker, entities, history) = make_default();
    let a = tracker.create(json!({ "prop": "a" })).await.unwrap();
    let b = tracker.create(json!({ "prop": "b" })).await.unwrap();

    let removed = tracker.remove(&filter(json!({ "prop": "a" }))).await.unwrap();
    assert_eq!(removed, 1);
    assert_eq!(entities.len().await, 1);

    assert!(tracker.history(&a.id).await.unwrap().is_empty());
    assert_eq!(tracker.history(&b.id).await.unwrap().len(), 1);
    assert_eq!(history.len().await, 1);
}

#[tokio::test]
async fn history_is_kept_when_configured() {
    let config = TrackerConfig::new("PostHistory").keep_history_on_delete();
    let (tracker, _, _) = make_tracker(EntitySchema::new("post"), config);
    let post = tracker.create(json!({ "prop": "a" })).await.unwrap();

    tracker.remove(&filter(json!({ "prop": "a" }))).await.unwrap();
    assert_eq!(tracker.history(&post.id).await.unwrap().len(), 1);
}
