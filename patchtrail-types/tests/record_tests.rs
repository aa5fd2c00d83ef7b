use patchtrail_types::{OpKind, PatchOp, PatchRecord, RefId};
use pretty_assertions::assert_eq;
use serde_json::json;

// ── PatchOp wire shape ───────────────────────────────────────────

#[test]
fn add_op_serializes_flat() {
    let op = PatchOp::add("/prop", json!("foo"));
    assert_eq!(
        serde_json::to_value(&op).unwrap(),
        json!({ "op": "add", "path": "/prop", "value": "foo" })
    );
}

#[test]
fn remove_op_omits_value() {
    let op = PatchOp::remove("/prop");
    assert_eq!(
        serde_json::to_value(&op).unwrap(),
        json!({ "op": "remove", "path": "/prop" })
    );
}

#[test]
fn original_value_uses_camel_case_key() {
    let op = PatchOp::replace("/prop", json!("new")).with_original(json!("old"));
    assert_eq!(
        serde_json::to_value(&op).unwrap(),
        json!({
            "op": "replace",
            "path": "/prop",
            "value": "new",
            "originalValue": "old"
        })
    );
}

#[test]
fn op_deserializes_from_wire_form() {
    let op: PatchOp =
        serde_json::from_value(json!({ "op": "add", "path": "/a", "value": 1 })).unwrap();
    assert_eq!(op.op, OpKind::Add);
    assert_eq!(op.path, "/a");
    assert_eq!(op.value, Some(json!(1)));
    assert_eq!(op.original_value, None);
}

// ── PatchRecord ──────────────────────────────────────────────────

#[test]
fn record_carries_ref_and_ops() {
    let record = PatchRecord::new(RefId::from("post-1"), vec![PatchOp::add("/a", json!(1))]);
    assert_eq!(record.ref_id, RefId::from("post-1"));
    assert_eq!(record.ops.len(), 1);
    assert!(record.extra.is_empty());
}

#[test]
fn record_extra_fields_flatten() {
    let record = PatchRecord::new(RefId::from("post-1"), vec![PatchOp::add("/a", json!(1))])
        .with_extra("user", json!("u-7"));

    let wire = serde_json::to_value(&record).unwrap();
    assert_eq!(wire["ref"], json!("post-1"));
    assert_eq!(wire["user"], json!("u-7"));
    assert_eq!(wire["ops"][0]["op"], json!("add"));

    let back: PatchRecord = serde_json::from_value(wire).unwrap();
    assert_eq!(back, record);
}
