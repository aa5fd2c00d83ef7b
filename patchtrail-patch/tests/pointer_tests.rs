use patchtrail_patch::pointer;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn empty_pointer_is_root() {
    assert_eq!(pointer::parse("").unwrap(), Vec::<String>::new());
}

#[test]
fn parse_splits_and_unescapes() {
    assert_eq!(pointer::parse("/a/b/0").unwrap(), vec!["a", "b", "0"]);
    assert_eq!(pointer::parse("/a~1b/c~0d").unwrap(), vec!["a/b", "c~d"]);
}

#[test]
fn parse_rejects_missing_leading_slash() {
    assert!(pointer::parse("a/b").is_err());
}

#[test]
fn escape_roundtrip() {
    for segment in ["plain", "with/slash", "with~tilde", "~1", ""] {
        assert_eq!(pointer::unescape(&pointer::escape(segment)), segment);
    }
}

#[test]
fn join_inverts_parse() {
    let pointer_str = "/a~1b/c/0";
    let segments = pointer::parse(pointer_str).unwrap();
    assert_eq!(pointer::join(&segments), pointer_str);
}

#[test]
fn resolve_descends_objects_and_arrays() {
    let doc = json!({ "a": { "b": [10, { "c": true }] } });
    assert_eq!(
        pointer::resolve(&doc, &["a", "b", "0"]),
        Some(&json!(10))
    );
    assert_eq!(
        pointer::resolve(&doc, &["a", "b", "1", "c"]),
        Some(&json!(true))
    );
    assert_eq!(pointer::resolve(&doc, &["a", "missing"]), None);
    assert_eq!(pointer::resolve(&doc, &["a", "b", "9"]), None);
}
