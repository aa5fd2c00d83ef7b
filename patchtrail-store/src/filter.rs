//! Filter and update documents.
//!
//! The engine speaks the equality subset of a Mongo-style query language:
//! a filter is a JSON object whose top-level keys must equal the entity
//! document's fields; an update is a JSON object of `$set`/`$unset`
//! operator keys, with bare (non-operator) keys treated as `$set`.

use serde_json::{Map, Value};

/// An equality filter over entity documents.
pub type Filter = Map<String, Value>;

/// A mutation document (`$set`/`$unset` plus bare keys).
pub type Update = Map<String, Value>;

/// Whether a document matches the filter. An empty filter matches
/// everything.
#[must_use]
pub fn matches(filter: &Filter, doc: &Value) -> bool {
    filter.iter().all(|(key, expected)| match doc {
        Value::Object(map) => map.get(key) == Some(expected),
        _ => false,
    })
}

/// Applies an update document to an entity document in place.
pub fn apply_update(doc: &mut Value, update: &Update) {
    let Value::Object(map) = doc else { return };

    for (key, value) in update {
        match key.as_str() {
            "$set" => {
                if let Value::Object(fields) = value {
                    for (field, v) in fields {
                        map.insert(field.clone(), v.clone());
                    }
                }
            }
            "$unset" => {
                if let Value::Object(fields) = value {
                    for field in fields.keys() {
                        map.remove(field);
                    }
                }
            }
            // Unknown operators are ignored rather than misapplied.
            key if key.starts_with('$') => {}
            _ => {
                map.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Extracts the `$set`-equivalent field map of an update: the contents of
/// `$set` plus every bare key, with operator-prefixed keys stripped from
/// the result. Used to reconcile a pre-mutation filter with what the
/// update actually changed.
#[must_use]
pub fn set_fields(update: &Update) -> Map<String, Value> {
    let mut fields = Map::new();
    for (key, value) in update {
        match key.as_str() {
            "$set" => {
                if let Value::Object(inner) = value {
                    for (field, v) in inner {
                        if !field.starts_with('$') {
                            fields.insert(field.clone(), v.clone());
                        }
                    }
                }
            }
            key if key.starts_with('$') => {}
            _ => {
                fields.insert(key.clone(), value.clone());
            }
        }
    }
    fields
}
