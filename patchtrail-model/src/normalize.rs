//! Snapshot normalization: entity → comparable data view.
//!
//! A data view never contains the identity key or store-managed timestamp
//! fields, and every populated reference is collapsed to its canonical
//! string id, so structural diffing is well-defined across loads.

use crate::{Entity, EntitySchema};
use serde_json::Value;

/// Document keys a backing store may mirror the identity into.
const ID_KEYS: [&str; 2] = ["_id", "id"];

/// Produces the comparable, storage-agnostic representation of an entity.
///
/// Pure and infallible: a non-object document is returned as-is (the
/// tracker only ever stores object documents), and a not-yet-persisted
/// entity with no document yields the empty object.
#[must_use]
pub fn data_view(entity: &Entity, schema: &EntitySchema) -> Value {
    let mut view = match &entity.data {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other.clone(),
    };

    if let Value::Object(map) = &mut view {
        for key in ID_KEYS {
            map.remove(key);
        }
        if schema.timestamps {
            for field in &schema.timestamp_fields {
                map.remove(field);
            }
        }
    }

    for relation in &schema.relations {
        if let Some(slot) = view.pointer_mut(relation) {
            depopulate(slot);
        }
    }

    view
}

/// Collapses a reference to its canonical scalar id. Populated references
/// (objects carrying the referenced entity) reduce to their id key; bare
/// numeric ids are stringified so populated and unpopulated loads compare
/// equal. Arrays of references are depopulated element-wise.
fn depopulate(slot: &mut Value) {
    match slot {
        Value::Object(map) => {
            let id = ID_KEYS.iter().find_map(|key| map.get(*key)).cloned();
            if let Some(mut id) = id {
                depopulate(&mut id);
                *slot = id;
            }
        }
        Value::Array(arr) => {
            for element in arr {
                depopulate(element);
            }
        }
        Value::Number(n) => *slot = Value::String(n.to_string()),
        _ => {}
    }
}
