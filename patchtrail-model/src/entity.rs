//! The generic entity observed by the change tracker.

use crate::{data_view, EntitySchema};
use patchtrail_types::RefId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A mutable persistent entity as seen by the tracker.
///
/// `data` holds the entity's document — arbitrary JSON whose structure is
/// defined by the host application. `original` caches the data view
/// captured the last time the entity was loaded or saved; it is the
/// "before" side of the next diff and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: RefId,
    pub data: Value,

    #[serde(skip)]
    original: Option<Value>,
}

impl Entity {
    /// Creates a not-yet-persisted entity. Its prior data view is the empty
    /// object until the first snapshot is taken.
    #[must_use]
    pub fn new(id: RefId, data: Value) -> Self {
        Self {
            id,
            data,
            original: None,
        }
    }

    /// Computes this entity's comparable data view under the given schema.
    #[must_use]
    pub fn data_view(&self, schema: &EntitySchema) -> Value {
        data_view(self, schema)
    }

    /// Captures a fresh snapshot of the current data view, making it the
    /// "before" side of the next diff.
    pub fn snapshot(&mut self, schema: &EntitySchema) {
        self.original = Some(self.data_view(schema));
    }

    /// The cached pre-mutation data view, if any.
    #[must_use]
    pub fn original(&self) -> Option<&Value> {
        self.original.as_ref()
    }

    /// Assigns a reconstructed data view onto this entity, replacing every
    /// document field except store-managed timestamp fields.
    pub fn assign(&mut self, state: Value, schema: &EntitySchema) {
        let mut next = match state {
            Value::Object(map) => map,
            other => {
                self.data = other;
                return;
            }
        };

        if schema.timestamps {
            if let Value::Object(current) = &self.data {
                for field in &schema.timestamp_fields {
                    if let Some(ts) = current.get(field) {
                        next.insert(field.clone(), ts.clone());
                    }
                }
            }
        }

        self.data = Value::Object(next);
    }
}
