//! Immutable patch records.
//!
//! A record is created exactly once, at the moment a non-empty diff is
//! computed for an entity transition, and is never mutated afterwards. Per
//! entity, records are totally ordered by `date`, ties broken by the
//! time-ordered `id`.

use crate::{PatchId, PatchOp, RefId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One persisted diff between two successive data views of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRecord {
    /// Unique, time-ordered identifier for this record.
    pub id: PatchId,

    /// When this record was created.
    pub date: DateTime<Utc>,

    /// The entity this record belongs to.
    #[serde(rename = "ref")]
    pub ref_id: RefId,

    /// The ordered operation sequence turning the previous data view into
    /// the new one.
    pub ops: Vec<PatchOp>,

    /// Caller-configured extra fields sourced from the entity at creation
    /// time (e.g. a `user` reference).
    #[serde(flatten, skip_serializing_if = "Map::is_empty", default)]
    pub extra: Map<String, Value>,
}

impl PatchRecord {
    /// Creates a new record dated now.
    #[must_use]
    pub fn new(ref_id: RefId, ops: Vec<PatchOp>) -> Self {
        Self {
            id: PatchId::new(),
            date: Utc::now(),
            ref_id,
            ops,
            extra: Map::new(),
        }
    }

    /// Adds an extra contextual field.
    #[must_use]
    pub fn with_extra(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }
}
