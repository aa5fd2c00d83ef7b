//! Schema description for an instrumented entity type.

use patchtrail_types::RefKind;
use serde::{Deserialize, Serialize};

/// Describes how an entity type is keyed, timestamped and normalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Logical entity type name (e.g. "post"). Collection names for the
    /// patch history derive from this via the configured naming transforms.
    pub name: String,

    /// The identifier kind of this entity type.
    pub ref_kind: RefKind,

    /// Whether the host store maintains timestamp fields inside the
    /// document. Only when true are `timestamp_fields` stripped from data
    /// views.
    pub timestamps: bool,

    /// Document keys holding store-managed timestamps.
    pub timestamp_fields: Vec<String>,

    /// JSON pointers to reference fields. A populated reference (an object
    /// carrying the referenced entity) is depopulated to its canonical
    /// string id during normalization.
    pub relations: Vec<String>,
}

impl EntitySchema {
    /// Creates a schema with UUID keys, no timestamps and no relations.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ref_kind: RefKind::Uuid,
            timestamps: false,
            timestamp_fields: vec!["createdAt".to_string(), "updatedAt".to_string()],
            relations: Vec::new(),
        }
    }

    /// Sets the identifier kind.
    #[must_use]
    pub fn with_ref_kind(mut self, kind: RefKind) -> Self {
        self.ref_kind = kind;
        self
    }

    /// Enables timestamp tracking with the default field names.
    #[must_use]
    pub fn with_timestamps(mut self) -> Self {
        self.timestamps = true;
        self
    }

    /// Declares a reference field by JSON pointer (e.g. "/author").
    #[must_use]
    pub fn with_relation(mut self, pointer: impl Into<String>) -> Self {
        self.relations.push(pointer.into());
        self
    }
}
