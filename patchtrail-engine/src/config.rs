//! Tracker configuration.
//!
//! Built once at setup from typed fields — no loose option maps merged at
//! call time. `Tracker::new` validates eagerly and rejects bad
//! configuration with a fatal `ConfigurationError` before any entity is
//! instrumented.

use patchtrail_store::NamingTransforms;
use std::collections::BTreeMap;

/// Field names the patch record schema reserves for itself. An extra field
/// may not shadow them.
pub(crate) const RESERVED_FIELDS: [&str; 4] = ["id", "date", "ops", "ref"];

/// An extra contextual field copied onto every patch record.
#[derive(Debug, Clone, Default)]
pub struct IncludeField {
    /// Where to source the value from in the entity document: a top-level
    /// field name or a JSON pointer. Defaults to the include's own name.
    pub from: Option<String>,

    /// Whether persisting a record without this field is an error.
    pub required: bool,
}

impl IncludeField {
    /// An optional field sourced from the entity field of the same name.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source field or pointer.
    #[must_use]
    pub fn from(mut self, source: impl Into<String>) -> Self {
        self.from = Some(source.into());
        self
    }

    /// Marks this field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Configuration surface of a tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Logical history name (e.g. "PostHistory"). Required. The model and
    /// collection identifiers derive from it via `naming`.
    pub name: String,

    /// Extra record fields, keyed by the name they get on the record.
    pub includes: BTreeMap<String, IncludeField>,

    /// Exclusion-rule path patterns. `*` segments match any array index.
    pub excludes: Vec<String>,

    /// Whether removing an entity also purges its patch records.
    pub remove_history_on_delete: bool,

    /// Whether surviving operations carry the pre-mutation value at their
    /// path as `originalValue`.
    pub track_original_value: bool,

    /// Transforms from the logical name to model/collection identifiers.
    pub naming: NamingTransforms,
}

impl TrackerConfig {
    /// Creates a configuration with the documented defaults.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            includes: BTreeMap::new(),
            excludes: Vec::new(),
            remove_history_on_delete: true,
            track_original_value: false,
            naming: NamingTransforms::default(),
        }
    }

    /// Adds an extra record field.
    #[must_use]
    pub fn with_include(mut self, name: impl Into<String>, field: IncludeField) -> Self {
        self.includes.insert(name.into(), field);
        self
    }

    /// Adds an exclusion pattern.
    #[must_use]
    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.excludes.push(pattern.into());
        self
    }

    /// Keeps patch records when their entity is removed.
    #[must_use]
    pub fn keep_history_on_delete(mut self) -> Self {
        self.remove_history_on_delete = false;
        self
    }

    /// Enables original-value tracking.
    #[must_use]
    pub fn with_original_values(mut self) -> Self {
        self.track_original_value = true;
        self
    }

    /// Overrides the naming transforms.
    #[must_use]
    pub fn with_naming(mut self, naming: NamingTransforms) -> Self {
        self.naming = naming;
        self
    }
}
