//! The lifecycle coordinator.
//!
//! A `Tracker` instruments one entity type: it captures consistent "before"
//! and "after" data views around every mutation, runs the patch algebra,
//! and persists the resulting record — per logical mutation:
//!
//! capture before → mutate → capture after → diff → persist (or no-op)
//!
//! Failures at any stage abort the enclosing operation and surface to the
//! caller unchanged. The store mutation itself is not compensated — there
//! is no atomicity between the entity write and the patch write.

use crate::config::{IncludeField, TrackerConfig, RESERVED_FIELDS};
use crate::{EngineError, EngineResult};
use futures::future::try_join_all;
use patchtrail_model::{Entity, EntitySchema};
use patchtrail_patch::{apply_exclusions, apply_original_values, compare, ExcludeRule};
use patchtrail_store::{
    set_fields, CollectionName, EntityStore, Filter, HistoryStore, Update, UpdateOutcome,
};
use patchtrail_types::{PatchRecord, RefId};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Change tracker for one instrumented entity type.
pub struct Tracker {
    schema: EntitySchema,
    config: TrackerConfig,
    rules: Vec<ExcludeRule>,
    collection: CollectionName,
    entities: Arc<dyn EntityStore>,
    history: Arc<dyn HistoryStore>,
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("schema", &self.schema)
            .field("config", &self.config)
            .field("rules", &self.rules)
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl Tracker {
    /// Validates the configuration and builds a tracker.
    ///
    /// Fails synchronously with `EngineError::Configuration` on an empty
    /// history name, an extra field shadowing a record field, an empty
    /// include source, or an unparsable exclusion pattern.
    pub fn new(
        schema: EntitySchema,
        config: TrackerConfig,
        entities: Arc<dyn EntityStore>,
        history: Arc<dyn HistoryStore>,
    ) -> EngineResult<Self> {
        if config.name.trim().is_empty() {
            return Err(EngineError::Configuration(
                "`name` option must be defined".into(),
            ));
        }
        for (name, field) in &config.includes {
            if RESERVED_FIELDS.contains(&name.as_str()) {
                return Err(EngineError::Configuration(format!(
                    "conflicting extra field: `{name}`"
                )));
            }
            if field.from.as_deref().is_some_and(|s| s.trim().is_empty()) {
                return Err(EngineError::Configuration(format!(
                    "extra field `{name}` has an empty source"
                )));
            }
        }

        let rules = config
            .excludes
            .iter()
            .map(|pattern| {
                ExcludeRule::parse(pattern).map_err(|e| EngineError::Configuration(e.to_string()))
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let collection = CollectionName::resolve(&config.name, &config.naming);

        Ok(Self {
            schema,
            config,
            rules,
            collection,
            entities,
            history,
        })
    }

    /// The instrumented entity schema.
    #[must_use]
    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    /// The resolved history collection name.
    #[must_use]
    pub fn collection(&self) -> &CollectionName {
        &self.collection
    }

    /// The entity store collaborator.
    #[must_use]
    pub fn entities(&self) -> &Arc<dyn EntityStore> {
        &self.entities
    }

    // ── Lifecycle operations ─────────────────────────────────────

    /// Creates a new entity with a generated identifier and records the
    /// initial patch (prior view: `{}`).
    pub async fn create(&self, data: Value) -> EngineResult<Entity> {
        let id = RefId::generate(self.schema.ref_kind)
            .map_err(|e| EngineError::Configuration(e.to_string()))?;
        self.create_with_id(id, data).await
    }

    /// Creates a new entity under a caller-supplied identifier.
    pub async fn create_with_id(&self, id: RefId, data: Value) -> EngineResult<Entity> {
        let mut stored = self.entities.insert(Entity::new(id, data)).await?;
        let after = stored.data_view(&self.schema);
        self.commit_patch(&stored.id, &Value::Object(Map::new()), &after, Some(&stored))
            .await?;
        stored.snapshot(&self.schema);
        Ok(stored)
    }

    /// Loads the first entity matching the filter, with its snapshot
    /// primed so a later `save` diffs against the loaded state.
    pub async fn load(&self, filter: &Filter) -> EngineResult<Option<Entity>> {
        let mut found = self.entities.find_one(filter).await?;
        if let Some(entity) = &mut found {
            entity.snapshot(&self.schema);
        }
        Ok(found)
    }

    /// Loads an entity by identifier, with its snapshot primed.
    pub async fn load_by_id(&self, id: &RefId) -> EngineResult<Option<Entity>> {
        let mut found = self.entities.find_by_id(id).await?;
        if let Some(entity) = &mut found {
            entity.snapshot(&self.schema);
        }
        Ok(found)
    }

    /// Saves a known entity, recording the diff against the snapshot taken
    /// when it was last loaded or saved. Returns the persisted record, or
    /// `None` when nothing observable changed.
    pub async fn save(&self, entity: &mut Entity) -> EngineResult<Option<PatchRecord>> {
        let before = entity
            .original()
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));

        self.entities.save(entity).await?;

        // Re-read so store-side bookkeeping (timestamps) is visible before
        // the after snapshot is taken.
        if let Some(stored) = self.entities.find_by_id(&entity.id).await? {
            entity.data = stored.data;
        }
        let after = entity.data_view(&self.schema);

        let record = self
            .commit_patch(&entity.id, &before, &after, Some(entity))
            .await?;
        entity.snapshot(&self.schema);
        Ok(record)
    }

    /// Applies an update to the first matching entity, recording the diff
    /// against that entity's pre-mutation view.
    ///
    /// An update that matches or modifies nothing is a no-op, not an error.
    pub async fn update_one(
        &self,
        filter: &Filter,
        update: &Update,
    ) -> EngineResult<UpdateOutcome> {
        let previous = self.entities.find_one(filter).await?;
        let (before, remembered) = match &previous {
            Some(entity) => (entity.data_view(&self.schema), Some(entity.id.clone())),
            None => (Value::Object(Map::new()), None),
        };

        let outcome = self.entities.update_one(filter, update).await?;
        if outcome.modified == 0 {
            debug!(collection = %self.collection.collection, "update matched nothing, no patch");
            return Ok(outcome);
        }

        let resolved = match &remembered {
            Some(id) => match self.entities.find_by_id(id).await? {
                Some(entity) => Some(entity),
                // The mutation may have altered the fields the original
                // filter relied on; fall back to the reconciled condition
                // set.
                None => {
                    self.entities
                        .find_one(&reconcile(filter, update))
                        .await?
                }
            },
            None => self.entities.find_one(&reconcile(filter, update)).await?,
        };

        match resolved {
            Some(entity) => {
                let after = entity.data_view(&self.schema);
                self.commit_patch(&entity.id, &before, &after, Some(&entity))
                    .await?;
            }
            None => {
                warn!(
                    collection = %self.collection.collection,
                    "updated entity could not be re-resolved, skipping patch"
                );
            }
        }
        Ok(outcome)
    }

    /// Applies an update to every matching entity.
    ///
    /// Before the mutation, all matching identifiers and data views are
    /// captured in index-aligned lists; afterwards each entity is
    /// re-resolved by its remembered identifier and diffed against the view
    /// at the same index, so pairing survives entities that the update
    /// pushed out of the original filter. Per-entity diff/persist steps run
    /// concurrently.
    pub async fn update_many(
        &self,
        filter: &Filter,
        update: &Update,
    ) -> EngineResult<UpdateOutcome> {
        let previous = self.entities.find_many(filter).await?;
        let captured: Vec<(RefId, Value)> = previous
            .iter()
            .map(|entity| (entity.id.clone(), entity.data_view(&self.schema)))
            .collect();

        let outcome = self.entities.update_many(filter, update).await?;
        if outcome.modified == 0 {
            debug!(collection = %self.collection.collection, "bulk update modified nothing");
            return Ok(outcome);
        }

        try_join_all(
            captured
                .iter()
                .map(|(id, before)| self.repatch(id, before)),
        )
        .await?;
        Ok(outcome)
    }

    /// Removes every matching entity and, when configured, purges each
    /// one's patch history.
    pub async fn remove(&self, filter: &Filter) -> EngineResult<u64> {
        let victims = self.entities.find_many(filter).await?;
        let removed = self.entities.remove(filter).await?;

        if self.config.remove_history_on_delete {
            try_join_all(
                victims
                    .iter()
                    .map(|entity| self.history.remove_by_ref(&entity.id)),
            )
            .await?;
        }
        Ok(removed)
    }

    /// The entity's full patch history, ordered by creation date ascending.
    pub async fn history(&self, id: &RefId) -> EngineResult<Vec<PatchRecord>> {
        Ok(self.history.find_by_ref(id).await?)
    }

    // ── Internals ────────────────────────────────────────────────

    /// Re-resolves one bulk-updated entity and records its diff. An entity
    /// that no longer resolves is skipped: a missing patch is preferable to
    /// one attributed to the wrong entity.
    async fn repatch(&self, id: &RefId, before: &Value) -> EngineResult<()> {
        match self.entities.find_by_id(id).await? {
            Some(entity) => {
                let after = entity.data_view(&self.schema);
                self.commit_patch(id, before, &after, Some(&entity)).await?;
                Ok(())
            }
            None => {
                warn!(
                    collection = %self.collection.collection,
                    entity = %id,
                    "bulk-updated entity no longer resolves, skipping patch"
                );
                Ok(())
            }
        }
    }

    /// Diffs two views, filters and tags the operations, and persists a
    /// record when the result is non-empty.
    pub(crate) async fn commit_patch(
        &self,
        ref_id: &RefId,
        before: &Value,
        after: &Value,
        source: Option<&Entity>,
    ) -> EngineResult<Option<PatchRecord>> {
        let ops = compare(before, after);
        let ops = apply_exclusions(ops, &self.rules)?;
        if ops.is_empty() {
            debug!(
                collection = %self.collection.collection,
                entity = %ref_id,
                "no observable change, skipping patch record"
            );
            return Ok(None);
        }
        let ops = if self.config.track_original_value {
            apply_original_values(ops, before)?
        } else {
            ops
        };

        let mut record = PatchRecord::new(ref_id.clone(), ops);
        for (name, field) in &self.config.includes {
            match source.and_then(|entity| lookup_include(entity, name, field)) {
                Some(value) => {
                    record.extra.insert(name.clone(), value);
                }
                None if field.required => {
                    return Err(EngineError::MissingInclude(name.clone()));
                }
                None => {}
            }
        }

        Ok(Some(self.history.create(record).await?))
    }
}

/// Merges a pre-mutation filter with the fields the update actually set,
/// stripping operator-prefixed keys, to locate the affected row after the
/// mutation invalidated the original filter.
fn reconcile(filter: &Filter, update: &Update) -> Filter {
    let mut merged: Filter = filter
        .iter()
        .filter(|(key, _)| !key.starts_with('$'))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    for (key, value) in set_fields(update) {
        merged.insert(key, value);
    }
    merged
}

/// Sources an extra field's value from the entity document: JSON pointer
/// when the source starts with `/`, top-level field otherwise.
fn lookup_include(entity: &Entity, name: &str, field: &IncludeField) -> Option<Value> {
    let source = field.from.as_deref().unwrap_or(name);
    let value = if source.starts_with('/') {
        entity.data.pointer(source)
    } else {
        entity.data.get(source)
    };
    value.cloned().or_else(|| {
        // The identifier itself is a valid source (e.g. `from: "id"` on a
        // schema whose document does not mirror it).
        (source == "id" || source == "_id")
            .then(|| Value::String(entity.id.canonical()))
    })
}
