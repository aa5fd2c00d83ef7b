//! In-memory store implementations.
//!
//! Insertion-ordered, suitable both as the test double for the engine's
//! integration suites and as a real embedded backend for hosts that keep
//! their entities in process memory.

use crate::{
    apply_update, matches, CollectionName, EntityStore, Filter, HistoryStore, StoreResult, Update,
    UpdateOutcome,
};
use async_trait::async_trait;
use chrono::Utc;
use patchtrail_model::{Entity, EntitySchema};
use patchtrail_types::{PatchRecord, RefId};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

/// An insertion-ordered in-memory entity store.
///
/// When built with a schema that declares timestamp tracking, the store
/// maintains the schema's timestamp fields inside each document, the way a
/// real ODM would.
#[derive(Debug, Default)]
pub struct MemoryEntityStore {
    schema: Option<EntitySchema>,
    rows: RwLock<Vec<Entity>>,
}

impl MemoryEntityStore {
    /// Creates an empty store with no timestamp bookkeeping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that maintains the schema's timestamp fields.
    #[must_use]
    pub fn with_schema(schema: EntitySchema) -> Self {
        Self {
            schema: Some(schema),
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored entities.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether the store holds no entities.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn touch(&self, entity: &mut Entity, is_new: bool) {
        let Some(schema) = &self.schema else { return };
        if !schema.timestamps {
            return;
        }
        let Value::Object(map) = &mut entity.data else {
            return;
        };
        let now = Value::String(Utc::now().to_rfc3339());
        if is_new {
            if let Some(created) = schema.timestamp_fields.first() {
                map.insert(created.clone(), now.clone());
            }
        }
        if let Some(updated) = schema.timestamp_fields.get(1) {
            map.insert(updated.clone(), now);
        }
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn insert(&self, mut entity: Entity) -> StoreResult<Entity> {
        self.touch(&mut entity, true);
        self.rows.write().await.push(entity.clone());
        Ok(entity)
    }

    async fn find_by_id(&self, id: &RefId) -> StoreResult<Option<Entity>> {
        Ok(self.rows.read().await.iter().find(|e| &e.id == id).cloned())
    }

    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Entity>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|e| matches(filter, &e.data))
            .cloned())
    }

    async fn find_many(&self, filter: &Filter) -> StoreResult<Vec<Entity>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|e| matches(filter, &e.data))
            .cloned()
            .collect())
    }

    async fn save(&self, entity: &Entity) -> StoreResult<()> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|e| e.id == entity.id) {
            Some(row) => {
                let mut next = entity.clone();
                self.touch(&mut next, false);
                *row = next;
            }
            None => {
                let mut next = entity.clone();
                self.touch(&mut next, true);
                rows.push(next);
            }
        }
        Ok(())
    }

    async fn update_one(&self, filter: &Filter, update: &Update) -> StoreResult<UpdateOutcome> {
        let mut rows = self.rows.write().await;
        let mut outcome = UpdateOutcome::default();
        if let Some(row) = rows.iter_mut().find(|e| matches(filter, &e.data)) {
            outcome.matched = 1;
            let before = row.data.clone();
            apply_update(&mut row.data, update);
            if row.data != before {
                self.touch(row, false);
                outcome.modified = 1;
            }
        }
        Ok(outcome)
    }

    async fn update_many(&self, filter: &Filter, update: &Update) -> StoreResult<UpdateOutcome> {
        let mut rows = self.rows.write().await;
        let mut outcome = UpdateOutcome::default();
        for row in rows.iter_mut().filter(|e| matches(filter, &e.data)) {
            outcome.matched += 1;
            let before = row.data.clone();
            apply_update(&mut row.data, update);
            if row.data != before {
                self.touch(row, false);
                outcome.modified += 1;
            }
        }
        Ok(outcome)
    }

    async fn remove(&self, filter: &Filter) -> StoreResult<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|e| !matches(filter, &e.data));
        Ok((before - rows.len()) as u64)
    }
}

/// An insertion-ordered in-memory patch record collection.
#[derive(Debug)]
pub struct MemoryHistoryStore {
    name: CollectionName,
    rows: RwLock<Vec<PatchRecord>>,
}

impl MemoryHistoryStore {
    /// Creates an empty collection under the given resolved name.
    #[must_use]
    pub fn new(name: CollectionName) -> Self {
        Self {
            name,
            rows: RwLock::new(Vec::new()),
        }
    }

    /// The resolved collection name.
    #[must_use]
    pub fn name(&self) -> &CollectionName {
        &self.name
    }

    /// Total number of stored records, across all entities.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether the collection holds no records.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn create(&self, record: PatchRecord) -> StoreResult<PatchRecord> {
        debug!(
            collection = %self.name.collection,
            entity = %record.ref_id,
            ops = record.ops.len(),
            "storing patch record"
        );
        self.rows.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_by_ref(&self, ref_id: &RefId) -> StoreResult<Vec<PatchRecord>> {
        let mut records: Vec<PatchRecord> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| &r.ref_id == ref_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn remove_by_ref(&self, ref_id: &RefId) -> StoreResult<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| &r.ref_id != ref_id);
        let removed = (before - rows.len()) as u64;
        if removed > 0 {
            debug!(
                collection = %self.name.collection,
                entity = %ref_id,
                removed,
                "purged patch records"
            );
        }
        Ok(removed)
    }
}
