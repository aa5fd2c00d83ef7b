//! The host entity store collaborator.

use crate::{Filter, StoreResult, Update};
use async_trait::async_trait;
use patchtrail_model::Entity;
use patchtrail_types::RefId;

/// Row counts reported by update operations.
///
/// `modified == 0` is the host's "nothing modified" signal — a valid
/// outcome, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    /// Entities the filter matched.
    pub matched: u64,
    /// Entities the update actually changed.
    pub modified: u64,
}

/// The persistent store owning entity lifecycle.
///
/// The engine only observes transitions through these primitives; it never
/// assumes anything about the backing implementation beyond the documented
/// contract. All methods suspend only for store I/O.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Persists a new entity and returns it as stored.
    async fn insert(&self, entity: Entity) -> StoreResult<Entity>;

    /// Looks up one entity by identifier.
    async fn find_by_id(&self, id: &RefId) -> StoreResult<Option<Entity>>;

    /// Returns the first entity matching the filter, in insertion order.
    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Entity>>;

    /// Returns every entity matching the filter, in insertion order.
    async fn find_many(&self, filter: &Filter) -> StoreResult<Vec<Entity>>;

    /// Writes an entity's full document by identifier, inserting when the
    /// identifier is unknown.
    async fn save(&self, entity: &Entity) -> StoreResult<()>;

    /// Applies an update to the first matching entity.
    async fn update_one(&self, filter: &Filter, update: &Update) -> StoreResult<UpdateOutcome>;

    /// Applies an update to every matching entity.
    async fn update_many(&self, filter: &Filter, update: &Update) -> StoreResult<UpdateOutcome>;

    /// Deletes every matching entity, returning the number removed.
    async fn remove(&self, filter: &Filter) -> StoreResult<u64>;
}
