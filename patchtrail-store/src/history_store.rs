//! The patch record storage collaborator.

use crate::StoreResult;
use async_trait::async_trait;
use patchtrail_types::{PatchRecord, RefId};

/// A named collection of immutable patch records for one entity type.
///
/// No business logic lives here — a thin persistence boundary. `date`,
/// `ops` and `ref` are required on every record (the type system enforces
/// this); `ref` is expected to be indexed by real implementations.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persists a record. Records are immutable once created.
    async fn create(&self, record: PatchRecord) -> StoreResult<PatchRecord>;

    /// Returns every record referencing the entity, ordered by creation
    /// date ascending (ties by time-ordered record id).
    async fn find_by_ref(&self, ref_id: &RefId) -> StoreResult<Vec<PatchRecord>>;

    /// Deletes every record referencing the entity, returning the number
    /// removed.
    async fn remove_by_ref(&self, ref_id: &RefId) -> StoreResult<u64>;
}
