//! The rollback engine.
//!
//! Reconstructs any past state of an entity by replaying its patch records
//! from `{}` up to a target, then optionally commits the reconstruction as
//! a new current state through a normal tracked save — which itself
//! produces a new forward-pointing patch record.

use crate::{EngineError, EngineResult, Tracker};
use patchtrail_model::Entity;
use patchtrail_patch::replay;
use patchtrail_types::{PatchId, RefId};
use serde_json::{Map, Value};
use tracing::debug;

impl Tracker {
    /// Rolls an entity back to the state as of the target patch record.
    ///
    /// Validation: the target must exist in the entity's history
    /// (`UnknownPatch` otherwise) and must not be the most recent record
    /// (`RollbackToLatest` — rolling back to the current state is misuse,
    /// not a state change). Replay failures indicate corrupted history and
    /// propagate as fatal.
    ///
    /// `overrides` is merged onto the replayed state, winning on key
    /// collision. With `commit` the merged state is assigned onto the live
    /// entity and saved through the normal lifecycle; without it the
    /// reconstructed entity is returned unpersisted.
    pub async fn rollback(
        &self,
        id: &RefId,
        target: PatchId,
        overrides: Map<String, Value>,
        commit: bool,
    ) -> EngineResult<Entity> {
        let records = self.history(id).await?;

        let position = records
            .iter()
            .position(|record| record.id == target)
            .ok_or(EngineError::UnknownPatch(target))?;
        if position + 1 == records.len() {
            return Err(EngineError::RollbackToLatest);
        }

        let mut state = Value::Object(Map::new());
        for record in &records[..=position] {
            replay(&mut state, &record.ops)?;
        }

        if let Value::Object(map) = &mut state {
            for (key, value) in overrides {
                map.insert(key, value);
            }
        }

        debug!(
            collection = %self.collection().collection,
            entity = %id,
            target = %target,
            replayed = position + 1,
            commit,
            "rolled back entity state"
        );

        if !commit {
            return Ok(Entity::new(id.clone(), state));
        }

        let mut entity = self
            .entities()
            .find_by_id(id)
            .await?
            .ok_or_else(|| EngineError::EntityNotFound(id.canonical()))?;
        // Snapshot first so the forward patch diffs current → reconstructed.
        entity.snapshot(self.schema());
        entity.assign(state, self.schema());
        self.save(&mut entity).await?;
        Ok(entity)
    }
}
