//! Error taxonomy for the change-tracking engine.

use patchtrail_patch::PatchError;
use patchtrail_store::StoreError;
use patchtrail_types::PatchId;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur in the engine.
///
/// `Configuration` is fatal at setup and never raised afterwards.
/// `UnknownPatch` and `RollbackToLatest` are recoverable — the caller
/// decides. `Store` is the collaborator's failure propagated verbatim.
/// `Patch` indicates a consistency violation in stored history and is not
/// recoverable by retrying.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing or conflicting setup option. Raised synchronously by
    /// `Tracker::new`, before any entity is instrumented.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Rollback target not found in the entity's history.
    #[error("unknown patch: {0}")]
    UnknownPatch(PatchId),

    /// Rollback target is already the current state.
    #[error("rollback target is already the latest state")]
    RollbackToLatest,

    /// An entity required for the operation does not exist.
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// A required extra field could not be sourced from the entity.
    #[error("required extra field missing: {0}")]
    MissingInclude(String),

    /// Store collaborator failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Patch computation or replay failure (corrupted history).
    #[error("patch error: {0}")]
    Patch(#[from] PatchError),
}
