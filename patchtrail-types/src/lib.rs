//! Core type definitions for patchtrail.
//!
//! This crate defines the storage-agnostic data model shared by the rest of
//! the engine:
//! - Entity references (`RefId`) of configurable kind (text, integer, UUID)
//! - Patch identifiers (UUID v7, time-ordered)
//! - RFC-6902-style patch operations (`add`/`remove`/`replace`)
//! - Immutable patch records (one persisted diff per entity transition)
//!
//! Anything domain-specific (what the entity documents contain) belongs to
//! the host application, not here.

mod ids;
mod op;
mod record;

pub use ids::{PatchId, RefId, RefKind};
pub use op::{OpKind, PatchOp};
pub use record::PatchRecord;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid reference: {0}")]
    InvalidRef(String),
}
