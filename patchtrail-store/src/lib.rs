//! Storage boundary for patchtrail.
//!
//! Defines the two async collaborator traits the engine drives:
//!
//! - [`EntityStore`] — the host's persistent store, exposing create/find/
//!   update/remove primitives over a Mongo-style equality filter language.
//!   "Zero rows affected" is reported via [`UpdateOutcome`], distinguishable
//!   from an error.
//! - [`HistoryStore`] — the named per-entity-type collection holding
//!   immutable patch records.
//!
//! Ships in-memory implementations of both, used by every integration test
//! and usable as a real embedded backend. Collection naming derives from a
//! logical name through a pluggable pair of pure string transforms
//! (pascal-case model name, snake-case collection name by default).

mod entity_store;
mod error;
mod filter;
mod history_store;
mod memory;
mod naming;

pub use entity_store::{EntityStore, UpdateOutcome};
pub use error::{StoreError, StoreResult};
pub use filter::{apply_update, matches, set_fields, Filter, Update};
pub use history_store::HistoryStore;
pub use memory::{MemoryEntityStore, MemoryHistoryStore};
pub use naming::{pascal_case, snake_case, CollectionName, NamingTransforms};
