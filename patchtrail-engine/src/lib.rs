//! Change-tracking engine for patchtrail.
//!
//! Sits between a mutable persistent entity and its storage layer: every
//! observable state change is diffed against the entity's previous data
//! view, persisted as an immutable patch record, and replayable later to
//! reconstruct any prior state.
//!
//! # Components
//!
//! - **Tracker** — the lifecycle coordinator: instruments create, save,
//!   filter-based single/bulk update, and remove around the host store
//! - **Rollback** — validates a target history point and reconstructs
//!   entity state from the record sequence (`Tracker::rollback`)
//! - Configuration is a typed struct validated once at setup
//!   ([`TrackerConfig`])
//!
//! # Example
//!
//! ```
//! use patchtrail_engine::{Tracker, TrackerConfig};
//! use patchtrail_model::EntitySchema;
//! use patchtrail_store::{CollectionName, MemoryEntityStore, MemoryHistoryStore};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let config = TrackerConfig::new("PostHistory");
//! let collection = CollectionName::resolve(&config.name, &config.naming);
//! let tracker = Tracker::new(
//!     EntitySchema::new("post"),
//!     config,
//!     Arc::new(MemoryEntityStore::new()),
//!     Arc::new(MemoryHistoryStore::new(collection)),
//! )
//! .unwrap();
//!
//! let post = tracker.create(json!({ "prop": "foo" })).await.unwrap();
//! let history = tracker.history(&post.id).await.unwrap();
//! assert_eq!(history.len(), 1);
//! # });
//! ```

mod config;
mod error;
mod rollback;
mod tracker;

pub use config::{IncludeField, TrackerConfig};
pub use error::{EngineError, EngineResult};
pub use tracker::Tracker;
