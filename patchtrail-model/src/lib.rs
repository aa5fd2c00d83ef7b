//! Entity model for patchtrail.
//!
//! Defines the generic `Entity` the engine observes, the `EntitySchema`
//! describing how an entity type is keyed and normalized, and the snapshot
//! normalizer producing comparable data views. The host store owns entity
//! lifecycle — this crate only models what the change tracker needs to see.

mod entity;
mod normalize;
mod schema;

pub use entity::Entity;
pub use normalize::data_view;
pub use schema::EntitySchema;
