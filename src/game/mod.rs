//! Game Foundation Module
//!
//! The entity layer: a closed set of entity kinds, a tagged record per
//! entity, and a world that owns one generational pool per kind.
//!
//! Key concepts:
//! - EntityKind: closed enum selecting the owning pool
//! - Entity: plain data record, no behavior
//! - EntityHandle: kind tag + generational pool handle
//! - World: the registry facade (create/destroy/get/for_each_enabled)
//!
//! Save files round-trip the whole population through the text format
//! in `serial`; see `save` for the file-level helpers.

pub mod entity;
pub mod save;
pub mod world;

// Re-export main types
pub use entity::{Entity, EntityHandle, EntityKind};
pub use save::{load_world, save_world, SaveError};
pub use world::{World, DEFAULT_ENTITY_CAPACITY};
