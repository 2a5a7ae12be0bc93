//! MINNOW: a tiny 2D game engine core
//!
//! The whole engine is three load-bearing pieces and a little glue:
//! - Generational handle pools: fixed-capacity object storage with
//!   stale-handle detection (`pool`)
//! - A kind-dispatched entity world built on one pool per kind (`game`)
//! - A hand-rolled indented text format for saves, with lossless
//!   unknown-field skipping for forward compatibility (`serial`)
//!
//! Rendering, windowing, input and audio are deliberately absent: the
//! core exposes plain data (transforms, tints, sprite cells, texture
//! pixels) and lets the hosting application bring its own backends.
//! Textures live in a registry built on the same pool primitive
//! (`texture`), and startup knobs come from a RON config (`config`).
//!
//! Everything is single-threaded and value-based: no globals, no
//! panics in library code, fallible operations signal with sentinel
//! handles, `bool`, `Option`, or an error enum at file boundaries.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod game;
pub mod pool;
pub mod serial;
pub mod texture;

pub use config::{ConfigError, EngineConfig};
pub use game::{
    load_world, save_world, Entity, EntityHandle, EntityKind, SaveError, World,
};
pub use pool::{Handle, HandlePool};
pub use serial::{Deserialize, Deserializer, Serialize, Serializer};
pub use texture::{Texture, TextureError, TextureLibrary};
