//! Text Serialization
//!
//! A hand-rolled, human-readable save format: nested brace-delimited
//! blocks of indented `key: value` lines. The writer and reader are
//! deliberately tiny - no escaping, no schema, no version negotiation.
//! Forward compatibility comes from one place only: readers skip any
//! field they don't recognize, scalar or nested block alike, so newer
//! files load on older code.
//!
//! Types participate by implementing [`Serialize`] and [`Deserialize`];
//! impls for the primitives and the glam vectors live here, game types
//! implement them next to their definitions.

pub mod reader;
pub mod writer;

pub use reader::{Deserialize, Deserializer};
pub use writer::{Serialize, Serializer, INDENT_WIDTH};
