//! Generic value tree for Spartan Schema.
//!
//! Schemas and the data they describe are both expressed as a [`Value`]: the
//! JSON-like tree produced by whatever parser read the source text.

/// A type-safe data-type of the Spartan data-model.
pub mod value;

/// String-keyed, insertion-ordered mapping used by [`Value::Mapping`].
pub mod map;

/// Data structure for representing a location in a value or schema tree.
pub mod path;

pub use map::Map;
pub use path::{Path, PathParseError, PathStep};
pub use value::{Timestamp, Value, ValueKind};
