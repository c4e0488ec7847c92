//! Spartan Schema compiler and validation library
//!
//! A schema source is a plain [`Value`](spartan_value::Value):
//!
//! ```json
//! {
//!   "spartan": 1,
//!   "let": { "Name": "string" },
//!   "schema": { "first": ["ref", "Name"], "age": ["optional", "integer"] }
//! }
//! ```
//!
//! [`compile`] turns it into a [`SchemaDocument`], which can then [`validate`],
//! [`restrict`] and synthesize zero values for data of any shape.

pub mod check;
pub mod coerce;
pub mod compile;
pub mod error;
pub mod identifiers;
pub mod lookup;
mod parse;
pub mod restrict;
pub mod schema;
pub mod shape;
pub mod to_source;
pub mod validate;
pub mod zero;

pub use check::{SourceDiagnostic, check_source, is_schema};
pub use coerce::coerce_scalar;
pub use compile::compile;
pub use error::{AmbiguousPathError, CompileError, CompileErrorKind, RecursionError};
pub use restrict::{RestrictOptions, restrict, restrict_node};
pub use schema::{
    ArraySchema, DictionarySchema, EnumSchema, ObjectField, ObjectSchema, OneOfSchema,
    ReferenceSchema, ScalarType, SchemaDocument, SchemaNode, SchemaNodeContent, SchemaNodeId,
    SchemaRef, TupleSchema,
};
pub use shape::ShapeSet;
pub use validate::{Mismatch, MismatchKind, ValidateOptions, validate, validate_node};
pub use zero::zero_value_node;
