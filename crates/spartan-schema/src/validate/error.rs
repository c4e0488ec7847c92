//! Validation result types
//!
//! A [`Mismatch`] is a value, not a fault: validation always succeeds and returns
//! the (possibly empty) list of places where the data disagrees with the schema.

use core::fmt::{self, Display};

use spartan_value::{Path, Value, ValueKind};
use thiserror::Error;

use crate::SchemaNodeId;

/// What disagreed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MismatchKind {
    #[error("expected {expected}, found {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: ValueKind,
    },

    #[error("expected integer, found non-integer number {0}")]
    NotAnInteger(f64),

    #[error("expected one of {}", render_members(.members))]
    NotInEnum { members: Vec<Value> },

    #[error("missing required field `{field}`")]
    MissingRequiredField { field: String },

    /// Only reported when extra fields are not allowed
    #[error("unknown field `{field}`")]
    UnknownField { field: String },

    #[error("expected a tuple of {expected} elements, found {actual}")]
    TupleLengthMismatch { expected: usize, actual: usize },

    #[error("expected at least {min} elements, found {actual}")]
    ArrayTooShort { min: usize, actual: usize },

    /// See [`Mismatch::alternatives`] for why each alternative failed
    #[error("value matches none of the {count} alternatives")]
    NoAlternativeMatched { count: usize },
}

/// A single disagreement between a value and a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub kind: MismatchKind,
    /// Schema node whose rule failed
    pub schema_node_id: SchemaNodeId,
    /// Offending value (the whole mapping for field-level mismatches)
    pub actual: Value,
    /// Location in the validated value
    pub data_path: Path,
    /// Location in the schema source of the failing rule
    pub schema_path: Path,
    /// For [`MismatchKind::NoAlternativeMatched`], the mismatches of each
    /// alternative in declaration order; empty otherwise
    pub alternatives: Vec<Vec<Mismatch>>,
}

impl Mismatch {
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.data_path)
    }
}

fn render_members(members: &[Value]) -> String {
    members
        .iter()
        .map(render_literal)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("{s:?}"),
        other => other.kind().to_string(),
    }
}
