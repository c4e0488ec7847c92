//! Error types for the spartan-schema crate

use spartan_value::{Path, ValueKind};
use thiserror::Error;

/// What is wrong with a schema source fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileErrorKind {
    #[error("schema source must be an object, found {0}")]
    InvalidRoot(ValueKind),

    #[error("schema source has no `schema` key")]
    MissingSchema,

    #[error("`spartan` must be 1")]
    InvalidVersion,

    #[error("`let` must be an object of label definitions, found {0}")]
    InvalidLetBlock(ValueKind),

    #[error("unknown type name {0:?}")]
    UnknownType(String),

    #[error("unknown directive {0:?}")]
    UnknownDirective(String),

    #[error("directive must be a string, found {0}")]
    InvalidDirective(ValueKind),

    #[error("empty array is not a schema type")]
    EmptyDirective,

    #[error("`{directive}` expects {expected}, found {found}")]
    InvalidArity {
        directive: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("enum members must be null, boolean, number or string, found {0}")]
    InvalidEnumMember(ValueKind),

    #[error("`optional` is only allowed as the value of an object field")]
    MisplacedOptional,

    #[error("`ref` expects a label name, found {0}")]
    InvalidReference(ValueKind),

    #[error("undefined label {0:?}")]
    UndefinedLabel(String),

    #[error("label {0:?} refers to itself without an enclosing object, array, tuple or dictionary")]
    UnguardedRecursion(String),

    #[error("{0} is not a schema type")]
    InvalidShape(ValueKind),
}

/// A schema source that does not conform to the grammar.
///
/// Returned as the fatal error of [`compile`](crate::compile) and, in bulk, as the
/// diagnostics of [`check_source`](crate::check_source).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {path}")]
pub struct CompileError {
    pub kind: CompileErrorKind,
    /// Location of the offending fragment, relative to the schema source root
    pub path: Path,
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, path: Path) -> Self {
        Self { kind, path }
    }

    /// Human-readable message without the location.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// A structural analysis re-entered a label it was already expanding.
///
/// Raised by zero-value synthesis and by fill-mode restriction, which have to
/// unfold every branch of the schema regardless of the input value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("label {label:?} is recursive and has no finite zero value (entered again at {schema_path})")]
pub struct RecursionError {
    pub label: String,
    /// Schema source location of the reference that closed the cycle
    pub schema_path: Path,
}

/// A path lookup whose result depends on the shape the data actually takes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("path {remaining} is ambiguous below {at}: the schema there has no fixed shape")]
pub struct AmbiguousPathError {
    /// Steps walked before the ambiguous node was reached
    pub at: Path,
    /// Steps that could not be resolved, starting at the ambiguous node
    pub remaining: Path,
}
