//! Value validation against a compiled schema
//!
//! # Architecture
//!
//! - `SchemaValidator`: Dispatches to type-specific validators based on `SchemaNodeContent`
//! - Type validators: Implement `ValueValidator`, recording mismatches in the context
//! - `ValidationContext`: Manages shared state (mismatches, path)
//!
//! Validation only descends as deep as the value does, so it terminates on
//! recursive schemas without any cycle bookkeeping.

mod compound;
mod context;
mod error;
mod object;
mod primitive;
mod reference;
mod union;

pub use context::{ValidationContext, ValidationState};
pub use error::{Mismatch, MismatchKind};

use spartan_value::{Path, Value};

use crate::{SchemaDocument, SchemaNodeContent, SchemaNodeId};

use compound::{ArrayValidator, DictionaryValidator, TupleValidator};
use object::ObjectValidator;
use primitive::{EnumValidator, ScalarValidator};
use reference::ReferenceValidator;
use union::OneOfValidator;

/// Options for [`validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Accept object keys the schema does not declare (default `true`)
    pub allow_extra_fields: bool,
    /// Prepended to every reported data path
    pub path_prefix: Path,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            allow_extra_fields: true,
            path_prefix: Path::root(),
        }
    }
}

impl ValidateOptions {
    /// Report undeclared object keys as mismatches
    pub fn strict() -> Self {
        Self {
            allow_extra_fields: false,
            ..Self::default()
        }
    }

    pub fn with_path_prefix(mut self, path_prefix: Path) -> Self {
        self.path_prefix = path_prefix;
        self
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Validate a value against the root of a schema.
///
/// An empty result means the value conforms.
pub fn validate(schema: &SchemaDocument, value: &Value, options: &ValidateOptions) -> Vec<Mismatch> {
    validate_node(schema, schema.root(), value, options)
}

/// Validate a value against a specific schema node.
pub fn validate_node(
    schema: &SchemaDocument,
    schema_node_id: SchemaNodeId,
    value: &Value,
    options: &ValidateOptions,
) -> Vec<Mismatch> {
    let ctx = ValidationContext::new(schema, options);
    SchemaValidator {
        ctx: &ctx,
        schema_node_id,
    }
    .validate(value);
    ctx.finish()
}

// =============================================================================
// SchemaValidator (main dispatcher)
// =============================================================================

/// A validator for one kind of schema node.
pub trait ValueValidator {
    fn validate(&mut self, value: &Value);
}

/// Main validator that dispatches to type-specific validators.
pub struct SchemaValidator<'a, 's> {
    pub ctx: &'a ValidationContext<'s>,
    pub schema_node_id: SchemaNodeId,
}

impl ValueValidator for SchemaValidator<'_, '_> {
    fn validate(&mut self, value: &Value) {
        let schema_node = self.ctx.schema.node(self.schema_node_id);

        match &schema_node.content {
            SchemaNodeContent::Any => {}
            SchemaNodeContent::Scalar(scalar) => ScalarValidator {
                ctx: self.ctx,
                scalar: *scalar,
                schema_node_id: self.schema_node_id,
            }
            .validate(value),
            SchemaNodeContent::Enum(s) => EnumValidator {
                ctx: self.ctx,
                schema: s,
                schema_node_id: self.schema_node_id,
            }
            .validate(value),
            SchemaNodeContent::Object(s) => ObjectValidator {
                ctx: self.ctx,
                schema: s,
                schema_node_id: self.schema_node_id,
            }
            .validate(value),
            SchemaNodeContent::Array(s) => ArrayValidator {
                ctx: self.ctx,
                schema: s,
                schema_node_id: self.schema_node_id,
            }
            .validate(value),
            SchemaNodeContent::Tuple(s) => TupleValidator {
                ctx: self.ctx,
                schema: s,
                schema_node_id: self.schema_node_id,
            }
            .validate(value),
            SchemaNodeContent::Dictionary(s) => DictionaryValidator {
                ctx: self.ctx,
                schema: s,
                schema_node_id: self.schema_node_id,
            }
            .validate(value),
            SchemaNodeContent::OneOf(s) => OneOfValidator {
                ctx: self.ctx,
                schema: s,
                schema_node_id: self.schema_node_id,
            }
            .validate(value),
            SchemaNodeContent::Reference(r) => ReferenceValidator {
                ctx: self.ctx,
                reference: r,
            }
            .validate(value),
        }
    }
}

/// Validate `value` against `schema_node_id` in the same context.
pub(crate) fn validate_child(ctx: &ValidationContext<'_>, schema_node_id: SchemaNodeId, value: &Value) {
    SchemaValidator {
        ctx,
        schema_node_id,
    }
    .validate(value);
}
