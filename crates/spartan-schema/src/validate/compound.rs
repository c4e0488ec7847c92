//! Compound type validators
//!
//! Validators for: Array, Tuple, Dictionary

use spartan_value::Value;

use crate::{ArraySchema, DictionarySchema, SchemaNodeId, TupleSchema};

use super::context::ValidationContext;
use super::error::MismatchKind;
use super::{ValueValidator, validate_child};

fn expect_sequence<'v>(
    ctx: &ValidationContext<'_>,
    schema_node_id: SchemaNodeId,
    value: &'v Value,
) -> Option<&'v [Value]> {
    let items = value.as_sequence();
    if items.is_none() {
        ctx.record(
            MismatchKind::TypeMismatch {
                expected: "array",
                actual: value.kind(),
            },
            schema_node_id,
            value,
        );
    }
    items
}

// =============================================================================
// ArrayValidator
// =============================================================================

/// Validates sequences against a typed prefix followed by a repeating type.
pub struct ArrayValidator<'a, 's, 'e> {
    pub ctx: &'a ValidationContext<'s>,
    pub schema: &'e ArraySchema,
    pub schema_node_id: SchemaNodeId,
}

impl ValueValidator for ArrayValidator<'_, '_, '_> {
    fn validate(&mut self, value: &Value) {
        let Some(items) = expect_sequence(self.ctx, self.schema_node_id, value) else {
            return;
        };

        let min = self.schema.prefix().len();
        if items.len() < min {
            self.ctx.record(
                MismatchKind::ArrayTooShort {
                    min,
                    actual: items.len(),
                },
                self.schema_node_id,
                value,
            );
        }

        for (i, item) in items.iter().enumerate() {
            self.ctx.push_path_index(i);
            validate_child(self.ctx, self.schema.item_at(i), item);
            self.ctx.pop_path();
        }
    }
}

// =============================================================================
// TupleValidator
// =============================================================================

pub struct TupleValidator<'a, 's, 'e> {
    pub ctx: &'a ValidationContext<'s>,
    pub schema: &'e TupleSchema,
    pub schema_node_id: SchemaNodeId,
}

impl ValueValidator for TupleValidator<'_, '_, '_> {
    fn validate(&mut self, value: &Value) {
        let Some(items) = expect_sequence(self.ctx, self.schema_node_id, value) else {
            return;
        };

        if items.len() != self.schema.elements.len() {
            self.ctx.record(
                MismatchKind::TupleLengthMismatch {
                    expected: self.schema.elements.len(),
                    actual: items.len(),
                },
                self.schema_node_id,
                value,
            );
        }

        for (i, (item, &element)) in items.iter().zip(&self.schema.elements).enumerate() {
            self.ctx.push_path_index(i);
            validate_child(self.ctx, element, item);
            self.ctx.pop_path();
        }
    }
}

// =============================================================================
// DictionaryValidator
// =============================================================================

pub struct DictionaryValidator<'a, 's, 'e> {
    pub ctx: &'a ValidationContext<'s>,
    pub schema: &'e DictionarySchema,
    pub schema_node_id: SchemaNodeId,
}

impl ValueValidator for DictionaryValidator<'_, '_, '_> {
    fn validate(&mut self, value: &Value) {
        let Some(map) = value.as_mapping() else {
            self.ctx.record(
                MismatchKind::TypeMismatch {
                    expected: "object",
                    actual: value.kind(),
                },
                self.schema_node_id,
                value,
            );
            return;
        };

        for (key, item) in map {
            self.ctx.push_path_key(key);
            validate_child(self.ctx, self.schema.value, item);
            self.ctx.pop_path();
        }
    }
}
