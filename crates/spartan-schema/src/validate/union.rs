//! Union type validator

use spartan_value::Value;

use crate::{OneOfSchema, SchemaNodeId};

use super::context::ValidationContext;
use super::error::{Mismatch, MismatchKind};
use super::{ValueValidator, validate_child};

/// Validates against each alternative in a forked context.
///
/// The first alternative that produces no mismatches wins. If none does, a single
/// `NoAlternativeMatched` mismatch is recorded carrying every alternative's
/// mismatches, in declaration order.
pub struct OneOfValidator<'a, 's, 'e> {
    pub ctx: &'a ValidationContext<'s>,
    pub schema: &'e OneOfSchema,
    pub schema_node_id: SchemaNodeId,
}

impl ValueValidator for OneOfValidator<'_, '_, '_> {
    fn validate(&mut self, value: &Value) {
        let mut failures: Vec<Vec<Mismatch>> = Vec::with_capacity(self.schema.alternatives.len());
        for &alternative in &self.schema.alternatives {
            let mismatches = trial(self.ctx, alternative, value);
            if mismatches.is_empty() {
                return;
            }
            failures.push(mismatches);
        }
        self.ctx.record_with_alternatives(
            MismatchKind::NoAlternativeMatched {
                count: failures.len(),
            },
            self.schema_node_id,
            value,
            failures,
        );
    }
}

/// Validate in a forked state and return its mismatches.
fn trial(ctx: &ValidationContext<'_>, schema_node_id: SchemaNodeId, value: &Value) -> Vec<Mismatch> {
    let trial_ctx = ValidationContext::with_state(ctx.schema, ctx.options, ctx.fork_state());
    validate_child(&trial_ctx, schema_node_id, value);
    trial_ctx.finish()
}
