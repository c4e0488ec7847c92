//! Reference validator

use spartan_value::Value;

use crate::ReferenceSchema;

use super::context::ValidationContext;
use super::{ValueValidator, validate_child};

/// Validates against the label slot a reference points at.
///
/// Mismatches inside the label carry the label's own schema paths
/// (`$.let.Name...`), not the path of the reference.
pub struct ReferenceValidator<'a, 's, 'e> {
    pub ctx: &'a ValidationContext<'s>,
    pub reference: &'e ReferenceSchema,
}

impl ValueValidator for ReferenceValidator<'_, '_, '_> {
    fn validate(&mut self, value: &Value) {
        validate_child(self.ctx, self.reference.target, value);
    }
}
