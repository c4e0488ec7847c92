//! Scalar and enum validators

use spartan_value::Value;

use crate::{EnumSchema, ScalarType, SchemaNodeId};

use super::ValueValidator;
use super::context::ValidationContext;
use super::error::MismatchKind;

// =============================================================================
// ScalarValidator
// =============================================================================

pub struct ScalarValidator<'a, 's> {
    pub ctx: &'a ValidationContext<'s>,
    pub scalar: ScalarType,
    pub schema_node_id: SchemaNodeId,
}

impl ValueValidator for ScalarValidator<'_, '_> {
    fn validate(&mut self, value: &Value) {
        if self.scalar.matches(value) {
            return;
        }
        let kind = match (self.scalar, value) {
            (ScalarType::Integer, Value::Number(n)) => MismatchKind::NotAnInteger(*n),
            _ => MismatchKind::TypeMismatch {
                expected: self.scalar.name(),
                actual: value.kind(),
            },
        };
        self.ctx.record(kind, self.schema_node_id, value);
    }
}

// =============================================================================
// EnumValidator
// =============================================================================

pub struct EnumValidator<'a, 's, 'e> {
    pub ctx: &'a ValidationContext<'s>,
    pub schema: &'e EnumSchema,
    pub schema_node_id: SchemaNodeId,
}

impl ValueValidator for EnumValidator<'_, '_, '_> {
    fn validate(&mut self, value: &Value) {
        if !self.schema.contains(value) {
            self.ctx.record(
                MismatchKind::NotInEnum {
                    members: self.schema.members.clone(),
                },
                self.schema_node_id,
                value,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{ValidateOptions, compile};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use spartan_json::json_to_value;
    use spartan_value::Value;

    #[test]
    fn test_enum_members_compare_by_value() {
        let schema = compile(&json_to_value(&json!({
            "schema": ["enum", 1, "one", true, null]
        })))
        .unwrap();
        for ok in [json!(1), json!(1.0), json!("one"), json!(true), json!(null)] {
            assert!(
                schema
                    .validate(&json_to_value(&ok), &ValidateOptions::default())
                    .is_empty()
            );
        }
        let mismatches = schema.validate(&Value::from("two"), &ValidateOptions::default());
        assert_eq!(
            mismatches
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec!["expected one of 1, \"one\", true, null at $"]
        );
        assert_eq!(mismatches[0].actual, Value::from("two"));
    }

    #[test]
    fn test_float_accepts_integers() {
        let schema = compile(&json_to_value(&json!({"schema": "number"}))).unwrap();
        assert!(
            schema
                .validate(&Value::from(7), &ValidateOptions::default())
                .is_empty()
        );
        assert_eq!(
            schema
                .validate(&Value::Bytes(vec![]), &ValidateOptions::default())[0]
                .message(),
            "expected float, found binary"
        );
    }
}
