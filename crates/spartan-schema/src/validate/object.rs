//! Object type validator

use spartan_value::Value;

use crate::{ObjectSchema, SchemaNodeId};

use super::context::ValidationContext;
use super::error::MismatchKind;
use super::{ValueValidator, validate_child};

/// Validates mappings against declared fields.
///
/// A missing required field is reported at the object's own data path, with the
/// field's type as the failing schema node.
pub struct ObjectValidator<'a, 's, 'e> {
    pub ctx: &'a ValidationContext<'s>,
    pub schema: &'e ObjectSchema,
    pub schema_node_id: SchemaNodeId,
}

impl ValueValidator for ObjectValidator<'_, '_, '_> {
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

        for (name, field) in &self.schema.fields {
            match map.get(name) {
                Some(item) => {
                    self.ctx.push_path_key(name);
                    validate_child(self.ctx, field.schema, item);
                    self.ctx.pop_path();
                }
                None if !field.optional => self.ctx.record(
                    MismatchKind::MissingRequiredField {
                        field: name.clone(),
                    },
                    field.schema,
                    value,
                ),
                None => {}
            }
        }

        if !self.ctx.options.allow_extra_fields {
            for (key, item) in map {
                if !self.schema.fields.contains_key(key.as_str()) {
                    self.ctx.push_path_key(key);
                    self.ctx.record(
                        MismatchKind::UnknownField { field: key.clone() },
                        self.schema_node_id,
                        item,
                    );
                    self.ctx.pop_path();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{ValidateOptions, compile};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use spartan_json::json_to_value;

    #[test]
    fn test_optional_and_required_fields() {
        let schema = compile(&json_to_value(&json!({
            "schema": {"id": "integer", "nickname": ["optional", "string"]}
        })))
        .unwrap();
        let check = |value: serde_json::Value| {
            schema
                .validate(&json_to_value(&value), &ValidateOptions::default())
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        };
        assert_eq!(check(json!({"id": 1})), Vec::<String>::new());
        assert_eq!(check(json!({"id": 1, "nickname": "x"})), Vec::<String>::new());
        assert_eq!(
            check(json!({"id": 1, "nickname": null})),
            vec!["expected string, found null at $.nickname"]
        );
        assert_eq!(
            check(json!({"nickname": "x"})),
            vec!["missing required field `id` at $"]
        );
    }

    #[test]
    fn test_extra_fields() {
        let schema = compile(&json_to_value(&json!({"schema": {"a": "string"}}))).unwrap();
        let value = json_to_value(&json!({"a": "x", "b": 1, "c": 2}));
        assert!(
            schema
                .validate(&value, &ValidateOptions::default())
                .is_empty()
        );
        let mismatches = schema.validate(&value, &ValidateOptions::strict());
        assert_eq!(
            mismatches
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec!["unknown field `b` at $.b", "unknown field `c` at $.c"]
        );
        assert_eq!(mismatches[0].schema_path.to_string(), "$.schema");
    }

    #[test]
    fn test_missing_field_schema_path() {
        let schema =
            compile(&json_to_value(&json!({"schema": {"inner": {"deep": "boolean"}}}))).unwrap();
        let mismatches = schema.validate(
            &json_to_value(&json!({"inner": {}})),
            &ValidateOptions::default(),
        );
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].data_path.to_string(), "$.inner");
        assert_eq!(mismatches[0].schema_path.to_string(), "$.schema.inner.deep");
    }
}
