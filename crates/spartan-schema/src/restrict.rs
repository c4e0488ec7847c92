//! Restriction: fitting a value to a schema
//!
//! `restrict` returns a copy of the input that keeps only what the schema
//! describes. Undeclared object keys and non-matching dictionary entries and
//! array elements are dropped, and scalars may be converted through the
//! [coercion table](crate::coerce). With a fill option, missing or unusable parts
//! are replaced by their zero or empty value instead of making the result absent.
//!
//! `None` means the value cannot be restricted at all.

use spartan_value::{Map, Value};
use tracing::trace;

use crate::coerce::coerce_scalar;
use crate::error::RecursionError;
use crate::schema::{
    ArraySchema, EnumSchema, ObjectSchema, OneOfSchema, ScalarType, SchemaDocument,
    SchemaNodeContent, SchemaNodeId, TupleSchema,
};
use crate::validate::{ValidateOptions, validate_node};
use crate::zero::{FillMode, fill_value};

/// Options for [`restrict`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestrictOptions {
    /// Replace missing or unusable collections with empty ones
    pub fill_empty: bool,
    /// Replace missing or unusable parts with zero values (implies `fill_empty`)
    pub fill_zero: bool,
    /// Convert scalars through the coercion table
    pub coerce: bool,
}

impl RestrictOptions {
    pub fn with_fill_empty(mut self, fill_empty: bool) -> Self {
        self.fill_empty = fill_empty;
        self
    }

    pub fn with_fill_zero(mut self, fill_zero: bool) -> Self {
        self.fill_zero = fill_zero;
        self
    }

    pub fn with_coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    fn fill_mode(&self) -> Option<FillMode> {
        if self.fill_zero {
            Some(FillMode::Zero)
        } else if self.fill_empty {
            Some(FillMode::Empty)
        } else {
            None
        }
    }

    /// The same options without filling
    fn plain(&self) -> Self {
        Self {
            fill_empty: false,
            fill_zero: false,
            coerce: self.coerce,
        }
    }
}

/// Restrict a value to the root of a schema.
pub fn restrict(
    schema: &SchemaDocument,
    value: &Value,
    options: &RestrictOptions,
) -> Result<Option<Value>, RecursionError> {
    restrict_node(schema, schema.root(), value, options)
}

/// Restrict a value to a specific schema node.
///
/// Fails only when a fill option needs the fill value of a label with no finite
/// value.
pub fn restrict_node(
    schema: &SchemaDocument,
    schema_node_id: SchemaNodeId,
    value: &Value,
    options: &RestrictOptions,
) -> Result<Option<Value>, RecursionError> {
    Restrictor { schema, options }.restrict(schema_node_id, value)
}

struct Restrictor<'a> {
    schema: &'a SchemaDocument,
    options: &'a RestrictOptions,
}

impl Restrictor<'_> {
    fn restrict(&self, id: SchemaNodeId, value: &Value) -> Result<Option<Value>, RecursionError> {
        match &self.schema.node(id).content {
            SchemaNodeContent::Any => Ok(Some(value.clone())),
            SchemaNodeContent::Scalar(scalar) => self.restrict_scalar(id, *scalar, value),
            SchemaNodeContent::Enum(e) => self.restrict_enum(id, e, value),
            SchemaNodeContent::Object(object) => self.restrict_object(id, object, value),
            SchemaNodeContent::Array(array) => self.restrict_array(id, array, value),
            SchemaNodeContent::Tuple(tuple) => self.restrict_tuple(id, tuple, value),
            SchemaNodeContent::Dictionary(dictionary) => match value.as_mapping() {
                Some(map) => {
                    let mut result = Map::new();
                    for (key, item) in map {
                        if let Some(item) = self.restrict(dictionary.value, item)? {
                            result.insert(key.clone(), item);
                        }
                    }
                    Ok(Some(Value::Mapping(result)))
                }
                None => self.fill(id),
            },
            SchemaNodeContent::OneOf(union) => self.restrict_oneof(id, union, value),
            SchemaNodeContent::Reference(reference) => self.restrict(reference.target, value),
        }
    }

    /// Fill value for `id` under the current options
    fn fill(&self, id: SchemaNodeId) -> Result<Option<Value>, RecursionError> {
        match self.options.fill_mode() {
            Some(mode) => fill_value(self.schema, id, mode),
            None => Ok(None),
        }
    }

    /// Fill value for an array prefix position, which falls back to the zero
    /// value when filling with empty values
    fn fill_prefix(&self, id: SchemaNodeId) -> Result<Option<Value>, RecursionError> {
        let Some(mode) = self.options.fill_mode() else {
            return Ok(None);
        };
        match fill_value(self.schema, id, mode)? {
            Some(value) => Ok(Some(value)),
            None => fill_value(self.schema, id, FillMode::Zero),
        }
    }

    fn restrict_scalar(
        &self,
        id: SchemaNodeId,
        scalar: ScalarType,
        value: &Value,
    ) -> Result<Option<Value>, RecursionError> {
        if scalar.matches(value) {
            return Ok(Some(value.clone()));
        }
        if self.options.coerce
            && let Some(coerced) = coerce_scalar(scalar, value)
        {
            return Ok(Some(coerced));
        }
        self.fill(id)
    }

    /// Coerces toward each member's own type and accepts the first equal member.
    fn restrict_enum(
        &self,
        id: SchemaNodeId,
        schema: &EnumSchema,
        value: &Value,
    ) -> Result<Option<Value>, RecursionError> {
        if schema.contains(value) {
            return Ok(Some(value.clone()));
        }
        if self.options.coerce {
            for member in &schema.members {
                if let Some(scalar) = member_type(member)
                    && coerce_scalar(scalar, value).as_ref() == Some(member)
                {
                    return Ok(Some(member.clone()));
                }
            }
        }
        self.fill(id)
    }

    fn restrict_object(
        &self,
        id: SchemaNodeId,
        schema: &ObjectSchema,
        value: &Value,
    ) -> Result<Option<Value>, RecursionError> {
        let Some(map) = value.as_mapping() else {
            return self.fill(id);
        };
        let mut result = Map::new();
        for (name, field) in &schema.fields {
            let restricted = match map.get(name) {
                Some(item) => self.restrict(field.schema, item)?,
                None if !field.optional => self.fill(field.schema)?,
                None => None,
            };
            if let Some(item) = restricted {
                result.insert(name.clone(), item);
            }
        }
        Ok(Some(Value::Mapping(result)))
    }

    /// Prefix positions must survive (or be filled) for the array to survive;
    /// elements past the prefix are dropped one by one.
    fn restrict_array(
        &self,
        id: SchemaNodeId,
        schema: &ArraySchema,
        value: &Value,
    ) -> Result<Option<Value>, RecursionError> {
        let Some(items) = value.as_sequence() else {
            return self.fill(id);
        };
        let prefix = schema.prefix();
        let mut result = Vec::with_capacity(items.len().max(prefix.len()));
        for (i, &item_schema) in prefix.iter().enumerate() {
            let restricted = match items.get(i) {
                Some(item) => match self.restrict(item_schema, item)? {
                    Some(item) => Some(item),
                    None => self.fill_prefix(item_schema)?,
                },
                None => self.fill_prefix(item_schema)?,
            };
            match restricted {
                Some(item) => result.push(item),
                None => return self.fill(id),
            }
        }
        for item in items.iter().skip(prefix.len()) {
            if let Some(item) = self.restrict(schema.rest(), item)? {
                result.push(item);
            }
        }
        Ok(Some(Value::Sequence(result)))
    }

    /// Exact length without fill; with fill, extra elements are cut off and
    /// missing ones filled.
    fn restrict_tuple(
        &self,
        id: SchemaNodeId,
        schema: &TupleSchema,
        value: &Value,
    ) -> Result<Option<Value>, RecursionError> {
        let Some(items) = value.as_sequence() else {
            return self.fill(id);
        };
        if items.len() != schema.elements.len() && self.options.fill_mode().is_none() {
            return Ok(None);
        }
        let mut result = Vec::with_capacity(schema.elements.len());
        for (i, &element) in schema.elements.iter().enumerate() {
            let restricted = match items.get(i) {
                Some(item) => match self.restrict(element, item)? {
                    Some(item) => Some(item),
                    None => self.fill(element)?,
                },
                None => self.fill(element)?,
            };
            match restricted {
                Some(item) => result.push(item),
                None => return self.fill(id),
            }
        }
        Ok(Some(Value::Sequence(result)))
    }

    /// Tries, in order: an alternative the value conforms to exactly (no extra
    /// keys), each alternative without coercion, each alternative with coercion.
    /// A candidate is taken only if it conforms to its alternative. Otherwise the
    /// result is the fill value, or without filling the first partial candidate.
    fn restrict_oneof(
        &self,
        id: SchemaNodeId,
        schema: &OneOfSchema,
        value: &Value,
    ) -> Result<Option<Value>, RecursionError> {
        let strict = ValidateOptions::strict();
        let conforms = |alternative: SchemaNodeId, value: &Value| {
            validate_node(self.schema, alternative, value, &strict).is_empty()
        };
        for (i, &alternative) in schema.alternatives.iter().enumerate() {
            if conforms(alternative, value) {
                trace!(alternative = i, "oneof value conforms");
                return self.restrict(alternative, value);
            }
        }

        let plain = self.options.plain();
        let mut passes = vec![RestrictOptions {
            coerce: false,
            ..plain
        }];
        if self.options.coerce {
            passes.push(plain);
        }

        let mut partial = None;
        for options in &passes {
            let restrictor = Restrictor {
                schema: self.schema,
                options,
            };
            for (i, &alternative) in schema.alternatives.iter().enumerate() {
                let Some(restricted) = restrictor.restrict(alternative, value)? else {
                    continue;
                };
                if conforms(alternative, &restricted) {
                    trace!(alternative = i, coerce = options.coerce, "oneof alternative selected");
                    return Ok(Some(restricted));
                }
                if partial.is_none() {
                    partial = Some(restricted);
                }
            }
        }

        if self.options.fill_mode().is_some() {
            return self.fill(id);
        }
        Ok(partial)
    }
}

/// Scalar type an enum member coerces toward
fn member_type(member: &Value) -> Option<ScalarType> {
    match member {
        Value::Null => Some(ScalarType::Null),
        Value::Bool(_) => Some(ScalarType::Boolean),
        Value::Number(_) => Some(ScalarType::Float),
        Value::String(_) => Some(ScalarType::String),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use spartan_json::json_to_value;

    fn schema(json: serde_json::Value) -> SchemaDocument {
        compile(&json_to_value(&json)).unwrap()
    }

    fn run(
        doc: &SchemaDocument,
        value: serde_json::Value,
        options: RestrictOptions,
    ) -> Option<Value> {
        restrict(doc, &json_to_value(&value), &options).unwrap()
    }

    #[test]
    fn test_drops_undeclared_keys() {
        let doc = schema(json!({"schema": {"a": "string", "b": ["optional", "integer"]}}));
        assert_eq!(
            run(&doc, json!({"a": "x", "b": "nope", "c": 3}), RestrictOptions::default()),
            Some(json_to_value(&json!({"a": "x"})))
        );
        assert_eq!(run(&doc, json!("x"), RestrictOptions::default()), None);
    }

    #[test]
    fn test_fill_zero_object() {
        let doc = schema(json!({"schema": {"a": "string", "b": ["optional", "integer"], "c": ["array", "null"]}}));
        let options = RestrictOptions::default().with_fill_zero(true);
        assert_eq!(
            run(&doc, json!(null), options),
            Some(json_to_value(&json!({"a": "", "c": []})))
        );
        assert_eq!(
            run(&doc, json!({"a": 5, "b": 5}), options),
            Some(json_to_value(&json!({"a": "", "b": 5, "c": []})))
        );
    }

    #[test]
    fn test_fill_empty_leaves_scalars_out() {
        let doc = schema(json!({"schema": {"a": "string", "c": ["dictionary", "null"]}}));
        let options = RestrictOptions::default().with_fill_empty(true);
        assert_eq!(
            run(&doc, json!(7), options),
            Some(json_to_value(&json!({"c": {}})))
        );
    }

    #[test]
    fn test_coerce_scalars() {
        let doc = schema(json!({"schema": ["tuple", "integer", "string", "boolean"]}));
        let options = RestrictOptions::default().with_coerce(true);
        assert_eq!(
            run(&doc, json!(["12", 3.5, null]), options),
            Some(json_to_value(&json!([12, "3.5", false])))
        );
        assert_eq!(run(&doc, json!(["12", 3.5, null]), RestrictOptions::default()), None);
    }

    #[test]
    fn test_coerce_enum() {
        let doc = schema(json!({"schema": ["enum", 1, 2, "3"]}));
        let options = RestrictOptions::default().with_coerce(true);
        assert_eq!(run(&doc, json!("2"), options), Some(Value::from(2)));
        assert_eq!(run(&doc, json!(3), options), Some(Value::from("3")));
        assert_eq!(run(&doc, json!("4"), options), None);
        assert_eq!(
            run(&doc, json!("4"), options.with_fill_zero(true)),
            Some(Value::from(1))
        );
    }

    #[test]
    fn test_array_filters_rest() {
        let doc = schema(json!({"schema": ["array", "string", "integer"]}));
        assert_eq!(
            run(&doc, json!(["a", 1, "b", 2.5, 3]), RestrictOptions::default()),
            Some(json_to_value(&json!(["a", 1, 3])))
        );
        assert_eq!(run(&doc, json!([1, 1]), RestrictOptions::default()), None);
        assert_eq!(
            run(&doc, json!([1, 1]), RestrictOptions::default().with_fill_zero(true)),
            Some(json_to_value(&json!(["", 1])))
        );
        assert_eq!(
            run(&doc, json!([]), RestrictOptions::default().with_fill_zero(true)),
            Some(json_to_value(&json!([""])))
        );
    }

    #[test]
    fn test_fill_empty_array_root() {
        let doc = schema(json!({"schema": ["array", "string", "integer"]}));
        let options = RestrictOptions::default().with_fill_empty(true);
        assert_eq!(run(&doc, json!(null), options), Some(json_to_value(&json!([""]))));
        assert_eq!(
            run(&doc, json!([1, 1, "x"]), options),
            Some(json_to_value(&json!(["", 1])))
        );
        let doc = schema(json!({"schema": ["array", "string"]}));
        assert_eq!(run(&doc, json!(null), options), Some(Value::empty_sequence()));
    }

    #[test]
    fn test_tuple_length() {
        let doc = schema(json!({"schema": ["tuple", "string", "integer"]}));
        assert_eq!(run(&doc, json!(["a"]), RestrictOptions::default()), None);
        assert_eq!(
            run(&doc, json!(["a"]), RestrictOptions::default().with_fill_zero(true)),
            Some(json_to_value(&json!(["a", 0])))
        );
        assert_eq!(
            run(&doc, json!(["a", 1, 2]), RestrictOptions::default().with_fill_zero(true)),
            Some(json_to_value(&json!(["a", 1])))
        );
    }

    #[test]
    fn test_dictionary_drops_bad_entries() {
        let doc = schema(json!({"schema": ["dictionary", "boolean"]}));
        assert_eq!(
            run(&doc, json!({"a": true, "b": "x", "c": false}), RestrictOptions::default()),
            Some(json_to_value(&json!({"a": true, "c": false})))
        );
    }

    #[test]
    fn test_oneof_order() {
        let doc = schema(json!({"schema": ["oneof", {"a": "integer"}, "string", "integer"]}));
        // Conforming alternative wins over an earlier one that would also restrict
        assert_eq!(
            run(&doc, json!(5), RestrictOptions::default()),
            Some(Value::from(5))
        );
        assert_eq!(
            run(&doc, json!({"a": 1, "b": 2}), RestrictOptions::default()),
            Some(json_to_value(&json!({"a": 1})))
        );
        assert_eq!(run(&doc, json!(true), RestrictOptions::default()), None);
        assert_eq!(
            run(&doc, json!(true), RestrictOptions::default().with_coerce(true)),
            Some(Value::from("true"))
        );
        // Filling falls back to the first alternative's zero value
        assert_eq!(
            run(&doc, json!(true), RestrictOptions::default().with_fill_zero(true)),
            Some(json_to_value(&json!({"a": 0})))
        );
        assert_eq!(
            run(&doc, json!({"a": "x"}), RestrictOptions::default().with_fill_zero(true)),
            Some(json_to_value(&json!({"a": 0})))
        );
        assert_eq!(
            run(&doc, json!([1]), RestrictOptions::default().with_fill_zero(true)),
            Some(json_to_value(&json!({"a": 0})))
        );
    }

    #[test]
    fn test_oneof_prefers_conforming_candidate() {
        let doc = schema(json!({"schema": {"foo": ["oneof", ["array", "string"], {"bar": "integer"}]}}));
        assert_eq!(
            run(&doc, json!({"foo": {"bar": "3"}}), RestrictOptions::default()),
            Some(json_to_value(&json!({"foo": {}})))
        );
        assert_eq!(
            run(&doc, json!({"foo": {"bar": "3"}}), RestrictOptions::default().with_coerce(true)),
            Some(json_to_value(&json!({"foo": {"bar": 3}})))
        );
    }

    #[test]
    fn test_any_is_identity() {
        let doc = schema(json!({"schema": {"x": "any"}}));
        assert_eq!(
            run(&doc, json!({"x": [1, {"y": null}]}), RestrictOptions::default()),
            Some(json_to_value(&json!({"x": [1, {"y": null}]})))
        );
    }

    #[test]
    fn test_fill_through_recursive_label() {
        let doc = schema(json!({
            "let": {"Forever": {"loop": ["ref", "Forever"]}},
            "schema": ["ref", "Forever"]
        }));
        let value = json_to_value(&json!({"loop": {"loop": {}}}));
        assert_eq!(
            restrict(&doc, &value, &RestrictOptions::default()),
            Ok(Some(value.clone()))
        );
        let error = restrict(&doc, &value, &RestrictOptions::default().with_fill_zero(true))
            .unwrap_err();
        assert_eq!(error.label, "Forever");
    }
}
