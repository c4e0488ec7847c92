//! Default value synthesis
//!
//! Two flavours share one walk:
//! - zero values, defined for every type (`zeroValue`, and `fill_zero` restriction)
//! - empty values, defined only where an empty collection makes sense (`fill_empty`);
//!   arrays always have one, with zero values for a mandatory prefix
//!
//! Both have to unfold the schema without any input to bound them, so entering a
//! label that is already being expanded is a [`RecursionError`]. The set of labels
//! in progress belongs to one top-level call.

use ahash::AHashSet;
use spartan_value::{Map, Value};
use tracing::debug;

use crate::error::RecursionError;
use crate::schema::{SchemaDocument, SchemaNodeContent, SchemaNodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FillMode {
    /// Every type has one
    Zero,
    /// Collections only; scalars have none
    Empty,
}

/// The zero value of a schema node.
pub fn zero_value_node(doc: &SchemaDocument, id: SchemaNodeId) -> Result<Value, RecursionError> {
    Ok(fill_value(doc, id, FillMode::Zero)?.unwrap_or(Value::Null))
}

/// The value `mode` fills in for `id`, or `None` if it has none.
pub(crate) fn fill_value(
    doc: &SchemaDocument,
    id: SchemaNodeId,
    mode: FillMode,
) -> Result<Option<Value>, RecursionError> {
    Synthesizer {
        doc,
        mode,
        expanding: AHashSet::new(),
    }
    .synthesize(id)
}

struct Synthesizer<'a> {
    doc: &'a SchemaDocument,
    mode: FillMode,
    /// Label slots currently being expanded
    expanding: AHashSet<SchemaNodeId>,
}

impl Synthesizer<'_> {
    fn synthesize(&mut self, id: SchemaNodeId) -> Result<Option<Value>, RecursionError> {
        let node = self.doc.node(id);
        match &node.content {
            SchemaNodeContent::Scalar(scalar) => Ok(self.leaf(|| scalar.zero_value())),
            SchemaNodeContent::Enum(e) => Ok(self.leaf(|| e.members[0].clone())),
            SchemaNodeContent::Any => Ok(self.leaf(|| Value::Null)),
            SchemaNodeContent::Dictionary(_) => Ok(Some(Value::empty_mapping())),
            SchemaNodeContent::Object(object) => {
                let mut map = Map::new();
                for (name, field) in &object.fields {
                    if field.optional {
                        continue;
                    }
                    if let Some(value) = self.synthesize(field.schema)? {
                        map.insert(name.clone(), value);
                    }
                }
                Ok(Some(Value::Mapping(map)))
            }
            // Only the mandatory prefix; the repeating part may be empty.
            SchemaNodeContent::Array(array) => {
                let mut items = Vec::with_capacity(array.prefix().len());
                for &element in array.prefix() {
                    match self.synthesize_or_zero(element)? {
                        Some(value) => items.push(value),
                        None => return Ok(None),
                    }
                }
                Ok(Some(Value::Sequence(items)))
            }
            SchemaNodeContent::Tuple(tuple) => self.sequence(&tuple.elements),
            SchemaNodeContent::OneOf(union) => {
                for &alternative in &union.alternatives {
                    if let Some(value) = self.synthesize(alternative)? {
                        return Ok(Some(value));
                    }
                }
                Ok(None)
            }
            SchemaNodeContent::Reference(reference) => {
                if !self.expanding.insert(reference.target) {
                    debug!(label = %reference.label, at = %node.origin, "recursive label has no finite value");
                    return Err(RecursionError {
                        label: reference.label.clone(),
                        schema_path: node.origin.clone(),
                    });
                }
                let value = self.synthesize(reference.target);
                self.expanding.remove(&reference.target);
                value
            }
        }
    }

    /// The value for `id` in the current mode, else its zero value.
    ///
    /// An array exists in every mode, so its prefix falls back to zero values.
    fn synthesize_or_zero(&mut self, id: SchemaNodeId) -> Result<Option<Value>, RecursionError> {
        if let Some(value) = self.synthesize(id)? {
            return Ok(Some(value));
        }
        let mode = core::mem::replace(&mut self.mode, FillMode::Zero);
        let value = self.synthesize(id);
        self.mode = mode;
        value
    }

    fn leaf(&self, zero: impl FnOnce() -> Value) -> Option<Value> {
        match self.mode {
            FillMode::Zero => Some(zero()),
            FillMode::Empty => None,
        }
    }

    /// All elements or nothing.
    fn sequence(&mut self, elements: &[SchemaNodeId]) -> Result<Option<Value>, RecursionError> {
        let mut items = Vec::with_capacity(elements.len());
        for &element in elements {
            match self.synthesize(element)? {
                Some(value) => items.push(value),
                None => return Ok(None),
            }
        }
        Ok(Some(Value::Sequence(items)))
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

    fn zero(json: serde_json::Value) -> Result<Value, RecursionError> {
        schema(json).zero_value()
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(
            zero(json!({"schema": {"s": "string", "n": "number", "o": ["optional", "integer"]}})),
            Ok(json_to_value(&json!({"s": "", "n": 0})))
        );
        assert_eq!(zero(json!({"schema": ["enum", "b", "a"]})), Ok(Value::from("b")));
        assert_eq!(zero(json!({"schema": "any"})), Ok(Value::Null));
        assert_eq!(
            zero(json!({"schema": ["tuple", "boolean", ["dictionary", "string"]]})),
            Ok(json_to_value(&json!([false, {}])))
        );
        assert_eq!(
            zero(json!({"schema": ["oneof", ["array", "string"], "integer"]})),
            Ok(Value::empty_sequence())
        );
        assert_eq!(
            zero(json!({"schema": "binary"})),
            Ok(Value::Bytes(Vec::new()))
        );
    }

    #[test]
    fn test_array_zero_fills_prefix() {
        assert_eq!(
            zero(json!({"schema": ["array", "integer", "string", "boolean"]})),
            Ok(json_to_value(&json!([0, ""])))
        );
    }

    #[test]
    fn test_recursive_label_without_base_case() {
        let doc = schema(json!({
            "let": {"Forever": {"loop": ["ref", "Forever"]}},
            "schema": ["ref", "Forever"]
        }));
        let error = doc.zero_value().unwrap_err();
        assert_eq!(error.label, "Forever");
        assert_eq!(error.schema_path.to_string(), "$.let.Forever.loop");
    }

    #[test]
    fn test_recursive_label_with_base_case() {
        let doc = schema(json!({
            "let": {"Tree": {"value": "integer", "children": ["array", ["ref", "Tree"]]}},
            "schema": {"left": ["ref", "Tree"], "right": ["ref", "Tree"]}
        }));
        assert_eq!(
            doc.zero_value(),
            Ok(json_to_value(&json!({
                "left": {"value": 0, "children": []},
                "right": {"value": 0, "children": []}
            })))
        );
    }

    #[test]
    fn test_empty_values() {
        let doc = schema(json!({
            "schema": {"name": "string", "tags": ["array", "string"], "meta": ["dictionary", "any"]}
        }));
        assert_eq!(
            fill_value(&doc, doc.root(), FillMode::Empty),
            Ok(Some(json_to_value(&json!({"tags": [], "meta": {}}))))
        );
        let doc = schema(json!({"schema": ["tuple", "string", ["array", "null"]]}));
        assert_eq!(fill_value(&doc, doc.root(), FillMode::Empty), Ok(None));
    }

    #[test]
    fn test_empty_array_zero_fills_scalar_prefix() {
        let doc = schema(json!({"schema": ["array", "string", ["dictionary", "null"], "integer"]}));
        assert_eq!(
            fill_value(&doc, doc.root(), FillMode::Empty),
            Ok(Some(json_to_value(&json!(["", {}]))))
        );
        let doc = schema(json!({"schema": {"pairs": ["array", ["tuple", "integer", "string"], "null"]}}));
        assert_eq!(
            fill_value(&doc, doc.root(), FillMode::Empty),
            Ok(Some(json_to_value(&json!({"pairs": [[0, ""]]}))))
        );
    }
}
