//! Shape analysis over the schema graph
//!
//! Every value a node accepts is a scalar, an array or an object. A node has a
//! fixed shape when, at every reachable location, that category is decided by
//! the schema alone.

use ahash::AHashSet;

use crate::schema::{SchemaDocument, SchemaNodeContent, SchemaNodeId};

/// Shape categories a node may accept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeSet {
    pub scalar: bool,
    pub array: bool,
    pub object: bool,
    /// An `any` node is involved; every category is possible
    pub any: bool,
}

impl ShapeSet {
    const SCALAR: Self = Self {
        scalar: true,
        array: false,
        object: false,
        any: false,
    };
    const ARRAY: Self = Self {
        scalar: false,
        array: true,
        object: false,
        any: false,
    };
    const OBJECT: Self = Self {
        scalar: false,
        array: false,
        object: true,
        any: false,
    };
    const ANY: Self = Self {
        scalar: true,
        array: true,
        object: true,
        any: true,
    };

    fn union(self, other: Self) -> Self {
        Self {
            scalar: self.scalar || other.scalar,
            array: self.array || other.array,
            object: self.object || other.object,
            any: self.any || other.any,
        }
    }

    /// Exactly one category and no `any`
    pub fn is_fixed(&self) -> bool {
        !self.any && usize::from(self.scalar) + usize::from(self.array) + usize::from(self.object) == 1
    }

    pub fn is_only_scalar(&self) -> bool {
        self.is_fixed() && self.scalar
    }

    pub fn is_only_array(&self) -> bool {
        self.is_fixed() && self.array
    }

    pub fn is_only_object(&self) -> bool {
        self.is_fixed() && self.object
    }
}

/// Shape categories of the values `id` accepts at its own location.
pub fn shape_of(doc: &SchemaDocument, id: SchemaNodeId) -> ShapeSet {
    shape_inner(doc, id, &mut AHashSet::new())
}

fn shape_inner(
    doc: &SchemaDocument,
    id: SchemaNodeId,
    visiting: &mut AHashSet<SchemaNodeId>,
) -> ShapeSet {
    match &doc.node(id).content {
        SchemaNodeContent::Scalar(_) | SchemaNodeContent::Enum(_) => ShapeSet::SCALAR,
        SchemaNodeContent::Array(_) | SchemaNodeContent::Tuple(_) => ShapeSet::ARRAY,
        SchemaNodeContent::Object(_) | SchemaNodeContent::Dictionary(_) => ShapeSet::OBJECT,
        SchemaNodeContent::Any => ShapeSet::ANY,
        SchemaNodeContent::OneOf(union) => union
            .alternatives
            .iter()
            .fold(ShapeSet::default(), |shape, &alternative| {
                shape.union(shape_inner(doc, alternative, visiting))
            }),
        SchemaNodeContent::Reference(reference) => {
            // Unreachable for compiled documents, which reject ref/oneof-only cycles.
            if !visiting.insert(reference.target) {
                return ShapeSet::default();
            }
            let shape = shape_inner(doc, reference.target, visiting);
            visiting.remove(&reference.target);
            shape
        }
    }
}

/// Every node reachable from `id`, including `id`, following references.
fn reachable(doc: &SchemaDocument, id: SchemaNodeId) -> Vec<SchemaNodeId> {
    let mut seen = AHashSet::new();
    let mut order = Vec::new();
    let mut pending = vec![id];
    while let Some(current) = pending.pop() {
        if !seen.insert(current) {
            continue;
        }
        order.push(current);
        pending.extend(doc.node(current).content.children());
    }
    order
}

/// True if a reference node is reachable from `id`.
pub fn is_recursive(doc: &SchemaDocument, id: SchemaNodeId) -> bool {
    reachable(doc, id)
        .into_iter()
        .any(|node| matches!(doc.node(node).content, SchemaNodeContent::Reference(_)))
}

/// True if no reachable node is `any` and no reachable `oneof` mixes categories.
pub fn has_fixed_shape(doc: &SchemaDocument, id: SchemaNodeId) -> bool {
    reachable(doc, id).into_iter().all(|node| match &doc.node(node).content {
        SchemaNodeContent::Any => false,
        SchemaNodeContent::OneOf(_) => shape_of(doc, node).is_fixed(),
        _ => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;
    use serde_json::json;
    use spartan_json::json_to_value;

    fn schema(json: serde_json::Value) -> SchemaDocument {
        compile(&json_to_value(&json)).unwrap()
    }

    #[test]
    fn test_category_predicates() {
        let doc = schema(json!({"schema": ["enum", "a"]}));
        assert!(doc.root_ref().is_scalar());
        let doc = schema(json!({"schema": ["tuple", "string"]}));
        assert!(doc.root_ref().is_array());
        assert!(!doc.root_ref().is_object());
        let doc = schema(json!({"schema": ["dictionary", "string"]}));
        assert!(doc.root_ref().is_object());
        let doc = schema(json!({"schema": ["oneof", "string", "integer"]}));
        assert!(doc.root_ref().is_scalar());
        let doc = schema(json!({"schema": ["oneof", "string", ["array", "string"]]}));
        assert!(!doc.root_ref().is_scalar());
        assert!(!doc.root_ref().is_array());
        let doc = schema(json!({"schema": "any"}));
        assert!(!doc.root_ref().is_scalar());
        assert!(!doc.root_ref().is_object());
    }

    #[test]
    fn test_fixed_shape() {
        assert!(schema(json!({"schema": {"a": ["oneof", "string", "null"]}})).has_fixed_shape());
        assert!(
            !schema(json!({"schema": {"a": ["oneof", "string", {"b": "null"}]}})).has_fixed_shape()
        );
        assert!(!schema(json!({"schema": ["array", {"x": "any"}]})).has_fixed_shape());
        assert!(
            schema(json!({"schema": ["oneof", {"b": "null"}, ["dictionary", "string"]]}))
                .has_fixed_shape()
        );
    }

    #[test]
    fn test_fixed_shape_through_labels() {
        let doc = schema(json!({
            "let": {
                "Node": {"next": ["oneof", "null", ["ref", "Node"]]},
                "Loose": {"next": ["oneof", "any", ["ref", "Loose"]]}
            },
            "schema": {"node": ["ref", "Node"]}
        }));
        assert!(!doc.has_fixed_shape());
        assert!(!doc.label("Loose").unwrap().has_fixed_shape());
        let doc = schema(json!({
            "let": {"List": {"next": ["oneof", {"end": "boolean"}, ["ref", "List"]]}},
            "schema": ["ref", "List"]
        }));
        assert!(doc.has_fixed_shape());
    }

    #[test]
    fn test_is_recursive() {
        let doc = schema(json!({
            "let": {"Name": "string", "Tree": {"kids": ["array", ["ref", "Tree"]]}},
            "schema": {"a": ["ref", "Name"], "b": "integer"}
        }));
        assert!(doc.is_recursive());
        assert!(!doc.root_ref().at_path(&"$.b".parse().unwrap()).unwrap().unwrap().is_recursive());
        assert!(doc.label("Tree").unwrap().is_recursive());
        assert!(!doc.label("Name").unwrap().is_recursive());
    }
}
