//! Conversion from a compiled schema back to schema source
//!
//! [`decompile_node`] emits a single SchemaType. References stay references
//! (`["ref", name]`), so the output of a recursive schema mentions labels it does
//! not define. [`SchemaDocument::to_source`] emits a whole document including the
//! `let` block and recompiles to an equivalent graph.

use spartan_value::{Map, Value};

use crate::identifiers;
use crate::schema::{SchemaDocument, SchemaNodeContent, SchemaNodeId};

/// Source form of a single node.
pub fn decompile_node(doc: &SchemaDocument, id: SchemaNodeId) -> Value {
    match &doc.node(id).content {
        SchemaNodeContent::Scalar(scalar) => Value::from(scalar.name()),
        SchemaNodeContent::Any => Value::from(identifiers::ANY),
        SchemaNodeContent::Enum(e) => directive(identifiers::ENUM, e.members.iter().cloned()),
        SchemaNodeContent::Object(object) => Value::Mapping(
            object
                .fields
                .iter()
                .map(|(name, field)| {
                    let schema = decompile_node(doc, field.schema);
                    let schema = if field.optional {
                        directive(identifiers::OPTIONAL, [schema])
                    } else {
                        schema
                    };
                    (name.clone(), schema)
                })
                .collect(),
        ),
        SchemaNodeContent::Array(array) => arguments(doc, identifiers::ARRAY, &array.items),
        SchemaNodeContent::Tuple(tuple) => arguments(doc, identifiers::TUPLE, &tuple.elements),
        SchemaNodeContent::Dictionary(dictionary) => {
            arguments(doc, identifiers::DICTIONARY, &[dictionary.value])
        }
        SchemaNodeContent::OneOf(union) => {
            arguments(doc, identifiers::ONEOF, &union.alternatives)
        }
        SchemaNodeContent::Reference(reference) => directive(
            identifiers::REF,
            [Value::from(reference.label.as_str())],
        ),
    }
}

fn directive(name: &str, args: impl IntoIterator<Item = Value>) -> Value {
    Value::Sequence(
        core::iter::once(Value::from(name))
            .chain(args)
            .collect(),
    )
}

fn arguments(doc: &SchemaDocument, name: &str, ids: &[SchemaNodeId]) -> Value {
    directive(name, ids.iter().map(|&id| decompile_node(doc, id)))
}

impl SchemaDocument {
    /// A complete schema source for this document.
    ///
    /// Carries `spartan: 1`, every `let` label, and `schema`.
    pub fn to_source(&self) -> Value {
        let mut source = Map::new();
        source.insert(identifiers::SPARTAN, Value::Number(identifiers::FORMAT_VERSION));
        let labels: Map = self
            .labels()
            .map(|(name, label)| (name.to_string(), decompile_node(self, label.id())))
            .collect();
        if !labels.is_empty() {
            source.insert(identifiers::LET, Value::Mapping(labels));
        }
        source.insert(identifiers::SCHEMA, self.decompile());
        Value::Mapping(source)
    }
}
