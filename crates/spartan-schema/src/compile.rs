//! Compilation from a schema source value to a [`SchemaDocument`]
//!
//! # Schema source
//!
//! ```json
//! {
//!   "spartan": 1,
//!   "let": { "Tree": { "value": "integer", "children": ["array", ["ref", "Tree"]] } },
//!   "schema": ["ref", "Tree"]
//! }
//! ```
//!
//! # Labels
//!
//! Every `let` label gets a slot in the arena before any label body is compiled.
//! `["ref", name]` compiles to a reference node pointing at that slot, so a body may
//! mention itself or any sibling regardless of declaration order. Once a body is
//! compiled its content is written into the slot.

use spartan_value::{Map, Path, Value};
use tracing::debug;

use crate::error::{CompileError, CompileErrorKind};
use crate::identifiers;
use crate::parse::{
    ParsedSchemaType, check_enum_member, has_unguarded_cycle, parse_field, parse_schema_type,
};
use crate::schema::{
    ArraySchema, DictionarySchema, EnumSchema, ObjectField, ObjectSchema, OneOfSchema,
    ReferenceSchema, SchemaDocument, SchemaNodeContent, SchemaNodeId, TupleSchema,
};

/// Compile a schema source into a schema graph.
///
/// Fails with the first grammar violation found. Use
/// [`check_source`](crate::check_source) to collect every violation at once.
pub fn compile(source: &Value) -> Result<SchemaDocument, CompileError> {
    let root = source.as_mapping().ok_or_else(|| {
        CompileError::new(CompileErrorKind::InvalidRoot(source.kind()), Path::root())
    })?;
    Converter::new().convert(root)
}

struct Converter {
    schema: SchemaDocument,
}

impl Converter {
    fn new() -> Self {
        Self {
            schema: SchemaDocument::new(),
        }
    }

    fn convert(mut self, root: &Map) -> Result<SchemaDocument, CompileError> {
        if let Some(version) = root.get(identifiers::SPARTAN)
            && version.as_f64() != Some(identifiers::FORMAT_VERSION)
        {
            return Err(CompileError::new(
                CompileErrorKind::InvalidVersion,
                Path::root().with_key(identifiers::SPARTAN),
            ));
        }

        if let Some(lets) = root.get(identifiers::LET) {
            let lets = lets.as_mapping().ok_or_else(|| {
                CompileError::new(
                    CompileErrorKind::InvalidLetBlock(lets.kind()),
                    Path::root().with_key(identifiers::LET),
                )
            })?;
            self.convert_lets(lets)?;
        }

        let schema = root.get(identifiers::SCHEMA).ok_or_else(|| {
            CompileError::new(CompileErrorKind::MissingSchema, Path::root())
        })?;
        let root_id = self.convert_node(schema, &Path::root().with_key(identifiers::SCHEMA))?;
        self.schema.set_root(root_id);

        debug!(
            nodes = self.schema.node_count(),
            labels = self.schema.labels().count(),
            "compiled schema"
        );
        Ok(self.schema)
    }

    fn convert_lets(&mut self, lets: &Map) -> Result<(), CompileError> {
        let base = Path::root().with_key(identifiers::LET);

        // Reserve a slot per label so bodies can refer to any of them.
        for name in lets.keys() {
            let slot = self
                .schema
                .create_node(SchemaNodeContent::Any, base.with_key(name));
            self.schema.insert_label(name, slot);
        }

        for name in lets.keys() {
            if has_unguarded_cycle(lets, name) {
                return Err(CompileError::new(
                    CompileErrorKind::UnguardedRecursion(name.to_string()),
                    base.with_key(name),
                ));
            }
        }

        for (name, body) in lets {
            let path = base.with_key(name.as_str());
            let content = self.convert_content(body, &path)?;
            if let Some(slot) = self.schema.label_slot(name) {
                self.schema.node_mut(slot).content = content;
            }
        }
        Ok(())
    }

    /// Compile a fragment into a fresh node
    fn convert_node(&mut self, value: &Value, path: &Path) -> Result<SchemaNodeId, CompileError> {
        let content = self.convert_content(value, path)?;
        Ok(self.schema.create_node(content, path.clone()))
    }

    fn convert_content(
        &mut self,
        value: &Value,
        path: &Path,
    ) -> Result<SchemaNodeContent, CompileError> {
        let parsed = parse_schema_type(value).map_err(|e| e.located(path))?;
        match parsed {
            ParsedSchemaType::Scalar(scalar) => Ok(SchemaNodeContent::Scalar(scalar)),
            ParsedSchemaType::Any => Ok(SchemaNodeContent::Any),
            ParsedSchemaType::Enum(members) => {
                for (i, member) in members.iter().enumerate() {
                    check_enum_member(member)
                        .map_err(|kind| CompileError::new(kind, path.with_index(i + 1)))?;
                }
                Ok(SchemaNodeContent::Enum(EnumSchema {
                    members: members.to_vec(),
                }))
            }
            ParsedSchemaType::Tuple(elements) => Ok(SchemaNodeContent::Tuple(TupleSchema {
                elements: self.convert_arguments(elements, path)?,
            })),
            ParsedSchemaType::Array(items) => Ok(SchemaNodeContent::Array(ArraySchema {
                items: self.convert_arguments(items, path)?,
            })),
            ParsedSchemaType::OneOf(alternatives) => Ok(SchemaNodeContent::OneOf(OneOfSchema {
                alternatives: self.convert_arguments(alternatives, path)?,
            })),
            ParsedSchemaType::Dictionary(value) => {
                Ok(SchemaNodeContent::Dictionary(DictionarySchema {
                    value: self.convert_node(value, &path.with_index(1))?,
                }))
            }
            ParsedSchemaType::Ref(label) => {
                let target = self.schema.label_slot(label).ok_or_else(|| {
                    CompileError::new(
                        CompileErrorKind::UndefinedLabel(label.to_string()),
                        path.with_index(1),
                    )
                })?;
                Ok(SchemaNodeContent::Reference(ReferenceSchema {
                    label: label.to_string(),
                    target,
                }))
            }
            ParsedSchemaType::Object(map) => self.convert_object(map, path),
        }
    }

    /// Directive arguments start at index 1 of the source sequence.
    fn convert_arguments(
        &mut self,
        arguments: &[Value],
        path: &Path,
    ) -> Result<Vec<SchemaNodeId>, CompileError> {
        arguments
            .iter()
            .enumerate()
            .map(|(i, arg)| self.convert_node(arg, &path.with_index(i + 1)))
            .collect()
    }

    fn convert_object(
        &mut self,
        map: &Map,
        path: &Path,
    ) -> Result<SchemaNodeContent, CompileError> {
        let mut object = ObjectSchema::default();
        for (key, field) in map {
            let field_path = path.with_key(key.as_str());
            let (field_type, optional) = parse_field(field).map_err(|e| e.located(&field_path))?;
            let type_path = if optional {
                field_path.with_index(1)
            } else {
                field_path
            };
            let schema = self.convert_node(field_type, &type_path)?;
            object
                .fields
                .insert(key.clone(), ObjectField { schema, optional });
        }
        Ok(SchemaNodeContent::Object(object))
    }
}
