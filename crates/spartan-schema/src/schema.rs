//! Compiled schema graph
//!
//! A [`SchemaDocument`] is an arena of [`SchemaNode`]s addressed by [`SchemaNodeId`].
//! Every node is owned by the document. Reference nodes carry the id of the `let`
//! label slot they point at, so cycles are plain id cycles and never ownership cycles.
//!
//! # Node kinds
//!
//! - Scalars: `null`, `boolean`, `integer`, `float` (alias `number`), `string`, `date`, `binary`
//! - `["enum", ...literals]`
//! - Objects: `{ field: T, other: ["optional", T] }`
//! - `["array", ...prefix, rest]`, `["tuple", ...]`, `["dictionary", T]`
//! - `["oneof", ...]`, `"any"`, `["ref", label]`

use chrono::DateTime;
use indexmap::IndexMap;
use spartan_value::{Path, Value};

use crate::error::{AmbiguousPathError, RecursionError};
use crate::identifiers;
use crate::restrict::RestrictOptions;
use crate::validate::{Mismatch, ValidateOptions};

// ============================================================================
// Schema Document
// ============================================================================

/// Schema node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaNodeId(pub usize);

/// A compiled schema.
///
/// Immutable once [`compile`](crate::compile) returns it; every operation takes
/// `&self` and allocates its own per-call state, so a document can be shared
/// freely between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    nodes: Vec<SchemaNode>,
    root: SchemaNodeId,
    /// `let` labels in declaration order, each pointing at its slot
    labels: IndexMap<String, SchemaNodeId>,
}

/// A node in the schema graph
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub content: SchemaNodeContent,
    /// Location of the source fragment this node was compiled from
    pub origin: Path,
}

/// Type definitions
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNodeContent {
    Scalar(ScalarType),
    Enum(EnumSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
    Tuple(TupleSchema),
    Dictionary(DictionarySchema),
    OneOf(OneOfSchema),
    /// Matches every value
    Any,
    /// Points at the slot of a `let` label
    Reference(ReferenceSchema),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Null,
    Boolean,
    Integer,
    /// `float` and `number` are the same type
    Float,
    String,
    Date,
    Binary,
}

impl ScalarType {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            identifiers::NULL => Self::Null,
            identifiers::BOOLEAN => Self::Boolean,
            identifiers::INTEGER => Self::Integer,
            identifiers::FLOAT | identifiers::NUMBER => Self::Float,
            identifiers::STRING => Self::String,
            identifiers::DATE => Self::Date,
            identifiers::BINARY => Self::Binary,
            _ => return None,
        })
    }

    /// Canonical source name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Null => identifiers::NULL,
            Self::Boolean => identifiers::BOOLEAN,
            Self::Integer => identifiers::INTEGER,
            Self::Float => identifiers::FLOAT,
            Self::String => identifiers::STRING,
            Self::Date => identifiers::DATE,
            Self::Binary => identifiers::BINARY,
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Null => value.is_null(),
            Self::Boolean => matches!(value, Value::Bool(_)),
            Self::Integer => value.is_integer(),
            Self::Float => matches!(value, Value::Number(_)),
            Self::String => matches!(value, Value::String(_)),
            Self::Date => matches!(value, Value::Timestamp(_)),
            Self::Binary => matches!(value, Value::Bytes(_)),
        }
    }

    pub fn zero_value(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Boolean => Value::Bool(false),
            Self::Integer | Self::Float => Value::Number(0.0),
            Self::String => Value::String(String::new()),
            Self::Date => Value::Timestamp(DateTime::UNIX_EPOCH),
            Self::Binary => Value::Bytes(Vec::new()),
        }
    }
}

/// Enum type (`["enum", ...]`)
///
/// Members are literal scalars; the first one is the zero value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    pub members: Vec<Value>,
}

impl EnumSchema {
    pub fn contains(&self, value: &Value) -> bool {
        self.members.iter().any(|member| member == value)
    }
}

/// Object type (`{ key: T }`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub fields: IndexMap<String, ObjectField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectField {
    pub schema: SchemaNodeId,
    /// Declared with `["optional", T]`
    pub optional: bool,
}

/// Variable-length sequence with a typed prefix (`["array", ...]`)
///
/// With items `[P1, ..., Pn-1, R]`, element `i < n-1` must match `Pi` and every
/// element from `n-1` onward must match `R`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    /// Never empty
    pub items: Vec<SchemaNodeId>,
}

impl ArraySchema {
    /// Positional item types
    pub fn prefix(&self) -> &[SchemaNodeId] {
        &self.items[..self.items.len().saturating_sub(1)]
    }

    /// Type of every element past the prefix
    pub fn rest(&self) -> SchemaNodeId {
        self.items[self.items.len() - 1]
    }

    /// Item type at `index`
    pub fn item_at(&self, index: usize) -> SchemaNodeId {
        self.prefix().get(index).copied().unwrap_or(self.rest())
    }
}

/// Fixed-length sequence (`["tuple", ...]`)
#[derive(Debug, Clone, PartialEq)]
pub struct TupleSchema {
    pub elements: Vec<SchemaNodeId>,
}

/// String-keyed mapping with a uniform value type (`["dictionary", T]`)
#[derive(Debug, Clone, PartialEq)]
pub struct DictionarySchema {
    pub value: SchemaNodeId,
}

/// Union type (`["oneof", ...]`)
#[derive(Debug, Clone, PartialEq)]
pub struct OneOfSchema {
    pub alternatives: Vec<SchemaNodeId>,
}

/// Reference to a `let` label (`["ref", name]`)
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSchema {
    pub label: String,
    pub target: SchemaNodeId,
}

impl SchemaNodeContent {
    /// Direct children, including the target of a reference.
    pub fn children(&self) -> Vec<SchemaNodeId> {
        match self {
            Self::Scalar(_) | Self::Enum(_) | Self::Any => Vec::new(),
            Self::Object(o) => o.fields.values().map(|f| f.schema).collect(),
            Self::Array(a) => a.items.clone(),
            Self::Tuple(t) => t.elements.clone(),
            Self::Dictionary(d) => vec![d.value],
            Self::OneOf(u) => u.alternatives.clone(),
            Self::Reference(r) => vec![r.target],
        }
    }
}

impl SchemaDocument {
    /// Create an empty document. The root must be set before it is used.
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: SchemaNodeId(0),
            labels: IndexMap::new(),
        }
    }

    /// Get a reference to a node
    pub fn node(&self, id: SchemaNodeId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: SchemaNodeId) -> &mut SchemaNode {
        &mut self.nodes[id.0]
    }

    pub(crate) fn create_node(&mut self, content: SchemaNodeContent, origin: Path) -> SchemaNodeId {
        let id = SchemaNodeId(self.nodes.len());
        self.nodes.push(SchemaNode { content, origin });
        id
    }

    pub(crate) fn set_root(&mut self, root: SchemaNodeId) {
        self.root = root;
    }

    pub(crate) fn insert_label(&mut self, name: impl Into<String>, slot: SchemaNodeId) {
        self.labels.insert(name.into(), slot);
    }

    pub(crate) fn label_slot(&self, name: &str) -> Option<SchemaNodeId> {
        self.labels.get(name).copied()
    }

    pub fn root(&self) -> SchemaNodeId {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Follow reference nodes until a non-reference node is reached.
    ///
    /// Chains of references always end: a label whose body reaches itself through
    /// references alone is rejected at compile time.
    pub fn resolve(&self, id: SchemaNodeId) -> SchemaNodeId {
        let mut current = id;
        for _ in 0..=self.nodes.len() {
            match &self.node(current).content {
                SchemaNodeContent::Reference(r) => current = r.target,
                _ => return current,
            }
        }
        current
    }

    /// Handle of the root type
    pub fn root_ref(&self) -> SchemaRef<'_> {
        self.get(self.root)
    }

    pub fn get(&self, id: SchemaNodeId) -> SchemaRef<'_> {
        SchemaRef { doc: self, id }
    }

    /// Handle of a `let` label
    pub fn label(&self, name: &str) -> Option<SchemaRef<'_>> {
        self.label_slot(name).map(|id| self.get(id))
    }

    /// `let` labels in declaration order
    pub fn labels(&self) -> impl Iterator<Item = (&str, SchemaRef<'_>)> {
        self.labels
            .iter()
            .map(|(name, &id)| (name.as_str(), self.get(id)))
    }

    pub fn validate(&self, value: &Value, options: &ValidateOptions) -> Vec<Mismatch> {
        self.root_ref().validate(value, options)
    }

    pub fn restrict(
        &self,
        value: &Value,
        options: &RestrictOptions,
    ) -> Result<Option<Value>, RecursionError> {
        self.root_ref().restrict(value, options)
    }

    pub fn zero_value(&self) -> Result<Value, RecursionError> {
        self.root_ref().zero_value()
    }

    pub fn decompile(&self) -> Value {
        self.root_ref().decompile()
    }

    pub fn at_path(&self, path: &Path) -> Result<Option<SchemaRef<'_>>, AmbiguousPathError> {
        self.root_ref().at_path(path)
    }

    pub fn is_recursive(&self) -> bool {
        self.root_ref().is_recursive()
    }

    pub fn has_fixed_shape(&self) -> bool {
        self.root_ref().has_fixed_shape()
    }
}

// ============================================================================
// SchemaRef
// ============================================================================

/// A node of a [`SchemaDocument`] together with the document it lives in.
///
/// All per-type operations are available on any node, so the result of a path
/// lookup can be validated or restricted on its own.
#[derive(Debug, Clone, Copy)]
pub struct SchemaRef<'a> {
    doc: &'a SchemaDocument,
    id: SchemaNodeId,
}

impl<'a> SchemaRef<'a> {
    pub fn id(&self) -> SchemaNodeId {
        self.id
    }

    pub fn document(&self) -> &'a SchemaDocument {
        self.doc
    }

    pub fn content(&self) -> &'a SchemaNodeContent {
        &self.doc.node(self.id).content
    }

    /// Schema source location this node was compiled from
    pub fn origin(&self) -> &'a Path {
        &self.doc.node(self.id).origin
    }

    /// The node a chain of references leads to (`self` for other kinds).
    pub fn resolve(&self) -> SchemaRef<'a> {
        self.doc.get(self.doc.resolve(self.id))
    }

    pub fn validate(&self, value: &Value, options: &ValidateOptions) -> Vec<Mismatch> {
        crate::validate::validate_node(self.doc, self.id, value, options)
    }

    pub fn restrict(
        &self,
        value: &Value,
        options: &RestrictOptions,
    ) -> Result<Option<Value>, RecursionError> {
        crate::restrict::restrict_node(self.doc, self.id, value, options)
    }

    pub fn zero_value(&self) -> Result<Value, RecursionError> {
        crate::zero::zero_value_node(self.doc, self.id)
    }

    pub fn decompile(&self) -> Value {
        crate::to_source::decompile_node(self.doc, self.id)
    }

    pub fn is_scalar(&self) -> bool {
        crate::shape::shape_of(self.doc, self.id).is_only_scalar()
    }

    pub fn is_array(&self) -> bool {
        crate::shape::shape_of(self.doc, self.id).is_only_array()
    }

    pub fn is_object(&self) -> bool {
        crate::shape::shape_of(self.doc, self.id).is_only_object()
    }

    pub fn is_recursive(&self) -> bool {
        crate::shape::is_recursive(self.doc, self.id)
    }

    pub fn has_fixed_shape(&self) -> bool {
        crate::shape::has_fixed_shape(self.doc, self.id)
    }

    pub fn child_at(
        &self,
        step: &spartan_value::PathStep,
    ) -> Result<Option<SchemaRef<'a>>, AmbiguousPathError> {
        crate::lookup::child_at(self.doc, self.id, step)
            .map(|child| child.map(|id| self.doc.get(id)))
    }

    pub fn at_path(&self, path: &Path) -> Result<Option<SchemaRef<'a>>, AmbiguousPathError> {
        crate::lookup::at_path(self.doc, self.id, path)
            .map(|found| found.map(|id| self.doc.get(id)))
    }
}

impl PartialEq for SchemaRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}
