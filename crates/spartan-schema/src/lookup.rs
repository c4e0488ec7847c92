//! Path lookup
//!
//! Walks a path step by step through the schema graph. A step through a `oneof`
//! is taken only if its alternatives agree on the shape category and lead to the
//! same child type; otherwise the answer depends on the data, and the lookup
//! fails with [`AmbiguousPathError`].

use spartan_value::{Path, PathStep};

use crate::error::AmbiguousPathError;
use crate::schema::{SchemaDocument, SchemaNodeContent, SchemaNodeId};
use crate::shape::shape_of;
use crate::to_source::decompile_node;

/// Outcome of a single step
enum Step {
    Found(SchemaNodeId),
    Absent,
    Ambiguous,
}

fn step(doc: &SchemaDocument, id: SchemaNodeId, path_step: &PathStep) -> Step {
    let id = doc.resolve(id);
    match (&doc.node(id).content, path_step) {
        (SchemaNodeContent::Any, _) => Step::Ambiguous,
        (SchemaNodeContent::Object(object), PathStep::Key(key)) => object
            .fields
            .get(key.as_str())
            .map_or(Step::Absent, |field| Step::Found(field.schema)),
        (SchemaNodeContent::Dictionary(dictionary), PathStep::Key(_)) => {
            Step::Found(dictionary.value)
        }
        (SchemaNodeContent::Tuple(tuple), PathStep::Index(index)) => tuple
            .elements
            .get(*index)
            .map_or(Step::Absent, |&element| Step::Found(element)),
        (SchemaNodeContent::Array(array), PathStep::Index(index)) => {
            Step::Found(array.item_at(*index))
        }
        (SchemaNodeContent::OneOf(union), _) => {
            if !shape_of(doc, id).is_fixed() {
                return Step::Ambiguous;
            }
            let mut found: Vec<SchemaNodeId> = Vec::new();
            for &alternative in &union.alternatives {
                match step(doc, alternative, path_step) {
                    Step::Found(child) => {
                        if !found.iter().any(|&seen| same_type(doc, seen, child)) {
                            found.push(child);
                        }
                    }
                    Step::Absent => {}
                    Step::Ambiguous => return Step::Ambiguous,
                }
            }
            match found.as_slice() {
                [] => Step::Absent,
                [child] => Step::Found(*child),
                _ => Step::Ambiguous,
            }
        }
        _ => Step::Absent,
    }
}

/// Two nodes describe the same type if they are one node, resolve to one node,
/// or decompile to the same source.
fn same_type(doc: &SchemaDocument, a: SchemaNodeId, b: SchemaNodeId) -> bool {
    a == b || doc.resolve(a) == doc.resolve(b) || decompile_node(doc, a) == decompile_node(doc, b)
}

/// The child type at one step below `id`.
pub fn child_at(
    doc: &SchemaDocument,
    id: SchemaNodeId,
    path_step: &PathStep,
) -> Result<Option<SchemaNodeId>, AmbiguousPathError> {
    match step(doc, id, path_step) {
        Step::Found(child) => Ok(Some(child)),
        Step::Absent => Ok(None),
        Step::Ambiguous => Err(AmbiguousPathError {
            at: Path::root(),
            remaining: Path(vec![path_step.clone()]),
        }),
    }
}

/// The type at `path` below `id`, or `None` if no value of this schema can have
/// anything there.
pub fn at_path(
    doc: &SchemaDocument,
    id: SchemaNodeId,
    path: &Path,
) -> Result<Option<SchemaNodeId>, AmbiguousPathError> {
    let mut current = id;
    for (depth, path_step) in path.iter().enumerate() {
        match step(doc, current, path_step) {
            Step::Found(child) => current = child,
            Step::Absent => return Ok(None),
            Step::Ambiguous => {
                return Err(AmbiguousPathError {
                    at: Path(path.steps()[..depth].to_vec()),
                    remaining: Path(path.steps()[depth..].to_vec()),
                });
            }
        }
    }
    Ok(Some(current))
}
