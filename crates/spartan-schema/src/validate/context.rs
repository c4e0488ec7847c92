//! Validation context
//!
//! `ValidationContext` manages state during validation:
//! - Schema and options
//! - Current data path for error reporting
//! - Accumulated mismatches

use std::cell::RefCell;

use spartan_value::{Path, Value};

use crate::{SchemaDocument, SchemaNodeId};

use super::ValidateOptions;
use super::error::{Mismatch, MismatchKind};

// =============================================================================
// ValidationState (internal mutable state)
// =============================================================================

/// Internal mutable state during validation.
#[derive(Debug, Default)]
pub struct ValidationState {
    /// Current path in the value (for error reporting)
    pub path: Path,
    pub mismatches: Vec<Mismatch>,
}

impl ValidationState {
    pub fn new(path: Path) -> Self {
        Self {
            path,
            mismatches: Vec::new(),
        }
    }

    pub fn record(&mut self, mismatch: Mismatch) {
        self.mismatches.push(mismatch);
    }

    /// Clone for trial validation: same path, no mismatches.
    pub fn fork(&self) -> Self {
        Self::new(self.path.clone())
    }
}

// =============================================================================
// ValidationContext
// =============================================================================

/// Validation context combining the schema, options and mutable state.
///
/// State lives in a `RefCell` so validators can share one context through `&`.
pub struct ValidationContext<'a> {
    pub schema: &'a SchemaDocument,
    pub options: &'a ValidateOptions,
    pub state: RefCell<ValidationState>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(schema: &'a SchemaDocument, options: &'a ValidateOptions) -> Self {
        Self::with_state(
            schema,
            options,
            ValidationState::new(options.path_prefix.clone()),
        )
    }

    pub fn with_state(
        schema: &'a SchemaDocument,
        options: &'a ValidateOptions,
        state: ValidationState,
    ) -> Self {
        Self {
            schema,
            options,
            state: RefCell::new(state),
        }
    }

    /// Record a mismatch at the current path.
    pub fn record(&self, kind: MismatchKind, schema_node_id: SchemaNodeId, actual: &Value) {
        self.record_with_alternatives(kind, schema_node_id, actual, Vec::new());
    }

    pub fn record_with_alternatives(
        &self,
        kind: MismatchKind,
        schema_node_id: SchemaNodeId,
        actual: &Value,
        alternatives: Vec<Vec<Mismatch>>,
    ) {
        let mismatch = Mismatch {
            kind,
            schema_node_id,
            actual: actual.clone(),
            data_path: self.path(),
            schema_path: self.schema.node(schema_node_id).origin.clone(),
            alternatives,
        };
        self.state.borrow_mut().record(mismatch);
    }

    /// Get a clone of the current path.
    pub fn path(&self) -> Path {
        self.state.borrow().path.clone()
    }

    pub fn push_path_key(&self, key: &str) {
        self.state.borrow_mut().path.push(key);
    }

    pub fn push_path_index(&self, index: usize) {
        self.state.borrow_mut().path.push(index);
    }

    pub fn pop_path(&self) {
        self.state.borrow_mut().path.pop();
    }

    /// Fork for trial validation (returns forked state).
    pub fn fork_state(&self) -> ValidationState {
        self.state.borrow().fork()
    }

    /// Consume context and produce the mismatches.
    pub fn finish(self) -> Vec<Mismatch> {
        self.state.into_inner().mismatches
    }
}
