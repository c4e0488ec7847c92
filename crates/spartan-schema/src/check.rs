//! Schema source checking
//!
//! Walks a schema source the same way the compiler does but keeps going after a
//! violation, so one pass reports every problem in the document.

use spartan_value::{Map, Path, Value};

use crate::error::{CompileError, CompileErrorKind};
use crate::identifiers;
use crate::parse::{
    ParsedSchemaType, check_enum_member, has_unguarded_cycle, parse_field, parse_schema_type,
};

/// A non-fatal finding of [`check_source`]; displayed as `"{message} at {path}"`.
pub type SourceDiagnostic = CompileError;

/// Collect every grammar violation in a schema source.
///
/// An empty result means [`compile`](crate::compile) will succeed.
pub fn check_source(source: &Value) -> Vec<SourceDiagnostic> {
    let mut checker = Checker::new(true);
    let _ = checker.check_root(source);
    checker.diagnostics
}

/// Returns true if `source` is a well-formed schema source.
///
/// Stops at the first violation.
pub fn is_schema(source: &Value) -> bool {
    let mut checker = Checker::new(false);
    checker.check_root(source).is_ok() && checker.diagnostics.is_empty()
}

/// Signals that a non-exhaustive check has seen enough
struct Halt;

struct Checker<'a> {
    exhaustive: bool,
    lets: Option<&'a Map>,
    diagnostics: Vec<SourceDiagnostic>,
}

impl<'a> Checker<'a> {
    fn new(exhaustive: bool) -> Self {
        Self {
            exhaustive,
            lets: None,
            diagnostics: Vec::new(),
        }
    }

    fn report(&mut self, kind: CompileErrorKind, path: Path) -> Result<(), Halt> {
        self.diagnostics.push(CompileError::new(kind, path));
        if self.exhaustive { Ok(()) } else { Err(Halt) }
    }

    fn check_root(&mut self, source: &'a Value) -> Result<(), Halt> {
        let Some(root) = source.as_mapping() else {
            return self.report(CompileErrorKind::InvalidRoot(source.kind()), Path::root());
        };

        if let Some(version) = root.get(identifiers::SPARTAN)
            && version.as_f64() != Some(identifiers::FORMAT_VERSION)
        {
            self.report(
                CompileErrorKind::InvalidVersion,
                Path::root().with_key(identifiers::SPARTAN),
            )?;
        }

        let base = Path::root().with_key(identifiers::LET);
        match root.get(identifiers::LET) {
            Some(Value::Mapping(lets)) => {
                self.lets = Some(lets);
                for (name, body) in lets {
                    let path = base.with_key(name.as_str());
                    if has_unguarded_cycle(lets, name) {
                        self.report(
                            CompileErrorKind::UnguardedRecursion(name.clone()),
                            path.clone(),
                        )?;
                    }
                    self.check_type(body, &path)?;
                }
            }
            Some(other) => self.report(CompileErrorKind::InvalidLetBlock(other.kind()), base)?,
            None => {}
        }

        match root.get(identifiers::SCHEMA) {
            Some(schema) => self.check_type(schema, &Path::root().with_key(identifiers::SCHEMA)),
            None => self.report(CompileErrorKind::MissingSchema, Path::root()),
        }
    }

    fn check_type(&mut self, value: &Value, path: &Path) -> Result<(), Halt> {
        let parsed = match parse_schema_type(value) {
            Ok(parsed) => parsed,
            Err(e) => {
                let error = e.located(path);
                return self.report(error.kind, error.path);
            }
        };
        match parsed {
            ParsedSchemaType::Scalar(_) | ParsedSchemaType::Any => Ok(()),
            ParsedSchemaType::Enum(members) => {
                for (i, member) in members.iter().enumerate() {
                    if let Err(kind) = check_enum_member(member) {
                        self.report(kind, path.with_index(i + 1))?;
                    }
                }
                Ok(())
            }
            ParsedSchemaType::Tuple(args)
            | ParsedSchemaType::Array(args)
            | ParsedSchemaType::OneOf(args) => {
                for (i, arg) in args.iter().enumerate() {
                    self.check_type(arg, &path.with_index(i + 1))?;
                }
                Ok(())
            }
            ParsedSchemaType::Dictionary(value) => self.check_type(value, &path.with_index(1)),
            ParsedSchemaType::Ref(label) => {
                if self.lets.is_some_and(|lets| lets.contains_key(label)) {
                    Ok(())
                } else {
                    self.report(
                        CompileErrorKind::UndefinedLabel(label.to_string()),
                        path.with_index(1),
                    )
                }
            }
            ParsedSchemaType::Object(map) => {
                for (key, field) in map {
                    let field_path = path.with_key(key.as_str());
                    match parse_field(field) {
                        Ok((inner, true)) => self.check_type(inner, &field_path.with_index(1))?,
                        Ok((inner, false)) => self.check_type(inner, &field_path)?,
                        Err(e) => {
                            let error = e.located(&field_path);
                            self.report(error.kind, error.path)?;
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
