//! Shallow classification of schema source fragments
//!
//! Both the compiler and the source checker look at a fragment through
//! [`parse_schema_type`], so they agree on the grammar. Classification does not
//! descend: the argument types of a directive are returned unparsed.

use ahash::AHashSet;
use spartan_value::{Map, Path, Value};

use crate::error::{CompileError, CompileErrorKind};
use crate::identifiers;
use crate::schema::ScalarType;

/// A schema source fragment, classified by its outermost form
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ParsedSchemaType<'a> {
    Scalar(ScalarType),
    Any,
    /// Members, not yet checked to be literals
    Enum(&'a [Value]),
    Tuple(&'a [Value]),
    Array(&'a [Value]),
    Dictionary(&'a Value),
    OneOf(&'a [Value]),
    Ref(&'a str),
    Object(&'a Map),
}

/// Grammar violation located relative to the fragment that was classified
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GrammarError {
    pub kind: CompileErrorKind,
    pub at: Path,
}

impl GrammarError {
    fn here(kind: CompileErrorKind) -> Self {
        Self {
            kind,
            at: Path::root(),
        }
    }

    fn at_index(kind: CompileErrorKind, index: usize) -> Self {
        Self {
            kind,
            at: Path::root().with_index(index),
        }
    }

    /// Anchor the error below the fragment's own location.
    pub fn located(self, base: &Path) -> CompileError {
        CompileError::new(self.kind, base.join(&self.at))
    }
}

pub(crate) fn parse_schema_type(value: &Value) -> Result<ParsedSchemaType<'_>, GrammarError> {
    match value {
        Value::Null => Ok(ParsedSchemaType::Scalar(ScalarType::Null)),
        Value::String(name) if name == identifiers::ANY => Ok(ParsedSchemaType::Any),
        Value::String(name) => ScalarType::from_name(name)
            .map(ParsedSchemaType::Scalar)
            .ok_or_else(|| GrammarError::here(CompileErrorKind::UnknownType(name.clone()))),
        Value::Sequence(items) => parse_directive(items),
        Value::Mapping(map) => Ok(ParsedSchemaType::Object(map)),
        other => Err(GrammarError::here(CompileErrorKind::InvalidShape(
            other.kind(),
        ))),
    }
}

fn parse_directive(items: &[Value]) -> Result<ParsedSchemaType<'_>, GrammarError> {
    let Some((head, args)) = items.split_first() else {
        return Err(GrammarError::here(CompileErrorKind::EmptyDirective));
    };
    let Value::String(directive) = head else {
        return Err(GrammarError::at_index(
            CompileErrorKind::InvalidDirective(head.kind()),
            0,
        ));
    };
    match directive.as_str() {
        identifiers::ENUM => {
            require_some(identifiers::ENUM, "at least one member", args)?;
            Ok(ParsedSchemaType::Enum(args))
        }
        identifiers::TUPLE => {
            require_some(identifiers::TUPLE, "at least one type", args)?;
            Ok(ParsedSchemaType::Tuple(args))
        }
        identifiers::ARRAY => {
            require_some(identifiers::ARRAY, "at least one type", args)?;
            Ok(ParsedSchemaType::Array(args))
        }
        identifiers::ONEOF => {
            require_some(identifiers::ONEOF, "at least one type", args)?;
            Ok(ParsedSchemaType::OneOf(args))
        }
        identifiers::DICTIONARY => match args {
            [value] => Ok(ParsedSchemaType::Dictionary(value)),
            _ => Err(arity(identifiers::DICTIONARY, "exactly one type", args)),
        },
        identifiers::REF => match args {
            [Value::String(label)] => Ok(ParsedSchemaType::Ref(label)),
            [other] => Err(GrammarError::at_index(
                CompileErrorKind::InvalidReference(other.kind()),
                1,
            )),
            _ => Err(arity(identifiers::REF, "exactly one label", args)),
        },
        identifiers::OPTIONAL => Err(GrammarError::here(CompileErrorKind::MisplacedOptional)),
        other => Err(GrammarError::at_index(
            CompileErrorKind::UnknownDirective(other.to_string()),
            0,
        )),
    }
}

fn require_some(
    directive: &'static str,
    expected: &'static str,
    args: &[Value],
) -> Result<(), GrammarError> {
    if args.is_empty() {
        Err(arity(directive, expected, args))
    } else {
        Ok(())
    }
}

fn arity(directive: &'static str, expected: &'static str, args: &[Value]) -> GrammarError {
    GrammarError::here(CompileErrorKind::InvalidArity {
        directive,
        expected,
        found: args.len(),
    })
}

/// Unwrap an object field value, returning its type and whether it is optional.
///
/// On success the second element of an `["optional", T]` pair is returned; its
/// location relative to the field is `[1]`.
pub(crate) fn parse_field(value: &Value) -> Result<(&Value, bool), GrammarError> {
    match value {
        Value::Sequence(items)
            if items.first().and_then(Value::as_str) == Some(identifiers::OPTIONAL) =>
        {
            match &items[1..] {
                [inner] => Ok((inner, true)),
                args => Err(arity(identifiers::OPTIONAL, "exactly one type", args)),
            }
        }
        other => Ok((other, false)),
    }
}

/// Enum members must be literal scalars.
pub(crate) fn check_enum_member(member: &Value) -> Result<(), CompileErrorKind> {
    match member {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(()),
        other => Err(CompileErrorKind::InvalidEnumMember(other.kind())),
    }
}

/// Returns true if `label` reaches itself through `ref` and `oneof` alone.
///
/// Such a label never consumes any input while being expanded, so validating
/// against it would not terminate. References to undefined labels and malformed
/// fragments are ignored here; they are reported on their own.
pub(crate) fn has_unguarded_cycle(lets: &Map, label: &str) -> bool {
    let mut visited = AHashSet::new();
    let mut pending: Vec<&Value> = lets.get(label).into_iter().collect();
    while let Some(fragment) = pending.pop() {
        match parse_schema_type(fragment) {
            Ok(ParsedSchemaType::Ref(name)) => {
                if name == label {
                    return true;
                }
                if visited.insert(name)
                    && let Some(body) = lets.get(name)
                {
                    pending.push(body);
                }
            }
            Ok(ParsedSchemaType::OneOf(alternatives)) => pending.extend(alternatives),
            _ => {}
        }
    }
    false
}
