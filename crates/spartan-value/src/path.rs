use core::fmt::Display;
use core::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use thisisplural::Plural;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier regex"));

/// Returns true if `key` can be printed after a `.` without quoting.
pub fn is_identifier(key: &str) -> bool {
    IDENTIFIER.is_match(key)
}

/// Ordered sequence of steps from the root of a value (or schema source) tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Plural)]
#[plural(len, is_empty, iter, into_iter, into_iter_ref, new)]
pub struct Path(pub Vec<PathStep>);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Mapping key
    Key(String),
    /// Sequence index
    Index(usize),
}

impl Path {
    /// Create an empty path representing the root
    pub fn root() -> Self {
        Path(Vec::new())
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, step: impl Into<PathStep>) {
        self.0.push(step.into());
    }

    pub fn pop(&mut self) -> Option<PathStep> {
        self.0.pop()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    /// Returns a copy of this path extended by one step.
    pub fn child(&self, step: impl Into<PathStep>) -> Self {
        let mut path = self.clone();
        path.push(step);
        path
    }

    pub fn with_key(&self, key: impl Into<String>) -> Self {
        self.child(PathStep::Key(key.into()))
    }

    pub fn with_index(&self, index: usize) -> Self {
        self.child(PathStep::Index(index))
    }

    /// Concatenates `other` after this path.
    pub fn join(&self, other: &Path) -> Self {
        let mut path = self.clone();
        path.0.extend(other.0.iter().cloned());
        path
    }
}

impl From<&str> for PathStep {
    fn from(key: &str) -> Self {
        PathStep::Key(key.to_string())
    }
}

impl From<String> for PathStep {
    fn from(key: String) -> Self {
        PathStep::Key(key)
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        PathStep::Index(index)
    }
}

impl<S: Into<PathStep>> FromIterator<S> for Path {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Path(iter.into_iter().map(Into::into).collect())
    }
}

impl Display for PathStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PathStep::Key(key) if is_identifier(key) => write!(f, ".{key}"),
            PathStep::Key(key) => write!(f, "[{key:?}]"),
            PathStep::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "$")?;
        for step in &self.0 {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathParseError {
    #[error("Unexpected character {found:?} at {at}")]
    UnexpectedChar { at: usize, found: char },
    #[error("Unexpected end of path")]
    UnexpectedEnd,
    #[error("Invalid index {0:?}")]
    InvalidIndex(String),
    #[error("Invalid escape sequence at {0}")]
    InvalidEscape(usize),
}

/// Parses the locator syntax produced by `Display`.
///
/// The leading `$` is optional, so `a.b[0]` and `$.a.b[0]` are the same path.
impl FromStr for Path {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = PathParser {
            chars: s.char_indices().collect(),
            pos: 0,
        };
        parser.parse()
    }
}

struct PathParser {
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl PathParser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn next(&mut self) -> Result<(usize, char), PathParseError> {
        let next = self
            .chars
            .get(self.pos)
            .copied()
            .ok_or(PathParseError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(next)
    }

    fn parse(&mut self) -> Result<Path, PathParseError> {
        let mut path = Path::root();
        if self.peek() == Some('$') && !matches!(self.chars.get(1), Some((_, c)) if is_ident_char(*c))
        {
            self.pos += 1;
        } else if self.peek().is_some_and(|c| c != '[' && c != '.') {
            path.push(self.ident()?);
        }
        while let Some(c) = self.peek() {
            match c {
                '.' => {
                    self.pos += 1;
                    path.push(self.ident()?);
                }
                '[' => {
                    self.pos += 1;
                    path.push(self.bracket()?);
                }
                other => {
                    return Err(PathParseError::UnexpectedChar {
                        at: self.chars[self.pos].0,
                        found: other,
                    });
                }
            }
        }
        Ok(path)
    }

    fn ident(&mut self) -> Result<PathStep, PathParseError> {
        let mut key = String::new();
        while let Some(c) = self.peek() {
            if !is_ident_char(c) {
                break;
            }
            key.push(c);
            self.pos += 1;
        }
        if key.is_empty() {
            return match self.chars.get(self.pos) {
                Some(&(at, found)) => Err(PathParseError::UnexpectedChar { at, found }),
                None => Err(PathParseError::UnexpectedEnd),
            };
        }
        Ok(PathStep::Key(key))
    }

    fn bracket(&mut self) -> Result<PathStep, PathParseError> {
        let step = if self.peek() == Some('"') {
            self.pos += 1;
            PathStep::Key(self.quoted()?)
        } else {
            let mut digits = String::new();
            while let Some(c) = self.peek() {
                if c == ']' {
                    break;
                }
                digits.push(c);
                self.pos += 1;
            }
            let index = digits
                .parse()
                .map_err(|_| PathParseError::InvalidIndex(digits.clone()))?;
            PathStep::Index(index)
        };
        match self.next()? {
            (_, ']') => Ok(step),
            (at, found) => Err(PathParseError::UnexpectedChar { at, found }),
        }
    }

    fn quoted(&mut self) -> Result<String, PathParseError> {
        let mut key = String::new();
        loop {
            match self.next()? {
                (_, '"') => return Ok(key),
                (at, '\\') => match self.next()? {
                    (_, '"') => key.push('"'),
                    (_, '\\') => key.push('\\'),
                    (_, 'n') => key.push('\n'),
                    (_, 'r') => key.push('\r'),
                    (_, 't') => key.push('\t'),
                    (_, '\'') => key.push('\''),
                    (_, '0') => key.push('\0'),
                    _ => return Err(PathParseError::InvalidEscape(at)),
                },
                (_, c) => key.push(c),
            }
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
