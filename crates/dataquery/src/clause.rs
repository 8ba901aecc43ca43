//! Comparison values and pattern clauses.
//!
//! A [`ClauseValue`] is the filter side of a comparison: what a resolved
//! record value is checked against. A [`Pattern`] is an ordered list of
//! [`Clause`]s, each pairing a key (a property name or a dotted path) with a
//! comparison value. Nested patterns mirror the shape of the records they
//! match.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::Result;
use crate::path::Path;
use crate::value::{Number, Timestamp, Value};

/// Caller-supplied test on a single resolved value.
pub type ValueFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Owned comparison value stored in a clause or passed alongside a path.
///
/// Unlike [`Value`], which is record data, `ClauseValue` can hold functions
/// and nested patterns, and its `List` variant means "any of these".
#[derive(Clone)]
pub enum ClauseValue {
    /// Matches only null.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// String value.
    String(String),
    /// Timestamp value.
    Timestamp(Timestamp),
    /// Compiled regular expression, matched against the value's string form.
    Regex(Regex),
    /// Candidate list (logical OR), or a set when compared with an array.
    List(Vec<ClauseValue>),
    /// Nested pattern for structured values.
    Pattern(Pattern),
    /// Caller-supplied test.
    Function(ValueFn),
}

impl ClauseValue {
    /// Wraps a closure as a function clause value.
    ///
    /// # Example
    ///
    /// ```
    /// use dataquery::{ClauseValue, Value};
    ///
    /// let is_array = ClauseValue::function(|v: &Value| v.is_array());
    /// ```
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        ClauseValue::Function(Arc::new(f))
    }

    /// Builds a list of candidate values.
    pub fn any_of<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ClauseValue>,
    {
        ClauseValue::List(values.into_iter().map(Into::into).collect())
    }

    /// Converts record-shaped data into a comparison value.
    ///
    /// Records become patterns, so keys containing `.` are parsed as paths
    /// and may fail on invalid regex segments. Arrays become candidate lists.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(match value {
            Value::Null => ClauseValue::Null,
            Value::Bool(b) => ClauseValue::Bool(b),
            Value::Number(n) => ClauseValue::Number(n),
            Value::String(s) => ClauseValue::String(s),
            Value::Date(t) => ClauseValue::Timestamp(t),
            Value::Regex(r) => ClauseValue::Regex(r),
            Value::Array(items) => ClauseValue::List(
                items
                    .into_iter()
                    .map(ClauseValue::from_value)
                    .collect::<Result<_>>()?,
            ),
            Value::Object(record) => {
                let mut pattern = Pattern::new();
                for (key, value) in record {
                    pattern = pattern.and(&key, ClauseValue::from_value(value)?)?;
                }
                ClauseValue::Pattern(pattern)
            }
        })
    }

    /// Returns the name of this value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            ClauseValue::Null => "null",
            ClauseValue::Bool(_) => "boolean",
            ClauseValue::Number(_) => "number",
            ClauseValue::String(_) => "string",
            ClauseValue::Timestamp(_) => "date",
            ClauseValue::Regex(_) => "regex",
            ClauseValue::List(_) => "list",
            ClauseValue::Pattern(_) => "pattern",
            ClauseValue::Function(_) => "function",
        }
    }
}

impl fmt::Debug for ClauseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClauseValue::Null => f.write_str("Null"),
            ClauseValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            ClauseValue::Number(n) => f.debug_tuple("Number").field(n).finish(),
            ClauseValue::String(s) => f.debug_tuple("String").field(s).finish(),
            ClauseValue::Timestamp(t) => f.debug_tuple("Timestamp").field(t).finish(),
            ClauseValue::Regex(r) => f.debug_tuple("Regex").field(r).finish(),
            ClauseValue::List(items) => f.debug_tuple("List").field(items).finish(),
            ClauseValue::Pattern(p) => f.debug_tuple("Pattern").field(p).finish(),
            ClauseValue::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// The key side of a clause.
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseKey {
    /// A single property of the current node. Enables structural recursion.
    Field(String),
    /// A dotted path resolved relative to the current node.
    Path(Path),
}

impl ClauseKey {
    /// Parses a pattern key: keys containing `.` are paths, others are fields.
    pub fn parse(key: &str) -> Result<Self> {
        if key.contains('.') {
            Ok(ClauseKey::Path(Path::parse(key)?))
        } else {
            Ok(ClauseKey::Field(key.to_string()))
        }
    }

    /// Returns the key as written.
    pub fn as_str(&self) -> &str {
        match self {
            ClauseKey::Field(name) => name,
            ClauseKey::Path(path) => path.as_str(),
        }
    }
}

/// A single entry of a pattern: a key and the value it must match.
#[derive(Debug, Clone)]
pub struct Clause {
    /// Where to look in the current node.
    pub key: ClauseKey,
    /// What the value found there must match.
    pub value: ClauseValue,
}

impl Clause {
    /// Creates a new clause, parsing dotted keys as paths.
    pub fn new(key: &str, value: impl Into<ClauseValue>) -> Result<Self> {
        Ok(Clause {
            key: ClauseKey::parse(key)?,
            value: value.into(),
        })
    }
}

/// A structural filter mirroring the shape of the records it matches.
///
/// A record matches a pattern when every clause matches. All clauses are
/// evaluated for every record, so function values see every candidate.
///
/// # Example
///
/// ```
/// use dataquery::{ClauseValue, Pattern};
///
/// // { deep: { obj: { veryDeep: ["zk", "kz"] } }, "meta.kind": "doc" }
/// let pattern = Pattern::new()
///     .field(
///         "deep",
///         Pattern::new().field(
///             "obj",
///             Pattern::new().field("veryDeep", ClauseValue::any_of(["zk", "kz"])),
///         ),
///     )
///     .and("meta.kind", "doc")
///     .unwrap();
///
/// assert_eq!(pattern.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    clauses: Vec<Clause>,
}

impl Pattern {
    /// Creates an empty pattern, which matches every record.
    pub fn new() -> Self {
        Pattern::default()
    }

    /// Adds a clause, treating a key that contains `.` as a dotted path.
    ///
    /// Returns an error if the key holds an invalid regex segment.
    pub fn and(mut self, key: &str, value: impl Into<ClauseValue>) -> Result<Self> {
        self.clauses.push(Clause::new(key, value)?);
        Ok(self)
    }

    /// Adds a clause on a single property, taken literally even if it
    /// contains dots.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<ClauseValue>) -> Self {
        self.clauses.push(Clause {
            key: ClauseKey::Field(name.into()),
            value: value.into(),
        });
        self
    }

    /// Adds a clause on an already parsed path.
    pub fn path(mut self, path: Path, value: impl Into<ClauseValue>) -> Self {
        self.clauses.push(Clause {
            key: ClauseKey::Path(path),
            value: value.into(),
        });
        self
    }

    /// Returns the clauses in insertion order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns the number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns `true` if this pattern has no clauses (matches everything).
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

// Conversions from common types to ClauseValue

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::String(s)
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::String(s.to_string())
    }
}

impl From<Number> for ClauseValue {
    fn from(n: Number) -> Self {
        ClauseValue::Number(n)
    }
}

impl From<Timestamp> for ClauseValue {
    fn from(t: Timestamp) -> Self {
        ClauseValue::Timestamp(t)
    }
}

impl From<bool> for ClauseValue {
    fn from(b: bool) -> Self {
        ClauseValue::Bool(b)
    }
}

impl From<Regex> for ClauseValue {
    fn from(r: Regex) -> Self {
        ClauseValue::Regex(r)
    }
}

impl From<Pattern> for ClauseValue {
    fn from(p: Pattern) -> Self {
        ClauseValue::Pattern(p)
    }
}

impl<T: Into<ClauseValue>> From<Vec<T>> for ClauseValue {
    fn from(items: Vec<T>) -> Self {
        ClauseValue::any_of(items)
    }
}

// Numeric type conversions
impl From<i32> for ClauseValue {
    fn from(n: i32) -> Self {
        ClauseValue::Number(Number::from(n))
    }
}

impl From<i64> for ClauseValue {
    fn from(n: i64) -> Self {
        ClauseValue::Number(Number::from(n))
    }
}

impl From<u32> for ClauseValue {
    fn from(n: u32) -> Self {
        ClauseValue::Number(Number::from(n))
    }
}

impl From<u64> for ClauseValue {
    fn from(n: u64) -> Self {
        ClauseValue::Number(Number::from(n))
    }
}

impl From<f64> for ClauseValue {
    fn from(n: f64) -> Self {
        ClauseValue::Number(Number::from(n))
    }
}

impl From<usize> for ClauseValue {
    fn from(n: usize) -> Self {
        ClauseValue::Number(Number::from(n))
    }
}
