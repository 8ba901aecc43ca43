//! Default total order over values.
//!
//! Equal-length arrays are compared as multisets: both sides are sorted and
//! then paired element by element. Record values and comparison values are
//! different types, so both are projected onto a common [`SortKey`] and
//! sorted by it. Elements that compare equal in the order end up at the same
//! position on both sides.
//!
//! Type rank: null < bool < number < date < string < array < object < regex
//! < function.

use std::cmp::Ordering;

use crate::clause::{ClauseValue, Pattern};
use crate::value::{Number, Timestamp, Value};

/// Borrowed projection of a value onto the default total order.
#[derive(Debug, Clone)]
pub enum SortKey<'a> {
    Null,
    Bool(bool),
    Number(Number),
    Date(Timestamp),
    String(&'a str),
    Seq(Vec<SortKey<'a>>),
    Map(Vec<(&'a str, SortKey<'a>)>),
    Regex(&'a str),
    Function,
}

impl SortKey<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Null => 0,
            SortKey::Bool(_) => 1,
            SortKey::Number(_) => 2,
            SortKey::Date(_) => 3,
            SortKey::String(_) => 4,
            SortKey::Seq(_) => 5,
            SortKey::Map(_) => 6,
            SortKey::Regex(_) => 7,
            SortKey::Function => 8,
        }
    }
}

impl Ord for SortKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(*b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::String(a), SortKey::String(b)) => a.cmp(b),
            (SortKey::Regex(a), SortKey::Regex(b)) => a.cmp(b),
            (SortKey::Seq(a), SortKey::Seq(b)) => a.cmp(b),
            (SortKey::Map(a), SortKey::Map(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey<'_> {}

/// Projects a record value onto the default order.
pub fn value_key(value: &Value) -> SortKey<'_> {
    match value {
        Value::Null => SortKey::Null,
        Value::Bool(b) => SortKey::Bool(*b),
        Value::Number(n) => SortKey::Number(*n),
        Value::Date(t) => SortKey::Date(*t),
        Value::String(s) => SortKey::String(s),
        Value::Array(items) => SortKey::Seq(items.iter().map(value_key).collect()),
        Value::Object(record) => SortKey::Map(
            record
                .iter()
                .map(|(k, v)| (k.as_str(), value_key(v)))
                .collect(),
        ),
        Value::Regex(r) => SortKey::Regex(r.as_str()),
    }
}

/// Projects a comparison value onto the default order.
pub fn clause_key(value: &ClauseValue) -> SortKey<'_> {
    match value {
        ClauseValue::Null => SortKey::Null,
        ClauseValue::Bool(b) => SortKey::Bool(*b),
        ClauseValue::Number(n) => SortKey::Number(*n),
        ClauseValue::Timestamp(t) => SortKey::Date(*t),
        ClauseValue::String(s) => SortKey::String(s),
        ClauseValue::List(items) => SortKey::Seq(items.iter().map(clause_key).collect()),
        ClauseValue::Pattern(pattern) => pattern_key(pattern),
        ClauseValue::Regex(r) => SortKey::Regex(r.as_str()),
        ClauseValue::Function(_) => SortKey::Function,
    }
}

fn pattern_key(pattern: &Pattern) -> SortKey<'_> {
    SortKey::Map(
        pattern
            .clauses()
            .iter()
            .map(|clause| (clause.key.as_str(), clause_key(&clause.value)))
            .collect(),
    )
}

/// Compares two record values in the default order.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    value_key(a).cmp(&value_key(b))
}

/// Returns record values sorted in the default order, leaving the input as is.
pub fn sorted_values(values: &[Value]) -> Vec<&Value> {
    let mut keyed: Vec<(SortKey<'_>, &Value)> = values.iter().map(|v| (value_key(v), v)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, v)| v).collect()
}

/// Returns comparison values sorted in the default order.
pub fn sorted_clause_values(values: &[ClauseValue]) -> Vec<&ClauseValue> {
    let mut keyed: Vec<(SortKey<'_>, &ClauseValue)> =
        values.iter().map(|v| (clause_key(v), v)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, v)| v).collect()
}
