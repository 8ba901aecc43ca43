//! Value comparison and pattern matching.
//!
//! [`Matcher`] implements the comparison rules between a resolved record
//! value and a [`ClauseValue`], and applies [`Pattern`]s to records. The
//! rules are checked in this order:
//!
//! 1. A missing source value never matches.
//! 2. A function clause decides on its own.
//! 3. Null only matches null.
//! 4. Two dates match when they denote the same instant.
//! 5. Two arrays of equal length match when they hold the same elements in
//!    any order; arrays of different lengths match when some element of the
//!    source matches some candidate.
//! 6. An array source matches when any of its elements matches.
//! 7. A list clause matches when any of its candidates matches.
//! 8. A record is matched structurally against a pattern.
//! 9. A regex clause is matched against the string form of the source.
//! 10. Anything else is exact equality without coercion.

use crate::clause::{ClauseKey, ClauseValue, Pattern};
use crate::ordering::{sorted_clause_values, sorted_values};
use crate::path::Path;
use crate::traits::{KeyLookup, LastMatch};
use crate::value::Value;

/// Applies comparison rules, resolving regex path segments through a
/// [`KeyLookup`] strategy.
#[derive(Clone, Copy)]
pub struct Matcher<'l> {
    lookup: &'l dyn KeyLookup,
}

impl Default for Matcher<'static> {
    fn default() -> Self {
        Matcher { lookup: &LastMatch }
    }
}

impl<'l> Matcher<'l> {
    /// Creates a matcher using the given key lookup strategy.
    pub fn new(lookup: &'l dyn KeyLookup) -> Self {
        Matcher { lookup }
    }

    /// Checks a resolved value against a comparison value.
    ///
    /// `None` stands for an absent value and never matches.
    pub fn check(&self, src: Option<&Value>, expected: &ClauseValue) -> bool {
        let Some(src) = src else {
            return false;
        };

        match (src, expected) {
            (_, ClauseValue::Function(f)) => f(src),

            (Value::Null, ClauseValue::Null) => true,
            (Value::Null, _) | (_, ClauseValue::Null) => false,

            (Value::Date(a), ClauseValue::Timestamp(b)) => a == b,

            (Value::Array(items), ClauseValue::List(candidates)) => {
                self.check_arrays(items, candidates)
            }
            (Value::Array(items), _) => items.iter().any(|item| self.check(Some(item), expected)),
            (_, ClauseValue::List(candidates)) => candidates
                .iter()
                .any(|candidate| self.check(Some(src), candidate)),

            (Value::Object(_), ClauseValue::Pattern(pattern)) => self.seek(src, pattern),

            (_, ClauseValue::Regex(regex)) => regex.is_match(&src.to_string()),

            _ => strict_equals(src, expected),
        }
    }

    /// Checks whether `node` matches every clause of `pattern`.
    ///
    /// Every clause is evaluated even after one fails, so function clauses
    /// are invoked for each record.
    pub fn seek(&self, node: &Value, pattern: &Pattern) -> bool {
        let mut found = true;
        for clause in pattern.clauses() {
            let hit = match &clause.key {
                ClauseKey::Path(path) => self.check(self.resolve(node, path), &clause.value),
                ClauseKey::Field(name) => {
                    let field = node.get(name);
                    match (field, &clause.value) {
                        (Some(inner @ Value::Object(_)), ClauseValue::Pattern(nested)) => {
                            self.seek(inner, nested)
                        }
                        _ => self.check(field, &clause.value),
                    }
                }
            };
            found &= hit;
        }
        found
    }

    /// Checks `node` against a path filter.
    ///
    /// Without a comparison value, the path only has to resolve to something
    /// (null included).
    pub fn seek_path(&self, node: &Value, path: &Path, expected: Option<&ClauseValue>) -> bool {
        let resolved = self.resolve(node, path);
        match expected {
            Some(expected) => self.check(resolved, expected),
            None => resolved.is_some(),
        }
    }

    /// Resolves `path` against `node` with this matcher's lookup strategy.
    pub fn resolve<'a>(&self, node: &'a Value, path: &Path) -> Option<&'a Value> {
        path.resolve_with(node, self.lookup)
    }

    fn check_arrays(&self, items: &[Value], candidates: &[ClauseValue]) -> bool {
        if items.len() == candidates.len() {
            let items = sorted_values(items);
            let candidates = sorted_clause_values(candidates);
            if items
                .iter()
                .zip(&candidates)
                .all(|(item, candidate)| self.check(Some(*item), candidate))
            {
                return true;
            }
            // Regexes, functions and partial patterns need not sort next to
            // the element they match; search for a one-to-one pairing.
            let mut taken = vec![false; items.len()];
            self.assign(&items, &candidates, &mut taken)
        } else {
            items.iter().any(|item| {
                candidates
                    .iter()
                    .any(|candidate| self.check(Some(item), candidate))
            })
        }
    }

    /// Pairs each remaining candidate with a distinct unused item, backtracking
    /// on dead ends.
    fn assign(&self, items: &[&Value], candidates: &[&ClauseValue], taken: &mut [bool]) -> bool {
        let Some((candidate, rest)) = candidates.split_first() else {
            return true;
        };
        for (i, item) in items.iter().enumerate() {
            if taken[i] || !self.check(Some(*item), candidate) {
                continue;
            }
            taken[i] = true;
            if self.assign(items, rest, taken) {
                return true;
            }
            taken[i] = false;
        }
        false
    }
}

fn strict_equals(src: &Value, expected: &ClauseValue) -> bool {
    match (src, expected) {
        (Value::Bool(a), ClauseValue::Bool(b)) => a == b,
        (Value::Number(a), ClauseValue::Number(b)) => a.same_as(*b),
        (Value::String(a), ClauseValue::String(b)) => a == b,
        _ => false,
    }
}

/// Checks a value against a comparison value with the default lookup.
pub fn check_value(src: Option<&Value>, expected: &ClauseValue) -> bool {
    Matcher::default().check(src, expected)
}

/// Checks a record against a pattern with the default lookup.
pub fn seek(record: &Value, pattern: &Pattern) -> bool {
    Matcher::default().seek(record, pattern)
}
