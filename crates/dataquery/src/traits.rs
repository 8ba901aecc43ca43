//! Key lookup strategies for regex path segments.
//!
//! A regex segment such as `/^file/` does not name a property directly; it
//! selects one among the keys of the current node. The [`KeyLookup`] trait
//! decides which one, and is the seam for swapping that policy.

use regex::Regex;

use crate::value::Value;

/// Chooses the child a regex segment descends into.
///
/// Records expose their keys in insertion order; arrays expose their decimal
/// indexes. Every other value has no keys, so lookups on them yield `None`.
///
/// # Manual Implementation
///
/// ```
/// use dataquery::{KeyLookup, Path, Value};
/// use regex::Regex;
///
/// /// Descends only when exactly one key matches.
/// struct Unique;
///
/// impl KeyLookup for Unique {
///     fn lookup<'a>(&self, node: &'a Value, pattern: &Regex) -> Option<&'a Value> {
///         let record = node.as_object()?;
///         let mut hits = record.iter().filter(|(k, _)| pattern.is_match(k));
///         match (hits.next(), hits.next()) {
///             (Some((_, v)), None) => Some(v),
///             _ => None,
///         }
///     }
/// }
///
/// let path = Path::parse("/^a/").unwrap();
/// let value: Value = serde_json::json!({"ab": 1, "ac": 2}).into();
/// assert_eq!(path.resolve_with(&value, &Unique), None);
/// ```
pub trait KeyLookup {
    /// Returns the child of `node` selected by `pattern`, if any.
    fn lookup<'a>(&self, node: &'a Value, pattern: &Regex) -> Option<&'a Value>;
}

/// Descends into the last key that matches. This is the default strategy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LastMatch;

impl KeyLookup for LastMatch {
    fn lookup<'a>(&self, node: &'a Value, pattern: &Regex) -> Option<&'a Value> {
        matching_children(node, pattern).last()
    }
}

/// Descends into the first key that matches.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FirstMatch;

impl KeyLookup for FirstMatch {
    fn lookup<'a>(&self, node: &'a Value, pattern: &Regex) -> Option<&'a Value> {
        matching_children(node, pattern).next()
    }
}

/// Iterates the children of `node` whose key matches `pattern`, in key order.
fn matching_children<'a: 'p, 'p>(
    node: &'a Value,
    pattern: &'p Regex,
) -> Box<dyn Iterator<Item = &'a Value> + 'p> {
    match node {
        Value::Object(record) => Box::new(
            record
                .iter()
                .filter(move |(key, _)| pattern.is_match(key))
                .map(|(_, value)| value),
        ),
        Value::Array(items) => Box::new(
            items
                .iter()
                .enumerate()
                .filter(move |(index, _)| pattern.is_match(&index.to_string()))
                .map(|(_, value)| value),
        ),
        _ => Box::new(std::iter::empty()),
    }
}
