//! Query builder and executor.
//!
//! [`Query`] bundles a [`Filter`], an optional comparison value and a key
//! lookup strategy, and runs them against a [`Collection`]. The free function
//! [`query`] is the one-shot form.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::clause::{ClauseValue, Pattern};
use crate::collection::{Collection, Entry};
use crate::error::Result;
use crate::filter::Filter;
use crate::matcher::Matcher;
use crate::traits::{KeyLookup, LastMatch};
use crate::value::Value;

/// A reusable query over record collections.
///
/// # Example
///
/// ```
/// use dataquery::{Collection, Pattern, Query, Value};
/// use serde_json::json;
///
/// let people = Collection::try_from(Value::from(json!([
///     {"name": "Ann", "address": {"city": "Lisbon"}},
///     {"name": "Bob", "address": {"city": "Porto"}},
/// ])))
/// .unwrap();
///
/// let by_path = Query::path("address.city").unwrap().value("Porto");
/// assert_eq!(by_path.count(&people), 1);
///
/// let by_pattern = Query::pattern(Pattern::new().and("name", "Ann").unwrap());
/// let found = by_pattern.find(&people).unwrap();
/// assert_eq!(found.record.get("name"), Some(&Value::from("Ann")));
/// ```
#[derive(Clone)]
pub struct Query {
    filter: Filter,
    value: Option<ClauseValue>,
    lookup: Arc<dyn KeyLookup + Send + Sync>,
}

impl Query {
    /// Creates a query from any filter.
    pub fn new(filter: impl Into<Filter>) -> Self {
        Query {
            filter: filter.into(),
            value: None,
            lookup: Arc::new(LastMatch),
        }
    }

    /// Creates a path query. Without a comparison value it selects the
    /// records in which the path resolves.
    pub fn path(path: &str) -> Result<Self> {
        Ok(Query::new(Filter::path(path)?))
    }

    /// Creates a structural pattern query.
    pub fn pattern(pattern: Pattern) -> Self {
        Query::new(pattern)
    }

    /// Creates a query from a whole-record predicate.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Query::new(Filter::predicate(f))
    }

    // ========================================================================
    // Builder
    // ========================================================================

    /// Sets the comparison value. Only path filters use it.
    pub fn value(mut self, value: impl Into<ClauseValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the strategy for regex path segments.
    pub fn lookup<L>(mut self, lookup: L) -> Self
    where
        L: KeyLookup + Send + Sync + 'static,
    {
        self.lookup = Arc::new(lookup);
        self
    }

    /// Finalizes the query.
    pub fn build(self) -> Self {
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the filter.
    pub fn get_filter(&self) -> &Filter {
        &self.filter
    }

    /// Returns the comparison value, if set.
    pub fn get_value(&self) -> Option<&ClauseValue> {
        self.value.as_ref()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests a single record.
    pub fn matches(&self, record: &Value) -> bool {
        let matcher = Matcher::new(self.lookup.as_ref());
        match &self.filter {
            Filter::Predicate(f) => f(record),
            Filter::Path(path) => matcher.seek_path(record, path, self.value.as_ref()),
            Filter::Pattern(pattern) => matcher.seek(record, pattern),
        }
    }

    /// Returns the matching entries, borrowed, in collection order.
    pub fn select<'a>(&self, collection: &'a Collection) -> Vec<Entry<'a>> {
        collection
            .entries()
            .filter(|entry| self.matches(entry.record))
            .collect()
    }

    /// Returns a collection of the same kind holding only the matching records.
    ///
    /// Sequences keep their order. Mappings keep the original keys of the
    /// surviving records, in their original order.
    pub fn filter(&self, collection: &Collection) -> Collection {
        let selected = self.select(collection);
        debug!(
            kind = collection.kind().as_str(),
            filter = self.filter.kind(),
            total = collection.len(),
            matched = selected.len(),
            "filtered collection"
        );
        Collection::from_entries(collection.kind(), selected)
    }

    /// Removes non-matching records in place.
    pub fn retain(&self, collection: &mut Collection) {
        match collection {
            Collection::Sequence(items) => items.retain(|record| self.matches(record)),
            Collection::Mapping(map) => map.retain(|_, record| self.matches(record)),
        }
    }

    /// Counts the matching records.
    pub fn count(&self, collection: &Collection) -> usize {
        collection
            .records()
            .filter(|record| self.matches(record))
            .count()
    }

    /// Returns `true` if any record matches.
    pub fn any(&self, collection: &Collection) -> bool {
        collection.records().any(|record| self.matches(record))
    }

    /// Returns `true` if every record matches. Vacuously true when empty.
    pub fn all(&self, collection: &Collection) -> bool {
        collection.records().all(|record| self.matches(record))
    }

    /// Returns the first matching entry.
    pub fn find<'a>(&self, collection: &'a Collection) -> Option<Entry<'a>> {
        collection.entries().find(|entry| self.matches(entry.record))
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("filter", &self.filter)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl From<Filter> for Query {
    fn from(filter: Filter) -> Self {
        Query::new(filter)
    }
}

/// Filters a collection in one call.
///
/// Returns `None` when either the collection or the filter is missing.
/// `value` is only consulted by path filters.
pub fn query(
    collection: Option<&Collection>,
    filter: Option<&Filter>,
    value: Option<&ClauseValue>,
) -> Option<Collection> {
    let (collection, filter) = (collection?, filter?);
    let mut query = Query::new(filter.clone());
    if let Some(value) = value {
        query = query.value(value.clone());
    }
    Some(query.filter(collection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FirstMatch;
    use regex::Regex;
    use serde_json::json;

    fn people() -> Collection {
        Collection::try_from(Value::from(json!([
            {"id": 1, "name": "Ann", "tags": ["a", "b"], "home": {"city": "Lisbon"}},
            {"id": 2, "name": "Bob", "tags": ["c"], "home": {"city": "Porto"}},
            {"id": 3, "name": "Cid", "home": {"city": "Porto"}},
        ])))
        .unwrap()
    }

    fn ids(collection: &Collection) -> Vec<i64> {
        collection
            .records()
            .filter_map(|r| r.get("id").and_then(Value::as_number))
            .map(|n| n.to_f64() as i64)
            .collect()
    }

    #[test]
    fn path_with_value() {
        let q = Query::path("home.city").unwrap().value("Porto");
        assert_eq!(ids(&q.filter(&people())), [2, 3]);
    }

    #[test]
    fn path_without_value_checks_presence() {
        let q = Query::path("tags").unwrap();
        assert_eq!(ids(&q.filter(&people())), [1, 2]);
    }

    #[test]
    fn path_with_candidate_list() {
        let q = Query::path("name")
            .unwrap()
            .value(vec!["Cid", "Ann"]);
        assert_eq!(ids(&q.filter(&people())), [1, 3]);
    }

    #[test]
    fn pattern_query() {
        let pattern = Pattern::new()
            .and("home", Pattern::new().field("city", "Porto"))
            .unwrap()
            .and("name", Regex::new("^B").unwrap())
            .unwrap();
        assert_eq!(ids(&Query::pattern(pattern).filter(&people())), [2]);
    }

    #[test]
    fn predicate_query() {
        let q = Query::predicate(|r| r.get("tags").is_none());
        assert_eq!(ids(&q.filter(&people())), [3]);
    }

    #[test]
    fn empty_pattern_keeps_everything() {
        let all = people();
        assert_eq!(Query::pattern(Pattern::new()).filter(&all), all);
    }

    #[test]
    fn mapping_keeps_keys_and_order() {
        let map = Collection::try_from(Value::from(json!({
            "z": {"n": 1},
            "a": {"n": 2},
            "m": {"n": 1},
        })))
        .unwrap();
        let out = Query::path("n").unwrap().value(1).filter(&map);
        let keys: Vec<&str> = out.entries().filter_map(|e| e.map_key()).collect();
        assert_eq!(keys, ["z", "m"]);
    }

    #[test]
    fn executors() {
        let all = people();
        let porto = Query::path("home.city").unwrap().value("Porto");
        assert_eq!(porto.count(&all), 2);
        assert!(porto.any(&all));
        assert!(!porto.all(&all));
        assert!(Query::path("home").unwrap().all(&all));

        let first = porto.find(&all).unwrap();
        assert_eq!(first.record.get("name"), Some(&Value::from("Bob")));
        assert_eq!(porto.select(&all).len(), 2);
    }

    #[test]
    fn retain_in_place() {
        let mut all = people();
        Query::path("id").unwrap().value(2).retain(&mut all);
        assert_eq!(ids(&all), [2]);
    }

    #[test]
    fn lookup_strategy_is_configurable() {
        let items = Collection::Sequence(vec![Value::from(json!({
            "fileA": {"url": "a"},
            "fileB": {"url": "b"},
        }))]);
        let last = Query::path("/^file/.url").unwrap().value("b");
        let first = last.clone().lookup(FirstMatch).value("a");
        assert_eq!(last.count(&items), 1);
        assert_eq!(first.count(&items), 1);
        assert_eq!(last.clone().value("a").count(&items), 0);
    }

    #[test]
    fn free_function_handles_missing_inputs() {
        let all = people();
        let filter = Filter::path("id").unwrap();
        assert!(query(None, Some(&filter), None).is_none());
        assert!(query(Some(&all), None, None).is_none());

        let value = ClauseValue::from(3);
        let out = query(Some(&all), Some(&filter), Some(&value)).unwrap();
        assert_eq!(ids(&out), [3]);
    }

    #[test]
    fn value_is_ignored_by_pattern_filters() {
        let q = Query::pattern(Pattern::new().field("id", 1)).value(99);
        assert_eq!(q.count(&people()), 1);
        assert!(q.get_value().is_some());
        assert_eq!(q.get_filter().kind(), "pattern");
    }

    #[test]
    fn queries_cross_threads() {
        let q = Arc::new(Query::path("id").unwrap().value(1));
        let all = Arc::new(people());
        let handle = {
            let (q, all) = (Arc::clone(&q), Arc::clone(&all));
            std::thread::spawn(move || q.count(&all))
        };
        assert_eq!(handle.join().unwrap(), 1);
    }
}
