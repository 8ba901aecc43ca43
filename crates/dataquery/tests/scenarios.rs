//! End-to-end scenarios over a sequence source and a mapping source holding
//! the same five records.

use dataquery::{
    query, ClauseValue, Collection, Filter, FirstMatch, Pattern, Query, Record, Timestamp, Value,
};
use regex::Regex;
use serde_json::json;

// ============================================================================
// Fixtures
// ============================================================================

fn records() -> Vec<Value> {
    let mut records: Vec<Value> = vec![
        json!({
            "id": 1,
            "deep": {"obj": {"veryDeep": ["z", "k"]}},
            "twoWithTheSameValue": "zk",
        }),
        json!({
            "id": 2,
            "deep": {"obj": {"veryDeep": "zk"}},
            "someInner": {},
        }),
        json!({
            "id": 3,
            "deep": {"obj": {"veryDeep": "kz"}},
            "twoWithTheSameValue": "zk",
            "someInner": {},
        }),
        json!({"id": 4, "root": {"filePDF": {"url": "http://file.com"}}}),
        json!({"id": 5, "root": {"fileDOC": {"url": "http://file.com.br"}}}),
    ]
    .into_iter()
    .map(Value::from)
    .collect();

    set_date(&mut records[1], 2014);
    set_date(&mut records[2], 2015);
    records
}

fn set_date(record: &mut Value, millis: i64) {
    if let Value::Object(fields) = record {
        if let Some(Value::Object(inner)) = fields.get_mut("someInner") {
            inner.insert("date".into(), Value::Date(Timestamp(millis)));
        }
    }
}

fn sequence() -> Collection {
    Collection::Sequence(records())
}

fn mapping() -> Collection {
    let map: Record = records()
        .into_iter()
        .enumerate()
        .map(|(i, record)| (format!("id{}", i + 1), record))
        .collect();
    Collection::Mapping(map)
}

fn ids(collection: &Collection) -> Vec<i64> {
    collection
        .records()
        .filter_map(|r| r.get("id").and_then(Value::as_number))
        .map(|n| n.to_f64() as i64)
        .collect()
}

fn keys(collection: &Collection) -> Vec<String> {
    collection
        .entries()
        .filter_map(|e| e.map_key().map(str::to_string))
        .collect()
}

fn by_path(collection: &Collection, path: &str, value: impl Into<ClauseValue>) -> Collection {
    Query::path(path).unwrap().value(value).filter(collection)
}

fn by_pattern(collection: &Collection, pattern: serde_json::Value) -> Collection {
    let ClauseValue::Pattern(pattern) = ClauseValue::from_value(Value::from(pattern)).unwrap()
    else {
        panic!("fixture pattern must be an object");
    };
    Query::pattern(pattern).filter(collection)
}

// ============================================================================
// Sequence source
// ============================================================================

#[test]
fn sequence_result_is_a_sequence() {
    let out = by_path(&sequence(), "id", 1);
    assert!(matches!(out, Collection::Sequence(_)));
}

#[test]
fn single_match() {
    assert_eq!(ids(&by_path(&sequence(), "id", 1)), [1]);
    assert_eq!(ids(&by_pattern(&sequence(), json!({"id": 1}))), [1]);
}

#[test]
fn several_matches_keep_order() {
    assert_eq!(ids(&by_path(&sequence(), "twoWithTheSameValue", "zk")), [1, 3]);
    assert_eq!(
        ids(&by_pattern(&sequence(), json!({"twoWithTheSameValue": "zk"}))),
        [1, 3]
    );
}

#[test]
fn every_pattern_key_must_match() {
    let out = by_pattern(&sequence(), json!({"twoWithTheSameValue": "zk", "id": 3}));
    assert_eq!(ids(&out), [3]);
}

#[test]
fn deep_value() {
    assert_eq!(ids(&by_path(&sequence(), "deep.obj.veryDeep", "zk")), [2]);
    let out = by_pattern(&sequence(), json!({"deep": {"obj": {"veryDeep": "zk"}}}));
    assert_eq!(ids(&out), [2]);
}

#[test]
fn candidate_list_is_an_or() {
    assert_eq!(ids(&by_path(&sequence(), "id", vec![1, 2])), [1, 2]);
    assert_eq!(ids(&by_pattern(&sequence(), json!({"id": [1, 2]}))), [1, 2]);
}

#[test]
fn deep_candidate_list() {
    // Record 1 holds a two-element array too, but not the same elements.
    let out = by_path(&sequence(), "deep.obj.veryDeep", vec!["zk", "kz"]);
    assert_eq!(ids(&out), [2, 3]);
    let out = by_pattern(
        &sequence(),
        json!({"deep": {"obj": {"veryDeep": ["zk", "kz"]}}}),
    );
    assert_eq!(ids(&out), [2, 3]);
}

#[test]
fn same_elements_in_another_order() {
    let out = by_path(&sequence(), "deep.obj.veryDeep", vec!["k", "z"]);
    assert_eq!(ids(&out), [1]);
}

#[test]
fn regex_segment_without_value() {
    let out = Query::path("root./^file*/.url").unwrap().filter(&sequence());
    assert_eq!(ids(&out), [4, 5]);
}

#[test]
fn regex_segment_and_regex_value() {
    let out = by_path(
        &sequence(),
        "root./^file*/.url",
        Regex::new(r"\.com\.br").unwrap(),
    );
    assert_eq!(ids(&out), [5]);
}

#[test]
fn regex_segment_is_case_insensitive() {
    let out = Query::path("root./^FILEP/.url").unwrap().filter(&sequence());
    assert_eq!(ids(&out), [4]);
}

#[test]
fn first_match_lookup() {
    let mut records = records();
    if let Value::Object(root) = &mut records[3] {
        root.insert(
            "root".into(),
            Value::from(json!({"fileA": {"url": "a"}, "fileB": {"url": "b"}})),
        );
    }
    let source = Collection::Sequence(records);

    let last = Query::path("root./^file/.url").unwrap().value("a");
    assert!(ids(&last.filter(&source)).is_empty());
    assert_eq!(ids(&last.lookup(FirstMatch).filter(&source)), [4]);
}

#[test]
fn function_on_resolved_value() {
    let out = by_path(
        &sequence(),
        "deep.obj.veryDeep",
        ClauseValue::function(Value::is_array),
    );
    assert_eq!(ids(&out), [1]);
}

#[test]
fn predicate_on_whole_record() {
    let q = Query::predicate(|record| {
        record
            .get("id")
            .and_then(Value::as_number)
            .is_some_and(|id| id.to_f64() > 2.0 && id.to_f64() < 5.0)
    });
    assert_eq!(ids(&q.filter(&sequence())), [3, 4]);
}

#[test]
fn date_value() {
    let out = by_path(&sequence(), "someInner.date", Timestamp(2015));
    assert_eq!(ids(&out), [3]);

    let pattern = Pattern::new()
        .and("someInner", Pattern::new().field("date", Timestamp(2015)))
        .unwrap();
    assert_eq!(ids(&Query::pattern(pattern).filter(&sequence())), [3]);
}

#[test]
fn dotted_pattern_keys_resolve_as_paths() {
    let pattern = Pattern::new()
        .and("deep.obj.veryDeep", "kz")
        .unwrap()
        .and("id", 3)
        .unwrap();
    assert_eq!(ids(&Query::pattern(pattern).filter(&sequence())), [3]);
}

#[test]
fn missing_inputs_yield_none() {
    let filter = Filter::path("id").unwrap();
    assert!(query(None, Some(&filter), None).is_none());
    assert!(query(Some(&sequence()), None, None).is_none());
}

#[test]
fn nothing_matches() {
    assert!(by_path(&sequence(), "id", 99).is_empty());
    assert!(by_path(&sequence(), "no.such.path", 1).is_empty());
}

// ============================================================================
// Mapping source
// ============================================================================

#[test]
fn mapping_result_is_a_mapping() {
    let out = by_path(&mapping(), "id", 1);
    assert!(matches!(out, Collection::Mapping(_)));
    assert_eq!(keys(&out), ["id1"]);
}

#[test]
fn mapping_single_match() {
    assert_eq!(keys(&by_pattern(&mapping(), json!({"id": 1}))), ["id1"]);
}

#[test]
fn mapping_several_matches() {
    assert_eq!(keys(&by_path(&mapping(), "twoWithTheSameValue", "zk")), ["id1", "id3"]);
}

#[test]
fn mapping_and() {
    let out = by_pattern(&mapping(), json!({"twoWithTheSameValue": "zk", "id": 3}));
    assert_eq!(keys(&out), ["id3"]);
}

#[test]
fn mapping_deep_and_or() {
    assert_eq!(keys(&by_path(&mapping(), "deep.obj.veryDeep", "zk")), ["id2"]);
    assert_eq!(keys(&by_path(&mapping(), "id", vec![1, 2])), ["id1", "id2"]);
    assert_eq!(
        keys(&by_path(&mapping(), "deep.obj.veryDeep", vec!["zk", "kz"])),
        ["id2", "id3"]
    );
}

#[test]
fn mapping_regex() {
    let out = Query::path("root./^file*/.url").unwrap().filter(&mapping());
    assert_eq!(keys(&out), ["id4", "id5"]);
    let out = by_path(&mapping(), "root./^file*/.url", Regex::new(r"\.com\.br").unwrap());
    assert_eq!(keys(&out), ["id5"]);
}

#[test]
fn mapping_functions_and_dates() {
    let out = by_path(&mapping(), "deep.obj.veryDeep", ClauseValue::function(Value::is_array));
    assert_eq!(keys(&out), ["id1"]);

    let q = Query::predicate(|r| r.get("root").is_some());
    assert_eq!(keys(&q.filter(&mapping())), ["id4", "id5"]);

    assert_eq!(keys(&by_path(&mapping(), "someInner.date", Timestamp(2015))), ["id3"]);
}

#[test]
fn mapping_values_survive_untouched() {
    let source = mapping();
    let out = by_path(&source, "id", 3);
    assert_eq!(out.get("id3"), source.get("id3"));
}

// ============================================================================
// Text entry points
// ============================================================================

#[test]
fn text_queries_match_typed_queries() {
    let text = r#"[
        {"id": 1, "root": {"filePDF": {"url": "http://file.com"}}},
        {"id": 2, "root": {"fileDOC": {"url": "http://file.com.br"}}}
    ]"#;
    let source = dataquery::text::parse_collection(text).unwrap();
    let filter = dataquery::text::parse_filter("root./^file/.url").unwrap();
    let value = dataquery::text::parse_value(r"/\.com\.br$/").unwrap();

    let out = query(Some(&source), Some(&filter), Some(&value)).unwrap();
    assert_eq!(ids(&out), [2]);

    let filter = dataquery::text::parse_filter(r#"{"root": {"filePDF": {"url": "/file\\.com$/"}}}"#)
        .unwrap();
    let out = query(Some(&source), Some(&filter), None).unwrap();
    assert_eq!(ids(&out), [1]);
}
