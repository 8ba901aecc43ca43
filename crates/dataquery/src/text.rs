//! Building collections, filters and comparison values from text.
//!
//! Records arrive as JSON. Filters and comparison values are JSON too, with
//! two conveniences for command lines and config files: text that is not
//! valid JSON is taken verbatim, and strings written as `/pattern/flags` can
//! be read as regexes.
//!
//! ```
//! use dataquery::text::TextParser;
//! use dataquery::Query;
//!
//! let parser = TextParser::new();
//! let people = parser.parse_collection(r#"[{"name": "Ann"}, {"name": "bob"}]"#).unwrap();
//! let filter = parser.parse_filter("name").unwrap();
//! let value = parser.parse_value("/^B/i").unwrap();
//!
//! assert_eq!(Query::new(filter).value(value).count(&people), 1);
//! ```

use regex::{Regex, RegexBuilder};
use tracing::trace;

use crate::clause::{ClauseValue, Pattern};
use crate::collection::Collection;
use crate::error::{QueryError, Result};
use crate::filter::Filter;
use crate::value::{Timestamp, Value};

/// Text-to-query conversion with configurable literal detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextParser {
    regex_literals: bool,
    dates: bool,
}

impl Default for TextParser {
    fn default() -> Self {
        TextParser {
            regex_literals: true,
            dates: false,
        }
    }
}

impl TextParser {
    /// Creates a parser with regex literals on and date detection off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `/pattern/flags` strings in filters and values as regexes.
    pub fn regex_literals(mut self, enabled: bool) -> Self {
        self.regex_literals = enabled;
        self
    }

    /// Reads RFC 3339 strings as dates, everywhere.
    pub fn dates(mut self, enabled: bool) -> Self {
        self.dates = enabled;
        self
    }

    /// Parses a JSON array or object into a collection.
    pub fn parse_collection(&self, text: &str) -> Result<Collection> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Collection::try_from(self.record_value(json))
    }

    /// Parses a filter.
    ///
    /// A JSON object becomes a pattern and a JSON string becomes a path.
    /// Anything else, including text that is not JSON at all, is read as a
    /// path verbatim.
    pub fn parse_filter(&self, text: &str) -> Result<Filter> {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(serde_json::Value::Object(map)) => {
                let mut pattern = Pattern::new();
                for (key, value) in map {
                    pattern = pattern.and(&key, self.clause_value(value)?)?;
                }
                Ok(Filter::Pattern(pattern))
            }
            Ok(serde_json::Value::String(path)) => Filter::path(&path),
            _ => Filter::path(text),
        }
    }

    /// Parses a comparison value: JSON if it is valid JSON, otherwise the raw
    /// text as a string (or regex literal, or date).
    pub fn parse_value(&self, text: &str) -> Result<ClauseValue> {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(json) => self.clause_value(json),
            Err(_) => ClauseValue::from_value(self.filter_string(text.to_string())?),
        }
    }

    fn record_value(&self, json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::String(s) => self.date_or_string(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(|v| self.record_value(v)).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, self.record_value(v)))
                    .collect(),
            ),
            scalar => Value::from(scalar),
        }
    }

    fn clause_value(&self, json: serde_json::Value) -> Result<ClauseValue> {
        ClauseValue::from_value(self.filter_value(json)?)
    }

    fn filter_value(&self, json: serde_json::Value) -> Result<Value> {
        Ok(match json {
            serde_json::Value::String(s) => self.filter_string(s)?,
            serde_json::Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|v| self.filter_value(v))
                    .collect::<Result<_>>()?,
            ),
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| Ok((k, self.filter_value(v)?)))
                    .collect::<Result<_>>()?,
            ),
            scalar => Value::from(scalar),
        })
    }

    fn filter_string(&self, s: String) -> Result<Value> {
        if self.regex_literals {
            if let Some(regex) = parse_regex_literal(&s) {
                return Ok(Value::Regex(regex?));
            }
        }
        Ok(self.date_or_string(s))
    }

    fn date_or_string(&self, s: String) -> Value {
        if self.dates {
            if let Ok(ts) = Timestamp::parse_rfc3339(&s) {
                return Value::Date(ts);
            }
        }
        Value::String(s)
    }
}

/// Parses a collection with the default parser.
pub fn parse_collection(text: &str) -> Result<Collection> {
    TextParser::new().parse_collection(text)
}

/// Parses a filter with the default parser.
pub fn parse_filter(text: &str) -> Result<Filter> {
    TextParser::new().parse_filter(text)
}

/// Parses a comparison value with the default parser.
pub fn parse_value(text: &str) -> Result<ClauseValue> {
    TextParser::new().parse_value(text)
}

/// Recognizes `/pattern/flags`.
///
/// Returns `None` when the text does not have that shape, so it stays a plain
/// string. Flags are letters after the last slash; `i`, `m`, `s` and `x` map
/// to regex options, while `g`, `u` and `y` have no bearing on a single
/// match test and are ignored.
pub fn parse_regex_literal(text: &str) -> Option<Result<Regex>> {
    let body = text.strip_prefix('/')?;
    let end = body.rfind('/')?;
    let (pattern, flags) = (&body[..end], &body[end + 1..]);
    if pattern.is_empty() || !flags.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            'g' | 'u' | 'y' => {}
            other => return Some(Err(QueryError::UnsupportedRegexFlag(other))),
        }
    }
    trace!(pattern, flags, "compiled regex literal");
    Some(builder.build().map_err(QueryError::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::ClauseKey;
    use crate::collection::CollectionKind;
    use crate::value::Number;

    #[test]
    fn collections_from_json() {
        let seq = parse_collection(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        assert_eq!(seq.kind(), CollectionKind::Sequence);
        assert_eq!(seq.len(), 2);

        let map = parse_collection(r#"{"b": {"id": 1}, "a": {"id": 2}}"#).unwrap();
        let keys: Vec<&str> = map.entries().filter_map(|e| e.map_key()).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn collection_errors() {
        assert!(matches!(
            parse_collection("42"),
            Err(QueryError::UnsupportedCollection { found: "number" })
        ));
        assert!(matches!(
            parse_collection("[1,"),
            Err(QueryError::InvalidJson(_))
        ));
    }

    #[test]
    fn record_strings_stay_strings_even_when_they_look_like_regexes() {
        let seq = parse_collection(r#"[{"p": "/a/"}]"#).unwrap();
        let record = seq.records().next().unwrap();
        assert_eq!(record.get("p"), Some(&Value::from("/a/")));
    }

    #[test]
    fn filters_from_text() {
        assert!(matches!(parse_filter("a.b").unwrap(), Filter::Path(p) if p.as_str() == "a.b"));
        assert!(matches!(parse_filter(r#""a.b""#).unwrap(), Filter::Path(p) if p.as_str() == "a.b"));
        assert!(matches!(parse_filter("id").unwrap(), Filter::Path(_)));
        // Valid JSON that is neither object nor string falls back to the raw text.
        assert!(matches!(parse_filter("42").unwrap(), Filter::Path(p) if p.as_str() == "42"));

        let Filter::Pattern(pattern) = parse_filter(r#"{"a.b": 1, "c": "/x/"}"#).unwrap() else {
            panic!("expected a pattern");
        };
        assert!(matches!(pattern.clauses()[0].key, ClauseKey::Path(_)));
        assert!(matches!(pattern.clauses()[1].value, ClauseValue::Regex(_)));
    }

    #[test]
    fn filter_with_bad_regex_segment_fails() {
        assert!(matches!(
            parse_filter("root./[/.url"),
            Err(QueryError::InvalidRegex(_))
        ));
    }

    #[test]
    fn values_from_text() {
        assert!(matches!(parse_value("3").unwrap(), ClauseValue::Number(Number::I64(3))));
        assert!(matches!(parse_value("Porto").unwrap(), ClauseValue::String(s) if s == "Porto"));
        assert!(matches!(parse_value(r#"["a", 1]"#).unwrap(), ClauseValue::List(l) if l.len() == 2));
        assert!(matches!(parse_value("null").unwrap(), ClauseValue::Null));
        assert!(matches!(parse_value(r"/\.com\.br/").unwrap(), ClauseValue::Regex(_)));
    }

    #[test]
    fn regex_literal_flags() {
        let regex = parse_regex_literal("/^ab/i").unwrap().unwrap();
        assert!(regex.is_match("ABC"));
        let regex = parse_regex_literal("/a.b/gs").unwrap().unwrap();
        assert!(regex.is_match("a\nb"));
        assert!(matches!(
            parse_regex_literal("/a/q"),
            Some(Err(QueryError::UnsupportedRegexFlag('q')))
        ));
        assert!(matches!(parse_regex_literal("/(/"), Some(Err(QueryError::InvalidRegex(_)))));
    }

    #[test]
    fn non_literals() {
        assert!(parse_regex_literal("abc").is_none());
        assert!(parse_regex_literal("/").is_none());
        assert!(parse_regex_literal("//").is_none());
        assert!(parse_regex_literal("/^file/.url").is_none());
    }

    #[test]
    fn regex_literals_can_be_disabled() {
        let parser = TextParser::new().regex_literals(false);
        assert!(matches!(parser.parse_value("/a/").unwrap(), ClauseValue::String(s) if s == "/a/"));
    }

    #[test]
    fn dates_are_opt_in() {
        let text = r#"[{"at": "2015-01-01T00:00:00Z"}]"#;
        let plain = parse_collection(text).unwrap();
        assert!(matches!(plain.records().next().unwrap().get("at"), Some(Value::String(_))));

        let parser = TextParser::new().dates(true);
        let dated = parser.parse_collection(text).unwrap();
        let at = dated.records().next().unwrap().get("at").unwrap();
        assert_eq!(at.as_timestamp(), Some(Timestamp(1_420_070_400_000)));

        assert!(matches!(
            parser.parse_value("2015-01-01T00:00:00Z").unwrap(),
            ClauseValue::Timestamp(Timestamp(1_420_070_400_000))
        ));
    }
}
