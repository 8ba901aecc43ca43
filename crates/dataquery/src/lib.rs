//! Dataquery - structural queries over collections of JSON-like records.
//!
//! Dataquery filters a collection (an ordered sequence, or a mapping of
//! records under keys) and returns a collection of the same kind holding only
//! the records that match. Records are selected in one of three ways:
//!
//! - a **path** such as `address.city` or `root./^file/.url`, optionally
//!   compared against a value
//! - a **pattern**: a nested set of key/value clauses matched structurally
//! - a **predicate**: a closure over the whole record
//!
//! # Quick Start
//!
//! ```rust
//! use dataquery::{query, Collection, Filter, Pattern, Query, Value};
//! use serde_json::json;
//!
//! let files = Collection::try_from(Value::from(json!([
//!     {"id": 1, "root": {"filePDF": {"url": "http://file.com"}}},
//!     {"id": 2, "root": {"fileDOC": {"url": "http://file.com.br"}}},
//!     {"id": 3, "tags": ["z", "k"]},
//! ])))
//! .unwrap();
//!
//! // Regex path segment plus regex comparison value
//! let brazil = Query::path("root./^file/.url")
//!     .unwrap()
//!     .value(regex::Regex::new(r"\.com\.br").unwrap());
//! assert_eq!(brazil.count(&files), 1);
//!
//! // Equal-length arrays match regardless of order
//! let tags = Pattern::new().and("tags", vec!["k", "z"]).unwrap();
//! assert_eq!(Query::pattern(tags).count(&files), 1);
//!
//! // One-shot form, returning a collection of the same kind
//! let filter = Filter::predicate(|r| r.get("root").is_some());
//! let out = query(Some(&files), Some(&filter), None).unwrap();
//! assert_eq!(out.len(), 2);
//! ```
//!
//! # Matching Rules
//!
//! A resolved record value is compared with the expected value by the first
//! applicable rule:
//!
//! | Expected | Record | Result |
//! |----------|--------|--------|
//! | function | any | the function's verdict |
//! | null | null | match |
//! | any | null | no match |
//! | date | date | same instant |
//! | list | array | multiset equality when lengths agree, else any/any |
//! | any | array | some element matches |
//! | list | any | some candidate matches |
//! | pattern | object | structural match |
//! | regex | any | regex finds a match in the string form |
//! | any | any | strict equality |
//!
//! Unresolvable paths never error: they simply do not match. Errors only
//! surface while building paths, patterns and values, as [`QueryError`].

pub mod text;

mod clause;
mod collection;
mod error;
mod filter;
mod matcher;
mod ordering;
mod path;
mod query;
mod traits;
mod value;

// Re-export public API
pub use clause::{Clause, ClauseKey, ClauseValue, Pattern, ValueFn};
pub use collection::{Collection, CollectionKind, Entry, EntryKey};
pub use error::{QueryError, Result};
pub use filter::{Filter, RecordFn};
pub use matcher::{check_value, seek, Matcher};
pub use ordering::{compare_values, SortKey};
pub use path::{Path, Segment};
pub use query::{query, Query};
pub use text::TextParser;
pub use traits::{FirstMatch, KeyLookup, LastMatch};
pub use value::{Number, Record, Timestamp, Value};
