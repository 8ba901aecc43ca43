//! Dotted property paths.
//!
//! A [`Path`] addresses a value nested inside a record, one segment per
//! level: `deep.obj.veryDeep`. A segment wrapped in slashes is a
//! case-insensitive regex matched against the key names at that level:
//! `root./^file/.url` descends into whichever child of `root` has a key
//! starting with "file".

use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};

use crate::error::{QueryError, Result};
use crate::traits::{KeyLookup, LastMatch};
use crate::value::Value;

/// One step of a [`Path`].
#[derive(Debug, Clone)]
pub enum Segment {
    /// Direct property lookup by name.
    Literal(String),
    /// Case-insensitive regex selecting among the keys of the current node.
    Pattern(Regex),
}

impl Segment {
    /// Returns `true` if this segment is a regex segment.
    pub fn is_pattern(&self) -> bool {
        matches!(self, Segment::Pattern(_))
    }
}

/// A parsed dotted path.
///
/// Regex segments are compiled once at parse time, so an invalid pattern is
/// reported by [`Path::parse`] rather than during matching.
///
/// # Example
///
/// ```
/// use dataquery::{Path, Value};
/// use serde_json::json;
///
/// let record: Value = json!({
///     "root": { "filePDF": { "url": "http://file.com" } }
/// })
/// .into();
///
/// let path = Path::parse("root./^file/.url").unwrap();
/// assert_eq!(path.resolve(&record), Some(&Value::from("http://file.com")));
///
/// let missing = Path::parse("root.fileDOC.url").unwrap();
/// assert_eq!(missing.resolve(&record), None);
/// ```
#[derive(Debug, Clone)]
pub struct Path {
    source: String,
    segments: Vec<Segment>,
}

impl Path {
    /// Parses a dotted path.
    ///
    /// A segment that starts with `/` runs up to the next `/` followed by a
    /// `.` or the end of the path, so regex segments may contain dots.
    pub fn parse(path: &str) -> Result<Self> {
        let segments = split_segments(path)
            .into_iter()
            .map(parse_segment)
            .collect::<Result<Vec<_>>>()?;

        Ok(Path {
            source: path.to_string(),
            segments,
        })
    }

    /// Returns the path as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Resolves this path against `root`, letting the last matching key win
    /// for regex segments.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.resolve_with(root, &LastMatch)
    }

    /// Resolves this path against `root` with a custom key lookup strategy.
    ///
    /// Resolution stops with `None` as soon as a step has nothing to descend
    /// into: a missing key, a null, or a scalar. A regex segment that matches
    /// no key at its level also yields `None`; the segment is never skipped.
    pub fn resolve_with<'a>(&self, root: &'a Value, lookup: &dyn KeyLookup) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |node, segment| match segment {
                Segment::Literal(name) => node.get(name),
                Segment::Pattern(pattern) => lookup.lookup(node, pattern),
            })
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl FromStr for Path {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut rest = path;

    loop {
        if let Some(end) = regex_segment_end(rest) {
            segments.push(&rest[..end]);
            match rest[end..].strip_prefix('.') {
                Some(tail) => rest = tail,
                None => break,
            }
            continue;
        }

        match rest.find('.') {
            Some(dot) => {
                segments.push(&rest[..dot]);
                rest = &rest[dot + 1..];
            }
            None => {
                segments.push(rest);
                break;
            }
        }
    }

    segments
}

/// Byte length of a leading `/.../` segment, if `rest` starts with one.
fn regex_segment_end(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    if bytes.first() != Some(&b'/') {
        return None;
    }
    (1..bytes.len())
        .find(|&i| bytes[i] == b'/' && (i + 1 == bytes.len() || bytes[i + 1] == b'.'))
        .map(|i| i + 1)
}

fn parse_segment(segment: &str) -> Result<Segment> {
    let inner = segment
        .strip_prefix('/')
        .and_then(|s| s.strip_suffix('/'));

    match inner {
        Some(pattern) => {
            let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
            tracing::trace!(segment, "compiled regex path segment");
            Ok(Segment::Pattern(regex))
        }
        None => Ok(Segment::Literal(segment.to_string())),
    }
}
