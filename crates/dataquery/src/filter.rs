//! Filter expressions.

use std::fmt;
use std::sync::Arc;

use crate::clause::Pattern;
use crate::error::Result;
use crate::path::Path;
use crate::value::Value;

/// Caller-supplied test on a whole record.
pub type RecordFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// What a query selects records by.
///
/// - [`Filter::Path`] resolves a dotted path in each record, and compares the
///   result with the query's comparison value (or only checks that the path
///   resolves, when there is none).
/// - [`Filter::Pattern`] matches records structurally.
/// - [`Filter::Predicate`] hands each whole record to a closure.
#[derive(Clone)]
pub enum Filter {
    /// Dotted path, paired with the query's comparison value.
    Path(Path),
    /// Structural pattern.
    Pattern(Pattern),
    /// Whole-record predicate.
    Predicate(RecordFn),
}

impl Filter {
    /// Parses a path filter.
    pub fn path(path: &str) -> Result<Self> {
        Ok(Filter::Path(Path::parse(path)?))
    }

    /// Wraps a closure as a predicate filter.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Arc::new(f))
    }

    /// Returns the display name of this filter's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Filter::Path(_) => "path",
            Filter::Pattern(_) => "pattern",
            Filter::Predicate(_) => "predicate",
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Filter::Pattern(pattern) => f.debug_tuple("Pattern").field(pattern).finish(),
            Filter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<Path> for Filter {
    fn from(path: Path) -> Self {
        Filter::Path(path)
    }
}

impl From<Pattern> for Filter {
    fn from(pattern: Pattern) -> Self {
        Filter::Pattern(pattern)
    }
}
