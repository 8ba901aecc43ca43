//! Error types for the dataquery crate.

use thiserror::Error;

/// Errors that can occur when building queries or parsing their inputs.
///
/// Matching itself never fails: unresolvable paths and type mismatches are
/// absorbed into "no match". Errors only surface while constructing paths,
/// patterns and comparison values.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Invalid regular expression in a path segment or regex literal.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// Text input was not valid JSON.
    #[error("invalid JSON input: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A date string could not be parsed as RFC 3339.
    #[error("invalid date '{input}': {source}")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The input value cannot be used as a collection.
    #[error("expected an array or an object as collection, got {found}")]
    UnsupportedCollection { found: &'static str },

    /// A regex literal used a flag that has no equivalent.
    #[error("unsupported regex flag '{0}'")]
    UnsupportedRegexFlag(char),
}

/// Result type for dataquery operations.
pub type Result<T> = std::result::Result<T, QueryError>;
