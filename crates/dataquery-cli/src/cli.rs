//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// Filter a JSON collection by path, pattern or predicate value.
///
/// The collection (a JSON array or object) is read from `--input` or from
/// piped stdin. The result has the same shape as the input.
#[derive(Debug, Parser)]
#[command(name = "dq", version, about)]
pub struct Cli {
    /// Dotted path such as `root./^file/.url`, or a JSON pattern such as
    /// `{"id": 1}`.
    pub filter: String,

    /// Comparison value for path filters: JSON, or raw text. `/re/flags` is
    /// read as a regex.
    pub value: Option<String>,

    /// Read the collection from a file instead of stdin.
    #[arg(short, long, env = "DQ_INPUT")]
    pub input: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, env = "DQ_OUTPUT", default_value = "json")]
    pub output: OutputMode,

    /// Read RFC 3339 strings as dates.
    #[arg(long, env = "DQ_DATES")]
    pub dates: bool,

    /// Keep `/re/` strings in filters and values as plain strings.
    #[arg(long)]
    pub no_regex_literals: bool,

    /// Descend into the first key a regex segment matches, not the last.
    #[arg(long)]
    pub first_match: bool,

    /// Print only the number of matching records.
    #[arg(long)]
    pub count: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Structured output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Json,
    Yaml,
}

impl Cli {
    /// Returns the default log directive for the verbosity level.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from([
            "dq",
            "--first-match",
            "--count",
            "-vv",
            "-o",
            "yaml",
            "a.b",
            "1",
        ]);
        assert_eq!(cli.filter, "a.b");
        assert_eq!(cli.value.as_deref(), Some("1"));
        assert!(cli.first_match);
        assert!(cli.count);
        assert_eq!(cli.output, OutputMode::Yaml);
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn value_is_optional() {
        let cli = Cli::parse_from(["dq", "id"]);
        assert!(cli.value.is_none());
        assert_eq!(cli.log_level(), "warn");
    }
}
