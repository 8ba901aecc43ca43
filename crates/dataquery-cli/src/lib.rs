//! The `dq` command: filter a JSON collection from the shell.
//!
//! ```text
//! $ echo '[{"id": 1}, {"id": 2}]' | dq id 2
//! [
//!   {
//!     "id": 2
//!   }
//! ]
//! ```
//!
//! [`run`] holds the whole command so it can be driven from tests with a
//! mocked stdin. The binary only adds logging setup and exit codes.

pub mod cli;
pub mod input;
pub mod serialize;

use anyhow::Context;
use dataquery::text::TextParser;
use dataquery::{FirstMatch, Query};
use tracing::{debug, info};

pub use cli::{Cli, OutputMode};
pub use input::{read_input, InputError, MockStdin, RealStdin, StdinReader};
pub use serialize::{serialize_structured, SerializeError};

/// Runs one query and returns the text to print.
pub fn run(cli: &Cli, stdin: &dyn StdinReader) -> anyhow::Result<String> {
    let parser = TextParser::new()
        .regex_literals(!cli.no_regex_literals)
        .dates(cli.dates);

    let text = read_input(cli.input.as_deref(), stdin)?;
    let collection = parser
        .parse_collection(&text)
        .context("failed to parse collection")?;

    let filter = parser
        .parse_filter(&cli.filter)
        .with_context(|| format!("invalid filter '{}'", cli.filter))?;
    let mut query = Query::new(filter);
    if let Some(value) = &cli.value {
        let value = parser
            .parse_value(value)
            .with_context(|| format!("invalid value '{value}'"))?;
        query = query.value(value);
    }
    if cli.first_match {
        query = query.lookup(FirstMatch);
    }
    debug!(?query, "built query");

    if cli.count {
        return Ok(query.count(&collection).to_string());
    }

    let result = query.filter(&collection);
    info!(
        kind = collection.kind().as_str(),
        total = collection.len(),
        matched = result.len(),
        "query done"
    );
    Ok(serialize_structured(&result, cli.output)?)
}
