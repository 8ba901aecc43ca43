//! Reading the collection text.
//!
//! Stdin access goes through [`StdinReader`] so tests can simulate piped and
//! interactive stdin without touching the real one.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading input.
#[derive(Debug, Error)]
pub enum InputError {
    /// Stdin is a terminal and no file was given.
    #[error("no input: pass --input <FILE> or pipe a collection on stdin")]
    NoInput,

    /// Failed to read from stdin.
    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    /// Failed to read the input file.
    #[error("failed to read '{}': {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Abstraction over stdin reading.
pub trait StdinReader: Send + Sync {
    /// Returns `true` if stdin is interactive, `false` if piped.
    fn is_terminal(&self) -> bool;

    /// Reads all content from stdin.
    fn read_to_string(&self) -> io::Result<String>;
}

/// Real stdin reader using std::io.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealStdin;

impl StdinReader for RealStdin {
    fn is_terminal(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn read_to_string(&self) -> io::Result<String> {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}

/// Mock stdin reader for testing.
#[derive(Debug, Clone)]
pub struct MockStdin {
    is_terminal: bool,
    content: String,
}

impl MockStdin {
    /// Simulates an interactive terminal.
    pub fn terminal() -> Self {
        Self {
            is_terminal: true,
            content: String::new(),
        }
    }

    /// Simulates piped input.
    pub fn piped(content: impl Into<String>) -> Self {
        Self {
            is_terminal: false,
            content: content.into(),
        }
    }
}

impl StdinReader for MockStdin {
    fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    fn read_to_string(&self) -> io::Result<String> {
        Ok(self.content.clone())
    }
}

/// Reads the collection text from `path`, or from piped stdin.
pub fn read_input(path: Option<&Path>, stdin: &dyn StdinReader) -> Result<String, InputError> {
    if let Some(path) = path {
        debug!(path = %path.display(), "reading collection from file");
        return std::fs::read_to_string(path).map_err(|source| InputError::File {
            path: path.to_path_buf(),
            source,
        });
    }
    if stdin.is_terminal() {
        return Err(InputError::NoInput);
    }
    debug!("reading collection from stdin");
    stdin.read_to_string().map_err(InputError::Stdin)
}
