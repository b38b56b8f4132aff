use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use thiserror::Error;

/// Conditions that stop a check before any report can be produced.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Example file not found: {}", .0.display())]
    ExampleNotFound(PathBuf),
    #[error("Environment file not found: {}", .0.display())]
    EnvFileNotFound(PathBuf),
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid UTF-8 input in {}: {source}", .path.display())]
    InvalidEncoding {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub path: Option<PathBuf>,
    pub line: u32,
    pub column: u32,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: u32, column: u32, kind: ParseErrorKind) -> Self {
        Self {
            path: None,
            line,
            column,
            kind,
        }
    }

    pub(crate) fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(
                f,
                "parse error in {} at line {}, column {}: {}",
                path.display(),
                self.line,
                self.column,
                self.kind
            ),
            None => write!(
                f,
                "parse error at line {}, column {}: {}",
                self.line, self.column, self.kind
            ),
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("invalid syntax")]
    InvalidSyntax,
    #[error("missing key")]
    MissingKey,
    #[error("invalid key")]
    InvalidKey,
    #[error("unterminated quote")]
    UnterminatedQuote,
}
