use std::{
    error::Error as StdError,
    result::Result as StdResult,
    io::Error as IoError,
    fmt::{Display, Formatter, Result as FmtResult},
};
use serde_json::Error as JsonError;

/// Result type
pub type Result<T> = StdResult<T, Error>;

/// Error type
#[derive(Debug)]
pub enum Error {
    /// Reading the database or writing the output failed
    Io(IoError),
    /// Database content is not a list of compile commands
    Database(JsonError),
    /// No database entry matches the selector
    NoMatch(String),
    /// Matched entry carries no usable compiler invocation
    Command(String),
    /// Compiler probe failed (recoverable)
    Probe(String),
}

impl Error {
    /// Whether the pipeline may continue past this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Probe(_))
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        use Error::*;

        match self {
            Io(e) => Some(e),
            Database(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        use Error::*;

        match self {
            Io(e) => write!(f, "I/O error: {}", e),
            Database(e) => write!(f, "Invalid compilation database: {}", e),
            NoMatch(s) => write!(f, "Could not find {} in compilation database", s),
            Command(e) => write!(f, "Invalid compile command: {}", e),
            Probe(e) => write!(f, "Could not extract default includes: {}", e),
        }
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

impl From<JsonError> for Error {
    fn from(e: JsonError) -> Self {
        Error::Database(e)
    }
}
