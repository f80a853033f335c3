//! Error types for page sources

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// Backend unreachable or request failed before a response arrived
    Transport(String),
    /// Backend answered with a non-success status
    Status(u16),
    /// Response body did not have the expected shape
    Malformed(String),
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ListError::Status(code) => write!(f, "Backend returned status {}", code),
            ListError::Malformed(msg) => write!(f, "Malformed response: {}", msg),
        }
    }
}

impl std::error::Error for ListError {}

impl From<serde_json::Error> for ListError {
    fn from(err: serde_json::Error) -> Self {
        ListError::Malformed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ListError>;
