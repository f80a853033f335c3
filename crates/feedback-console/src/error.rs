//! Error types for the feedback console

use std::fmt;

use feedback_api::{ApiError, TokenError};
use feedback_live::LiveError;
use geocoding_client::GeocodingError;
use paged_list::ListError;

#[derive(Debug)]
pub enum ConsoleError {
    Api(ApiError),
    Geocoding(GeocodingError),
    List(ListError),
    Live(LiveError),
    Token(TokenError),
    Config(String),
    /// Bad command line input
    Usage(String),
    Output(String),
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Api(err) => write!(f, "{}", err),
            ConsoleError::Geocoding(err) => write!(f, "{}", err),
            ConsoleError::List(err) => write!(f, "List load failed: {}", err),
            ConsoleError::Live(err) => write!(f, "Live updates: {}", err),
            ConsoleError::Token(err) => write!(f, "{}", err),
            ConsoleError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ConsoleError::Usage(msg) => write!(f, "Usage error: {}", msg),
            ConsoleError::Output(msg) => write!(f, "Output error: {}", msg),
        }
    }
}

impl std::error::Error for ConsoleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConsoleError::Api(err) => Some(err),
            ConsoleError::Geocoding(err) => Some(err),
            ConsoleError::List(err) => Some(err),
            ConsoleError::Live(err) => Some(err),
            ConsoleError::Token(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for ConsoleError {
    fn from(err: ApiError) -> Self {
        ConsoleError::Api(err)
    }
}

impl From<GeocodingError> for ConsoleError {
    fn from(err: GeocodingError) -> Self {
        ConsoleError::Geocoding(err)
    }
}

impl From<ListError> for ConsoleError {
    fn from(err: ListError) -> Self {
        ConsoleError::List(err)
    }
}

impl From<LiveError> for ConsoleError {
    fn from(err: LiveError) -> Self {
        ConsoleError::Live(err)
    }
}

impl From<TokenError> for ConsoleError {
    fn from(err: TokenError) -> Self {
        ConsoleError::Token(err)
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Output(err.to_string())
    }
}

impl From<tracing_subscriber::filter::ParseError> for ConsoleError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        ConsoleError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
