//! Error types for the live update client

use std::fmt;

#[derive(Debug)]
pub enum LiveError {
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),
    /// Frame that is not a valid Engine.IO / socket.io packet
    Protocol(String),
    /// Server refused the namespace connection
    Rejected(String),
    MaxReconnectAttempts,
    ConnectionClosed,
}

impl fmt::Display for LiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiveError::WebSocket(err) => write!(f, "WebSocket error: {}", err),
            LiveError::Protocol(msg) => write!(f, "Protocol error: {}", msg),
            LiveError::Rejected(msg) => write!(f, "Connection rejected: {}", msg),
            LiveError::MaxReconnectAttempts => write!(f, "Max reconnection attempts reached"),
            LiveError::ConnectionClosed => write!(f, "Connection closed"),
        }
    }
}

impl std::error::Error for LiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LiveError::WebSocket(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for LiveError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        LiveError::WebSocket(Box::new(err))
    }
}

impl From<serde_json::Error> for LiveError {
    fn from(err: serde_json::Error) -> Self {
        LiveError::Protocol(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LiveError>;
