//! Error types for the feedback backend client

use std::fmt;

use paged_list::ListError;

/// Errors that can occur when talking to the feedback backend
#[derive(Debug)]
pub enum ApiError {
    /// HTTP request failed
    Http(reqwest::Error),
    /// Backend answered with a non-success status
    Status(u16),
    /// Response body could not be decoded
    Decode(String),
    /// Caller input rejected before any request was made
    InvalidInput(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "Backend HTTP error: {}", e),
            Self::Status(code) => write!(f, "Backend returned status {}", code),
            Self::Decode(msg) => write!(f, "Backend decode error: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Http(e)
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<ApiError> for ListError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Status(code) => ListError::Status(code),
            ApiError::Decode(msg) => ListError::Malformed(msg),
            other => ListError::Transport(other.to_string()),
        }
    }
}

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_list_status() {
        assert_eq!(ListError::from(ApiError::Status(404)), ListError::Status(404));
    }

    #[test]
    fn test_decode_maps_to_malformed() {
        let err = ListError::from(ApiError::Decode("missing field `data`".to_string()));
        assert_eq!(err, ListError::Malformed("missing field `data`".to_string()));
    }

    #[test]
    fn test_invalid_input_display() {
        let err = ApiError::InvalidInput("case number too short".to_string());
        assert_eq!(err.to_string(), "Invalid input: case number too short");
    }
}
