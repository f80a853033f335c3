use std::fmt;

/// Errors from the geocoding transport
#[derive(Debug)]
pub enum GeocodingError {
    InvalidCoordinates(f64, f64),
    Http(reqwest::Error),
    ApiError(String),
    Malformed(String),
}

impl fmt::Display for GeocodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCoordinates(lat, lng) => {
                write!(f, "Invalid coordinates: {lat}, {lng}")
            }
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::ApiError(msg) => write!(f, "API error: {msg}"),
            Self::Malformed(msg) => write!(f, "Malformed response: {msg}"),
        }
    }
}

impl std::error::Error for GeocodingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GeocodingError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

impl From<serde_json::Error> for GeocodingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeocodingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_coordinates_display() {
        let err = GeocodingError::InvalidCoordinates(91.0, 10.0);
        assert_eq!(err.to_string(), "Invalid coordinates: 91, 10");
    }

    #[test]
    fn test_malformed_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = GeocodingError::from(json_err);
        assert!(matches!(err, GeocodingError::Malformed(_)));
        assert!(err.to_string().starts_with("Malformed response:"));
    }
}
