use std::env;

use paged_list::DEFAULT_PAGE_SIZE;

const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";
const DEFAULT_GEOCODING_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const DEFAULT_GEOCODING_LANGUAGE: &str = "es";

/// Console configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub api_token: Option<String>,
    pub google_maps_api_key: Option<String>,
    pub geocoding_url: String,
    pub geocoding_language: String,
    /// socket.io origin; the backend itself unless overridden
    pub notifications_url: String,
    pub page_size: u32,
    /// Intake endpoint for citizen submissions
    pub feedback_webhook_url: Option<String>,
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend_url = non_empty("BACKEND_URL")
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let notifications_url = non_empty("NOTIFICATIONS_URL").unwrap_or_else(|| backend_url.clone());

        let page_size = non_empty("PAGE_SIZE")
            .and_then(|s| s.trim().parse().ok())
            .filter(|&n: &u32| n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self {
            backend_url,
            api_token: non_empty("API_TOKEN"),
            google_maps_api_key: non_empty("GOOGLE_MAPS_API_KEY"),
            geocoding_url: non_empty("GEOCODING_URL")
                .unwrap_or_else(|| DEFAULT_GEOCODING_URL.to_string()),
            geocoding_language: non_empty("GEOCODING_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_GEOCODING_LANGUAGE.to_string()),
            notifications_url,
            page_size,
            feedback_webhook_url: non_empty("FEEDBACK_WEBHOOK_URL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.backend_url, "http://localhost:3000");
        assert_eq!(config.notifications_url, "http://localhost:3000");
        assert_eq!(config.geocoding_language, "es");
        assert_eq!(config.page_size, 10);
        assert!(config.api_token.is_none());
        assert!(config.google_maps_api_key.is_none());
        assert!(config.feedback_webhook_url.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BACKEND_URL", "https://api.example.com/"),
            ("API_TOKEN", "t0ken"),
            ("NOTIFICATIONS_URL", "https://live.example.com"),
            ("PAGE_SIZE", "25"),
            ("GEOCODING_LANGUAGE", "en"),
            ("FEEDBACK_WEBHOOK_URL", "https://hooks.example.com/feedback"),
        ]);
        assert_eq!(config.backend_url, "https://api.example.com");
        assert_eq!(config.api_token.as_deref(), Some("t0ken"));
        assert_eq!(config.notifications_url, "https://live.example.com");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.geocoding_language, "en");
        assert_eq!(
            config.feedback_webhook_url.as_deref(),
            Some("https://hooks.example.com/feedback")
        );
    }

    #[test]
    fn test_bad_page_size_falls_back() {
        assert_eq!(config_from(&[("PAGE_SIZE", "many")]).page_size, 10);
        assert_eq!(config_from(&[("PAGE_SIZE", "0")]).page_size, 10);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config_from(&[("API_TOKEN", "  "), ("BACKEND_URL", "")]);
        assert!(config.api_token.is_none());
        assert_eq!(config.backend_url, "http://localhost:3000");
    }
}
