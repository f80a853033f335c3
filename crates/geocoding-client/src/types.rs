use serde::Deserialize;

/// Google Geocoding API response envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub status: String,
}

/// One candidate address match
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    #[serde(default)]
    pub geometry: Geometry,
}

impl GeocodeResult {
    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }

    /// True when any address component is tagged `tag`
    pub fn has_component(&self, tag: &str) -> bool {
        self.address_components.iter().any(|c| c.has_type(tag))
    }

    /// Long name of the first non-blank component tagged `tag`
    pub fn component(&self, tag: &str) -> Option<&str> {
        self.address_components
            .iter()
            .filter(|c| c.has_type(tag))
            .map(|c| c.long_name.trim())
            .find(|name| !name.is_empty())
    }

    /// Non-blank long names of every component tagged `tag`, in response order
    pub fn components(&self, tag: &str) -> Vec<&str> {
        self.address_components
            .iter()
            .filter(|c| c.has_type(tag))
            .map(|c| c.long_name.trim())
            .filter(|name| !name.is_empty())
            .collect()
    }

    pub fn location_type(&self) -> LocationType {
        self.geometry.location_type
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressComponent {
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub location_type: LocationType,
}

/// Precision of the matched location
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Rooftop,
    RangeInterpolated,
    GeometricCenter,
    Approximate,
    #[default]
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_google_result() {
        let json = r#"{
            "status": "OK",
            "results": [{
                "formatted_address": "Av. Amazonas 123, Quito, Ecuador",
                "types": ["street_address"],
                "geometry": { "location_type": "ROOFTOP" },
                "address_components": [
                    { "long_name": "123", "short_name": "123", "types": ["street_number"] },
                    { "long_name": "Av. Amazonas", "short_name": "Av. Amazonas", "types": ["route"] }
                ]
            }]
        }"#;

        let resp: GeocodeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "OK");
        let result = &resp.results[0];
        assert!(result.has_type("street_address"));
        assert_eq!(result.location_type(), LocationType::Rooftop);
        assert_eq!(result.component("street_number"), Some("123"));
        assert_eq!(result.components("route"), vec!["Av. Amazonas"]);
    }

    #[test]
    fn test_missing_fields_decode_empty() {
        let resp: GeocodeResponse = serde_json::from_str(r#"{"results":[{}]}"#).unwrap();
        let result = &resp.results[0];
        assert!(result.formatted_address.is_none());
        assert!(result.types.is_empty());
        assert!(!result.has_component("route"));
        assert_eq!(result.location_type(), LocationType::Unknown);
    }

    #[test]
    fn test_unrecognized_location_type() {
        let geometry: Geometry =
            serde_json::from_str(r#"{"location_type":"SOMETHING_NEW"}"#).unwrap();
        assert_eq!(geometry.location_type, LocationType::Unknown);
    }
}
