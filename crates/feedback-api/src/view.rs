//! Public case lookup: normalization of the view-feedback response
//!
//! The backend has answered this endpoint with several body shapes over
//! time. Each logical field is read through a fixed, ordered list of
//! candidate keys; nothing outside those rules is picked up.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};
use crate::types::FeedbackStatus;

static CASE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").unwrap());

const MIN_CASE_NUMBER_LEN: usize = 5;

/// Envelope keys tried, in order, before reading the body itself
const ENVELOPE_KEYS: &[&str] = &["data", "feedback"];

const PHONE_KEYS: &[&str] = &["phone", "telephone", "mobile"];
const DESCRIPTION_KEYS: &[&str] = &["description", "detail", "message"];
const ADDRESS_KEYS: &[&str] = &["address", "addressLine", "location"];
const DATE_KEYS: &[&str] = &["dateRegister", "createdAt", "updatedAt"];
const ATTACHMENT_KEYS: &[&str] = &["attachment", "image", "attachmentUrl"];
const ATTACHMENT_URL_KEYS: &[&str] = &["url", "path", "secure_url", "location"];

/// Address object keys, in display order
const ADDRESS_PARTS: &[&str] = &[
    "addressLine",
    "streetA",
    "streetB",
    "district",
    "city",
    "state",
    "province",
    "country",
    "postalCode",
    "zipCode",
    "reference",
];

/// A case as shown on the public lookup page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewFeedback {
    pub case_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub date_register: Option<String>,
    pub status: Option<String>,
    pub attachment_url: Option<String>,
}

impl ViewFeedback {
    pub fn full_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_str(), self.last_name.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            "Nombre no disponible".to_string()
        } else {
            parts.join(" ")
        }
    }

    pub fn initials(&self) -> String {
        let initials: String = [self.first_name.as_str(), self.last_name.as_str()]
            .into_iter()
            .filter_map(|s| s.trim().chars().next())
            .collect::<String>()
            .to_uppercase();
        if initials.is_empty() {
            "FB".to_string()
        } else {
            initials
        }
    }

    /// Spanish status label; unknown codes are shown as sent
    pub fn status_label(&self) -> String {
        match self.status.as_deref() {
            None => "Sin estado".to_string(),
            Some(code) => FeedbackStatus::from_code(code)
                .label()
                .map(str::to_string)
                .unwrap_or_else(|| code.to_string()),
        }
    }

    /// Registration date as RFC 3339 UTC, or the raw text when unparseable
    pub fn registered_at(&self) -> Option<std::result::Result<DateTime<Utc>, &str>> {
        self.date_register.as_deref().map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|_| raw)
        })
    }
}

/// Trim and check a case number before it is sent anywhere
pub fn validate_case_number(case_number: &str) -> Result<&str> {
    let case_number = case_number.trim();
    if case_number.len() < MIN_CASE_NUMBER_LEN {
        return Err(ApiError::InvalidInput(format!(
            "case number must have at least {MIN_CASE_NUMBER_LEN} characters"
        )));
    }
    if !CASE_NUMBER_RE.is_match(case_number) {
        return Err(ApiError::InvalidInput(
            "case number may only contain letters, digits and dashes".to_string(),
        ));
    }
    Ok(case_number)
}

/// Normalize a view-feedback body; `None` when it holds no record object
pub fn normalize_view_feedback(
    body: &Value,
    fallback_case_number: &str,
    base_url: &str,
) -> Option<ViewFeedback> {
    let record = unwrap_envelope(body.as_object()?);

    Some(ViewFeedback {
        case_number: text(record.get("caseNumber"))
            .unwrap_or_else(|| fallback_case_number.to_string()),
        first_name: text(record.get("firstName")).unwrap_or_default(),
        last_name: text(record.get("lastName")).unwrap_or_default(),
        email: text(record.get("email")),
        phone: first_text(record, PHONE_KEYS),
        description: first_text(record, DESCRIPTION_KEYS),
        address: first_present(record, ADDRESS_KEYS).and_then(compose_address),
        date_register: first_text(record, DATE_KEYS),
        status: text(record.get("status")).map(|s| s.to_uppercase()),
        attachment_url: first_present(record, ATTACHMENT_KEYS)
            .and_then(|raw| attachment_url(raw, base_url)),
    })
}

fn unwrap_envelope(body: &Map<String, Value>) -> &Map<String, Value> {
    ENVELOPE_KEYS
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_object))
        .unwrap_or(body)
}

/// First candidate key whose value is neither missing nor null
fn first_present<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

fn first_text(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    text(first_present(record, keys))
}

/// Scalars as display text; blank strings and structured values are absent
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn push_unique(parts: &mut Vec<String>, part: String) {
    if !parts.contains(&part) {
        parts.push(part);
    }
}

fn compose_address(raw: &Value) -> Option<String> {
    let mut parts = Vec::new();
    match raw {
        Value::String(_) => return text(Some(raw)),
        Value::Array(items) => {
            for item in items {
                if let Some(part) = text(Some(item)) {
                    push_unique(&mut parts, part);
                }
            }
        }
        Value::Object(fields) => {
            for key in ADDRESS_PARTS {
                if let Some(part) = text(fields.get(*key)) {
                    push_unique(&mut parts, part);
                }
            }
        }
        _ => return None,
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn attachment_url(raw: &Value, base_url: &str) -> Option<String> {
    let url = match raw {
        Value::String(_) => text(Some(raw)),
        Value::Object(fields) => first_text(fields, ATTACHMENT_URL_KEYS),
        _ => None,
    }?;
    Some(ensure_absolute(&url, base_url))
}

fn ensure_absolute(url: &str, base_url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else if url.starts_with('/') {
        format!("{base_url}{url}")
    } else {
        format!("{base_url}/{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://api.example.com";

    #[test]
    fn test_unwraps_data_envelope() {
        let body = json!({
            "data": {
                "caseNumber": "QJ-2025-0001",
                "firstName": " Ana ",
                "lastName": "Mora",
                "telephone": "0999999999",
                "detail": "Luminaria dañada",
                "createdAt": "2025-03-01T15:04:05Z",
                "status": "in_progress"
            }
        });
        let view = normalize_view_feedback(&body, "QJ-FALLBACK", BASE).unwrap();
        assert_eq!(view.case_number, "QJ-2025-0001");
        assert_eq!(view.first_name, "Ana");
        assert_eq!(view.phone.as_deref(), Some("0999999999"));
        assert_eq!(view.description.as_deref(), Some("Luminaria dañada"));
        assert_eq!(view.date_register.as_deref(), Some("2025-03-01T15:04:05Z"));
        assert_eq!(view.status.as_deref(), Some("IN_PROGRESS"));
        assert_eq!(view.status_label(), "En progreso");
        assert!(matches!(view.registered_at(), Some(Ok(_))));
    }

    #[test]
    fn test_feedback_envelope_and_fallback_case_number() {
        let body = json!({ "feedback": { "firstName": "Luis", "phone": 5551234 } });
        let view = normalize_view_feedback(&body, "QJ-77777", BASE).unwrap();
        assert_eq!(view.case_number, "QJ-77777");
        assert_eq!(view.phone.as_deref(), Some("5551234"));
        assert_eq!(view.status, None);
        assert_eq!(view.status_label(), "Sin estado");
    }

    #[test]
    fn test_non_object_body() {
        assert!(normalize_view_feedback(&json!("not found"), "QJ-77777", BASE).is_none());
    }

    #[test]
    fn test_candidate_order_skips_null() {
        let body = json!({ "phone": null, "telephone": "", "mobile": "0988" });
        let view = normalize_view_feedback(&body, "QJ-77777", BASE).unwrap();
        // Blank telephone is present, so mobile is never consulted.
        assert_eq!(view.phone, None);
    }

    #[test]
    fn test_address_object_in_display_order() {
        let body = json!({
            "address": {
                "country": "Ecuador",
                "streetA": "Av. Amazonas",
                "city": "Quito",
                "streetB": "Av. Patria",
                "province": "Quito",
                "unrelated": "ignored"
            }
        });
        let view = normalize_view_feedback(&body, "QJ-77777", BASE).unwrap();
        assert_eq!(
            view.address.as_deref(),
            Some("Av. Amazonas, Av. Patria, Quito, Ecuador")
        );
    }

    #[test]
    fn test_address_object_without_known_keys() {
        let body = json!({ "address": { "foo": "bar" } });
        let view = normalize_view_feedback(&body, "QJ-77777", BASE).unwrap();
        assert_eq!(view.address, None);
    }

    #[test]
    fn test_address_array_dedupes() {
        let body = json!({ "location": ["Av. 10 de Agosto", "Quito", "Quito", null] });
        let view = normalize_view_feedback(&body, "QJ-77777", BASE).unwrap();
        assert_eq!(view.address.as_deref(), Some("Av. 10 de Agosto, Quito"));
    }

    #[test]
    fn test_attachment_urls() {
        let relative = json!({ "attachment": "/uploads/a.jpg" });
        let view = normalize_view_feedback(&relative, "QJ-77777", BASE).unwrap();
        assert_eq!(
            view.attachment_url.as_deref(),
            Some("https://api.example.com/uploads/a.jpg")
        );

        let object = json!({ "image": { "secure_url": "HTTPS://cdn.example.com/b.png" } });
        let view = normalize_view_feedback(&object, "QJ-77777", BASE).unwrap();
        assert_eq!(
            view.attachment_url.as_deref(),
            Some("HTTPS://cdn.example.com/b.png")
        );

        let bare = json!({ "attachmentUrl": "files/c.pdf" });
        let view = normalize_view_feedback(&bare, "QJ-77777", BASE).unwrap();
        assert_eq!(
            view.attachment_url.as_deref(),
            Some("https://api.example.com/files/c.pdf")
        );
    }

    #[test]
    fn test_names() {
        let view = normalize_view_feedback(&json!({}), "QJ-77777", BASE).unwrap();
        assert_eq!(view.full_name(), "Nombre no disponible");
        assert_eq!(view.initials(), "FB");

        let view =
            normalize_view_feedback(&json!({"firstName": "ana", "lastName": "mora"}), "QJ-77777", BASE)
                .unwrap();
        assert_eq!(view.full_name(), "ana mora");
        assert_eq!(view.initials(), "AM");
    }

    #[test]
    fn test_validate_case_number() {
        assert_eq!(validate_case_number("  QJ-2025-1 ").unwrap(), "QJ-2025-1");
        assert!(validate_case_number("QJ-1").is_err());
        assert!(validate_case_number("QJ 2025 1").is_err());
    }
}
