//! Wire types for the feedback backend

use chrono::{DateTime, Utc};
use paged_list::{ItemPatch, ListItem, PagedResult};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a feedback case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackStatus {
    Pending,
    InProgress,
    Forwarded,
    Resolved,
    Returned,
    Cancel,
    #[serde(other)]
    Unknown,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Forwarded => "FORWARDED",
            Self::Resolved => "RESOLVED",
            Self::Returned => "RETURNED",
            Self::Cancel => "CANCEL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse a status code, ignoring case
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "IN_PROGRESS" => Self::InProgress,
            "FORWARDED" => Self::Forwarded,
            "RESOLVED" => Self::Resolved,
            "RETURNED" => Self::Returned,
            "CANCEL" => Self::Cancel,
            _ => Self::Unknown,
        }
    }

    /// Spanish label shown to citizens, when one exists
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Pending => Some("Pendiente"),
            Self::Resolved => Some("Resuelto"),
            Self::InProgress => Some("En progreso"),
            Self::Cancel => Some("Cancelado"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    Complaint,
    Suggestion,
    Compliment,
}

impl FeedbackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complaint => "complaint",
            Self::Suggestion => "suggestion",
            Self::Compliment => "compliment",
        }
    }
}

/// A citizen submitted complaint, suggestion or compliment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: FeedbackStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_number: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FeedbackType>,
    #[serde(default)]
    pub contacted: bool,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub date_register: Option<DateTime<Utc>>,
}

impl ListItem for Feedback {
    type Key = str;

    fn key(&self) -> &str {
        &self.id
    }
}

/// Live push sent when a case changes status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    #[serde(alias = "_id", alias = "feedbackId")]
    pub id: String,
    pub status: FeedbackStatus,
}

impl ItemPatch<Feedback> for StatusUpdate {
    fn apply(self, item: &mut Feedback) {
        item.status = self.status;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub dni: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Console account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub is_first_login: Option<bool>,
    #[serde(default)]
    pub personal_data: Option<PersonalData>,
}

impl ListItem for User {
    type Key = str;

    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyContact {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub dni: String,
    #[serde(default)]
    pub phone: String,
}

/// Company cases can be assigned to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub contacts: Vec<CompanyContact>,
}

impl ListItem for Company {
    type Key = str;

    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl ListItem for Role {
    type Key = str;

    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: String,
}

impl ListItem for Permission {
    type Key = str;

    fn key(&self) -> &str {
        &self.id
    }
}

/// Point on the feedback heat map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackGeo {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type", default)]
    pub kind: Option<FeedbackType>,
    #[serde(default)]
    pub status: Option<FeedbackStatus>,
    #[serde(default)]
    pub case_number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Heat map filters; `None` fields are not sent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeoFilters {
    pub kind: Option<FeedbackType>,
    pub status: Option<FeedbackStatus>,
}

/// Paged list envelope returned by every `private/*` listing
#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl<T> From<PageResponse<T>> for PagedResult<T> {
    fn from(page: PageResponse<T>) -> Self {
        PagedResult {
            items: page.data,
            total_count: page.total,
        }
    }
}

/// Count per grouping key in the dashboard aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountById {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDistribution {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub percentage: f64,
}

/// Aggregates shown on the console dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSummary {
    pub total_feedbacks: u64,
    pub feedbacks_by_status: Vec<CountById>,
    pub feedbacks_by_type: Vec<CountById>,
    pub top_companies: Vec<CountById>,
    #[serde(rename = "feedbacksLast7Days")]
    pub feedbacks_last_7_days: Vec<CountById>,
    pub resolution_rate: f64,
    pub avg_resolution_time: f64,
    pub average_feedbacks_per_user: f64,
    pub type_distribution: Vec<TypeDistribution>,
}

/// Account registration payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dni: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Citizen report as collected by the public chat assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub kind: FeedbackType,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Submission day, `YYYY-MM-DD`
    pub date: String,
}

/// Excel exports under `api/private/reports`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Feedbacks,
    FeedbacksByCompany,
}

impl ReportKind {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Feedbacks => "api/private/reports/feedbacks/excel",
            Self::FeedbacksByCompany => "api/private/reports/feedbacks-by-company/excel",
        }
    }
}

/// Report filters; codes are passed through as given
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilters {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
}

impl ReportFilters {
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("startDate", &self.start_date),
            ("endDate", &self.end_date),
            ("type", &self.kind),
            ("status", &self.status),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key, v))
        })
        .collect()
    }
}
