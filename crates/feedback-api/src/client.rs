//! Feedback backend HTTP client

use std::time::Duration;

use paged_list::{PageRequest, PagedResult};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{ApiError, Result};
use crate::types::{
    DashboardSummary, FeedbackGeo, FeedbackSubmission, GeoFilters, PageResponse, ReportFilters,
    ReportKind,
};
use crate::view::{normalize_view_feedback, validate_case_number, ViewFeedback};

/// Paged backend collections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Feedback,
    Users,
    Companies,
    Roles,
    Permissions,
    /// Accounts not yet linked to any company
    NotAssignedUsers,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Feedback => "private/feedback",
            Self::Users => "private/users",
            Self::Companies => "private/companies",
            Self::Roles => "private/roles",
            Self::Permissions => "private/permissions",
            Self::NotAssignedUsers => "auth/users/not-assigned",
        }
    }

    /// Where new records are posted; users register through the auth module
    pub fn create_path(&self) -> Option<&'static str> {
        match self {
            Self::Users => Some("auth/register"),
            Self::Roles | Self::Permissions => Some(self.path()),
            _ => None,
        }
    }

    /// Whether single records can be fetched, patched and deleted
    pub fn has_records(&self) -> bool {
        !matches!(self, Self::NotAssignedUsers)
    }
}

/// Client for the feedback backend REST API
///
/// Every request carries the bearer token when one is configured.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BackendClient {
    /// Create a client with the default 30 second timeout
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %response.url(), "Backend rejected the API token");
        }
        Err(ApiError::Status(status.as_u16()))
    }

    /// Build the listing URL for one page request
    pub fn list_url(&self, resource: Resource, request: &PageRequest) -> String {
        let mut url = format!(
            "{}?page={}&limit={}",
            self.url(resource.path()),
            request.page,
            request.limit
        );
        for (key, value) in request.filters.query_pairs() {
            url.push_str(&format!("&{}={}", key, urlencoding::encode(&value)));
        }
        url
    }

    /// Fetch one page of a collection
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: Resource,
        request: &PageRequest,
    ) -> Result<PagedResult<T>> {
        let url = self.list_url(resource, request);
        let response = self.authorize(self.http.get(&url)).send().await?;
        let page: PageResponse<T> = Self::check(response)?.json().await?;

        debug!(
            resource = resource.path(),
            page = request.page,
            items = page.data.len(),
            total = page.total,
            "Fetched page"
        );
        Ok(page.into())
    }

    /// URL of one record; rejects blank ids and collections without records
    pub fn record_url(&self, resource: Resource, id: &str) -> Result<String> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ApiError::InvalidInput("empty record id".to_string()));
        }
        if !resource.has_records() {
            return Err(ApiError::InvalidInput(format!(
                "{} has no addressable records",
                resource.path()
            )));
        }
        Ok(self.url(&format!(
            "{}/{}",
            resource.path(),
            urlencoding::encode(id)
        )))
    }

    /// Decode a mutation response; an empty body reads as `null`
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = Self::check(response)?.text().await?;
        if body.trim().is_empty() {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch one record of a collection
    pub async fn get<T: DeserializeOwned>(&self, resource: Resource, id: &str) -> Result<T> {
        let url = self.record_url(resource, id)?;
        let response = self.authorize(self.http.get(&url)).send().await?;
        Ok(Self::check(response)?.json().await?)
    }

    pub fn create_url(&self, resource: Resource) -> Result<String> {
        resource
            .create_path()
            .map(|path| self.url(path))
            .ok_or_else(|| {
                ApiError::InvalidInput(format!("{} records cannot be created", resource.path()))
            })
    }

    /// Create a record; users go through registration
    pub async fn create<B, T>(&self, resource: Resource, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.create_url(resource)?;
        let response = self.authorize(self.http.post(&url)).json(body).send().await?;
        debug!(resource = resource.path(), "Created record");
        Self::read_json(response).await
    }

    /// Patch a record with the given fields
    pub async fn update<B, T>(&self, resource: Resource, id: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        if resource == Resource::Feedback {
            return Err(ApiError::InvalidInput(
                "feedback cases are not edited from the console".to_string(),
            ));
        }
        let url = self.record_url(resource, id)?;
        let response = self.authorize(self.http.patch(&url)).json(body).send().await?;
        debug!(resource = resource.path(), id = %id, "Updated record");
        Self::read_json(response).await
    }

    /// Delete one record of a collection
    pub async fn delete(&self, resource: Resource, id: &str) -> Result<()> {
        let url = self.record_url(resource, id)?;
        let response = self.authorize(self.http.delete(&url)).send().await?;
        Self::check(response)?;
        Ok(())
    }

    /// Cancel a feedback case
    pub async fn cancel_feedback(&self, id: &str) -> Result<()> {
        self.delete(Resource::Feedback, id).await
    }

    pub fn dashboard_url(&self) -> String {
        self.url("private/dashboard")
    }

    /// Aggregates for the console dashboard
    pub async fn dashboard(&self) -> Result<DashboardSummary> {
        let response = self
            .authorize(self.http.get(self.dashboard_url()))
            .send()
            .await?;
        Ok(Self::check(response)?.json().await?)
    }

    pub fn contacts_url(&self, company_id: &str) -> Result<String> {
        Ok(format!(
            "{}/contacts",
            self.record_url(Resource::Companies, company_id)?
        ))
    }

    /// Link a person to a company as a contact
    pub async fn add_company_contact(&self, company_id: &str, person_id: &str) -> Result<()> {
        let url = self.contacts_url(company_id)?;
        let body = contact_body(person_id)?;
        let response = self.authorize(self.http.post(&url)).json(&body).send().await?;
        Self::check(response)?;
        Ok(())
    }

    /// Unlink a contact from a company
    pub async fn remove_company_contact(&self, company_id: &str, person_id: &str) -> Result<()> {
        let url = self.contacts_url(company_id)?;
        let body = contact_body(person_id)?;
        let response = self.authorize(self.http.patch(&url)).json(&body).send().await?;
        Self::check(response)?;
        Ok(())
    }

    pub fn report_url(&self, kind: ReportKind, filters: &ReportFilters) -> String {
        let params: Vec<String> = filters
            .query_pairs()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect();

        let mut url = self.url(kind.path());
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }
        url
    }

    /// Download an Excel report as raw bytes
    pub async fn download_report(&self, kind: ReportKind, filters: &ReportFilters) -> Result<Vec<u8>> {
        let url = self.report_url(kind, filters);
        let response = self.authorize(self.http.get(&url)).send().await?;
        let bytes = Self::check(response)?.bytes().await?;
        debug!(report = kind.path(), size = bytes.len(), "Downloaded report");
        Ok(bytes.to_vec())
    }

    /// Post a citizen report to the intake webhook. The session token is
    /// not forwarded to it.
    pub async fn submit_feedback(
        &self,
        webhook_url: &str,
        submission: &FeedbackSubmission,
    ) -> Result<()> {
        if submission.description.trim().is_empty() {
            return Err(ApiError::InvalidInput("empty feedback description".to_string()));
        }
        let response = self.http.post(webhook_url).json(submission).send().await?;
        Self::check(response)?;
        Ok(())
    }

    pub fn geo_url(&self, filters: &GeoFilters) -> String {
        let mut params = Vec::new();
        if let Some(kind) = filters.kind {
            params.push(format!("type={}", kind.as_str()));
        }
        if let Some(status) = filters.status {
            params.push(format!("status={}", status.as_str()));
        }

        let mut url = self.url("feedbacks/geo");
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }
        url
    }

    /// Feedback locations for the heat map
    pub async fn feedback_geo(&self, filters: &GeoFilters) -> Result<Vec<FeedbackGeo>> {
        let url = self.geo_url(filters);
        let response = self.authorize(self.http.get(&url)).send().await?;
        Ok(Self::check(response)?.json().await?)
    }

    /// Public case lookup by case number; `None` when the case does not exist
    pub async fn view_feedback(&self, case_number: &str) -> Result<Option<ViewFeedback>> {
        let case_number = validate_case_number(case_number)?;
        let url = self.url("public/feedback/view-feedback");

        let response = self
            .http
            .post(&url)
            .json(&json!({ "caseNumber": case_number }))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: Value = Self::check(response)?.json().await?;

        Ok(normalize_view_feedback(&body, case_number, &self.base_url))
    }
}

fn contact_body(person_id: &str) -> Result<Value> {
    let person_id = person_id.trim();
    if person_id.is_empty() {
        return Err(ApiError::InvalidInput("empty person id".to_string()));
    }
    Ok(json!({ "personId": person_id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FeedbackStatus, FeedbackType};
    use paged_list::{ListFilters, PageWindow, StatusFilter};

    fn client() -> BackendClient {
        BackendClient::new("https://api.example.com/", Some("t0ken".to_string())).unwrap()
    }

    #[test]
    fn test_list_url_without_filters() {
        let request = PageRequest::new(PageWindow::new(20, 10), ListFilters::default());
        assert_eq!(
            client().list_url(Resource::Users, &request),
            "https://api.example.com/private/users?page=3&limit=10"
        );
    }

    #[test]
    fn test_list_url_with_filters() {
        let filters = ListFilters::default()
            .with_search(" Av. Amazonas ")
            .with_status(StatusFilter::parse("ACT"));
        let request = PageRequest::new(PageWindow::first(25), filters);
        assert_eq!(
            client().list_url(Resource::Roles, &request),
            "https://api.example.com/private/roles?page=1&limit=25&search=Av.%20Amazonas&status=ACT"
        );
    }

    #[test]
    fn test_list_url_omits_all_status() {
        let filters = ListFilters::default().with_status(StatusFilter::parse("ALL"));
        let request = PageRequest::new(PageWindow::default(), filters);
        assert!(!client()
            .list_url(Resource::Permissions, &request)
            .contains("status="));
    }

    #[test]
    fn test_geo_url() {
        let c = client();
        assert_eq!(
            c.geo_url(&GeoFilters::default()),
            "https://api.example.com/feedbacks/geo"
        );
        let filters = GeoFilters {
            kind: Some(FeedbackType::Suggestion),
            status: Some(FeedbackStatus::InProgress),
        };
        assert_eq!(
            c.geo_url(&filters),
            "https://api.example.com/feedbacks/geo?type=suggestion&status=IN_PROGRESS"
        );
    }

    #[test]
    fn test_record_and_create_urls() {
        let c = client();
        assert_eq!(
            c.record_url(Resource::Roles, " r1 ").unwrap(),
            "https://api.example.com/private/roles/r1"
        );
        assert_eq!(
            c.create_url(Resource::Users).unwrap(),
            "https://api.example.com/auth/register"
        );
        assert_eq!(
            c.create_url(Resource::Permissions).unwrap(),
            "https://api.example.com/private/permissions"
        );
        assert!(matches!(
            c.create_url(Resource::Feedback),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(c.record_url(Resource::NotAssignedUsers, "u1").is_err());
    }

    #[test]
    fn test_not_assigned_users_list_url() {
        let request = PageRequest::new(PageWindow::first(10), ListFilters::default());
        assert_eq!(
            client().list_url(Resource::NotAssignedUsers, &request),
            "https://api.example.com/auth/users/not-assigned?page=1&limit=10"
        );
    }

    #[test]
    fn test_dashboard_and_contacts_urls() {
        let c = client();
        assert_eq!(c.dashboard_url(), "https://api.example.com/private/dashboard");
        assert_eq!(
            c.contacts_url("c 1").unwrap(),
            "https://api.example.com/private/companies/c%201/contacts"
        );
        assert!(c.contacts_url("").is_err());
    }

    #[test]
    fn test_report_url() {
        let c = client();
        assert_eq!(
            c.report_url(ReportKind::Feedbacks, &ReportFilters::default()),
            "https://api.example.com/api/private/reports/feedbacks/excel"
        );
        let filters = ReportFilters {
            start_date: Some("2025-01-01T00:00:00Z".to_string()),
            status: Some("IN_PROGRESS".to_string()),
            ..Default::default()
        };
        assert_eq!(
            c.report_url(ReportKind::FeedbacksByCompany, &filters),
            "https://api.example.com/api/private/reports/feedbacks-by-company/excel?startDate=2025-01-01T00%3A00%3A00Z&status=IN_PROGRESS"
        );
    }

    #[test]
    fn test_contact_body() {
        assert_eq!(contact_body(" p1 ").unwrap(), json!({"personId": "p1"}));
        assert!(matches!(contact_body(" "), Err(ApiError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_feedback() {
        let err = client()
            .update::<_, Value>(Resource::Feedback, "f1", &json!({"status": "RESOLVED"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_description() {
        let submission = FeedbackSubmission {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            kind: FeedbackType::Complaint,
            description: "  ".to_string(),
            latitude: None,
            longitude: None,
            date: "2025-03-01".to_string(),
        };
        let err = client()
            .submit_feedback("https://hooks.example.com/feedback", &submission)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_delete_rejects_empty_id() {
        let err = client().delete(Resource::Companies, "  ").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_view_feedback_rejects_bad_case_number() {
        let err = client().view_feedback("ab").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }
}
