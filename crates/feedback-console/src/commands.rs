//! Subcommand implementations

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use feedback_api::{
    decode_claims, BackendClient, Feedback, FeedbackStatus, FeedbackSubmission, GeoFilters,
    NewUser, ReportFilters, ReportKind, Resource, ResourceSource, StatusUpdate, ViewFeedback,
};
use feedback_live::{LiveConfig, LiveEvent, LiveSubscription};
use geocoding_client::{AddressResolver, GoogleGeocoder};
use paged_list::{
    ListFilters, ListNotice, ListState, PageSource, PageWindow, PagedListController, StatusFilter,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::cli::KindArg;
use crate::config::Config;
use crate::error::{ConsoleError, Result};

const STATUS_UPDATED: &str = "statusUpdated";

fn backend(config: &Config) -> Result<Arc<BackendClient>> {
    Ok(Arc::new(BackendClient::new(
        &config.backend_url,
        config.api_token.clone(),
    )?))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn list_filters(search: Option<&str>, status: Option<&str>) -> ListFilters {
    let mut filters = ListFilters::default();
    if let Some(search) = search {
        filters = filters.with_search(search);
    }
    if let Some(status) = status {
        filters = filters.with_status(StatusFilter::parse(status));
    }
    filters
}

pub async fn resolve(config: &Config, lat: f64, lng: f64) -> Result<()> {
    let api_key = config
        .google_maps_api_key
        .as_deref()
        .ok_or_else(|| ConsoleError::Config("GOOGLE_MAPS_API_KEY is required".to_string()))?;

    let geocoder =
        GoogleGeocoder::with_base_url(&config.geocoding_url, api_key, &config.geocoding_language)?;
    let resolver = AddressResolver::new(geocoder);

    println!("{}", resolver.resolve(lat, lng).await);
    Ok(())
}

/// Load one window and surface a failed load as an error
async fn load_window<T, S>(
    controller: &PagedListController<T, S>,
    window: PageWindow,
) -> Result<ListState<T>>
where
    T: Clone + Send + Sync,
    S: PageSource<T>,
{
    let mut notices = controller.subscribe();
    controller.load_page(window).await;

    if let Ok(ListNotice::LoadFailed { error, .. }) = notices.try_recv() {
        return Err(error.into());
    }
    Ok(controller.snapshot().await)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageOutput<'a, T> {
    resource: &'static str,
    page: u64,
    page_size: u32,
    total_count: u64,
    items: &'a [T],
}

async fn print_page<T>(
    client: Arc<BackendClient>,
    resource: Resource,
    window: PageWindow,
    filters: ListFilters,
) -> Result<()>
where
    T: DeserializeOwned + Serialize + Clone + Send + Sync,
{
    let controller =
        PagedListController::with_filters(ResourceSource::<T>::new(client, resource), filters);
    let state = load_window(&controller, window).await?;

    print_json(&PageOutput {
        resource: resource.path(),
        page: window.page_number(),
        page_size: window.page_size(),
        total_count: state.total_count,
        items: &state.items,
    })
}

pub async fn list(
    config: &Config,
    resource: Resource,
    window: PageWindow,
    filters: ListFilters,
) -> Result<()> {
    let client = backend(config)?;
    match resource {
        Resource::Feedback => print_page::<Feedback>(client, resource, window, filters).await,
        Resource::Users => print_page::<feedback_api::User>(client, resource, window, filters).await,
        Resource::Companies => {
            print_page::<feedback_api::Company>(client, resource, window, filters).await
        }
        Resource::Roles => print_page::<feedback_api::Role>(client, resource, window, filters).await,
        Resource::Permissions => {
            print_page::<feedback_api::Permission>(client, resource, window, filters).await
        }
        Resource::NotAssignedUsers => {
            print_page::<feedback_api::User>(client, resource, window, filters).await
        }
    }
}

/// Merge one live event into the displayed feedback page.
///
/// Returns the id of the reconciled row, if any.
pub async fn apply_live_event<S>(
    controller: &PagedListController<Feedback, S>,
    event: LiveEvent,
) -> Option<String>
where
    S: PageSource<Feedback>,
{
    match event {
        LiveEvent::Connected => info!("Live updates connected"),
        LiveEvent::Disconnected => warn!("Live updates disconnected"),
        LiveEvent::Error(e) => error!(error = %e, "Live updates error"),
        LiveEvent::Message { event, payload } => {
            let update: StatusUpdate = match serde_json::from_value(payload) {
                Ok(update) => update,
                Err(e) => {
                    warn!(event = %event, error = %e, "Ignoring unreadable status push");
                    return None;
                }
            };

            let id = update.id.clone();
            let status = update.status;
            if controller.apply_remote_item_update(id.as_str(), update).await {
                info!(
                    id = %id,
                    status = status.as_str(),
                    label = status.label().unwrap_or("-"),
                    "Feedback status updated"
                );
                return Some(id);
            }
            debug!(id = %id, "Status push for a case not on this page");
        }
    }
    None
}

pub async fn watch(config: &Config, page_size: u32, filters: ListFilters) -> Result<()> {
    let client = backend(config)?;
    let controller = PagedListController::with_filters(
        ResourceSource::<Feedback>::new(client, Resource::Feedback),
        filters,
    );

    let state = load_window(&controller, PageWindow::first(page_size)).await?;
    info!(
        shown = state.items.len(),
        total = state.total_count,
        "Watching feedback page"
    );

    let mut live = LiveConfig::new(config.notifications_url.as_str()).with_events([STATUS_UPDATED]);
    if let Some(ref token) = config.api_token {
        live = live.with_token(token);
    }

    let (event_tx, mut event_rx) = mpsc::channel::<LiveEvent>(100);
    let subscription = tokio::spawn(async move {
        let mut subscription = LiveSubscription::new(live, event_tx);
        subscription.run().await
    });

    loop {
        tokio::select! {
            event = event_rx.recv() => match event {
                Some(event) => {
                    apply_live_event(&controller, event).await;
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping live updates");
                subscription.abort();
                return Ok(());
            }
        }
    }

    match subscription.await {
        Ok(result) => Ok(result?),
        Err(e) => {
            error!(error = %e, "Live subscription task failed");
            Ok(())
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewOutput<'a> {
    full_name: String,
    initials: String,
    status_label: String,
    #[serde(flatten)]
    feedback: &'a ViewFeedback,
}

pub async fn view(config: &Config, case_number: &str) -> Result<()> {
    let client = backend(config)?;
    match client.view_feedback(case_number).await? {
        Some(feedback) => print_json(&ViewOutput {
            full_name: feedback.full_name(),
            initials: feedback.initials(),
            status_label: feedback.status_label(),
            feedback: &feedback,
        }),
        None => {
            warn!(case_number = %case_number.trim(), "Case not found");
            Ok(())
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenOutput<'a> {
    expires_at: Option<String>,
    expired: bool,
    claims: &'a feedback_api::TokenClaims,
}

pub fn token(config: &Config, token: Option<&str>) -> Result<()> {
    let token = token
        .or(config.api_token.as_deref())
        .ok_or_else(|| ConsoleError::Config("no token given and API_TOKEN is unset".to_string()))?;

    let claims = decode_claims(token)?;
    print_json(&TokenOutput {
        expires_at: claims.expires_at().map(|t| t.to_rfc3339()),
        expired: claims.is_expired(Utc::now()),
        claims: &claims,
    })
}

pub async fn cancel(config: &Config, id: &str) -> Result<()> {
    backend(config)?.cancel_feedback(id).await?;
    info!(id = %id, "Feedback cancelled");
    Ok(())
}

pub fn geo_filters(kind: Option<KindArg>, status: Option<&str>) -> Result<GeoFilters> {
    let status = match status {
        None => None,
        Some(code) => match FeedbackStatus::from_code(code) {
            FeedbackStatus::Unknown => {
                return Err(ConsoleError::Usage(format!("unknown status: {}", code)))
            }
            status => Some(status),
        },
    };
    Ok(GeoFilters {
        kind: kind.map(Into::into),
        status,
    })
}

pub async fn geo(config: &Config, filters: GeoFilters) -> Result<()> {
    let points = backend(config)?.feedback_geo(&filters).await?;
    info!(points = points.len(), "Fetched heat map points");
    print_json(&points)
}

pub async fn dashboard(config: &Config) -> Result<()> {
    let summary = backend(config)?.dashboard().await?;
    info!(total = summary.total_feedbacks, "Fetched dashboard");
    print_json(&summary)
}

/// Parse a `--data` body; it must be a JSON object
pub fn parse_body(data: &str) -> Result<Value> {
    match serde_json::from_str::<Value>(data) {
        Ok(body @ Value::Object(_)) => Ok(body),
        Ok(_) => Err(ConsoleError::Usage("--data must be a JSON object".to_string())),
        Err(e) => Err(ConsoleError::Usage(format!("--data is not valid JSON: {}", e))),
    }
}

pub async fn create(config: &Config, resource: Resource, data: &str) -> Result<()> {
    let body = parse_body(data)?;
    let client = backend(config)?;
    let created: Value = if resource == Resource::Users {
        let user: NewUser = serde_json::from_value(body)
            .map_err(|e| ConsoleError::Usage(format!("invalid user: {}", e)))?;
        client.create(resource, &user).await?
    } else {
        client.create(resource, &body).await?
    };
    info!(resource = resource.path(), "Record created");
    print_json(&created)
}

pub async fn update(config: &Config, resource: Resource, id: &str, data: &str) -> Result<()> {
    let body = parse_body(data)?;
    let updated: Value = backend(config)?.update(resource, id, &body).await?;
    info!(resource = resource.path(), id = %id, "Record updated");
    print_json(&updated)
}

pub async fn add_contact(config: &Config, company_id: &str, person_id: &str) -> Result<()> {
    backend(config)?
        .add_company_contact(company_id, person_id)
        .await?;
    info!(company = %company_id, person = %person_id, "Contact added");
    Ok(())
}

pub async fn remove_contact(config: &Config, company_id: &str, person_id: &str) -> Result<()> {
    backend(config)?
        .remove_company_contact(company_id, person_id)
        .await?;
    info!(company = %company_id, person = %person_id, "Contact removed");
    Ok(())
}

pub async fn report(
    config: &Config,
    kind: ReportKind,
    filters: ReportFilters,
    out: &Path,
) -> Result<()> {
    let bytes = backend(config)?.download_report(kind, &filters).await?;
    tokio::fs::write(out, &bytes)
        .await
        .map_err(|e| ConsoleError::Output(format!("{}: {}", out.display(), e)))?;
    info!(path = %out.display(), size = bytes.len(), "Report saved");
    Ok(())
}

pub async fn submit(config: &Config, submission: FeedbackSubmission) -> Result<()> {
    let webhook_url = config
        .feedback_webhook_url
        .as_deref()
        .ok_or_else(|| ConsoleError::Config("FEEDBACK_WEBHOOK_URL is required".to_string()))?;
    backend(config)?
        .submit_feedback(webhook_url, &submission)
        .await?;
    info!(kind = submission.kind.as_str(), "Feedback submitted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedback_api::FeedbackType;
    use paged_list::{PageRequest, PagedResult};
    use serde_json::json;

    struct FixedSource(Vec<Feedback>);

    impl PageSource<Feedback> for FixedSource {
        async fn fetch_page(&self, _request: &PageRequest) -> paged_list::Result<PagedResult<Feedback>> {
            Ok(PagedResult {
                items: self.0.clone(),
                total_count: self.0.len() as u64,
            })
        }
    }

    fn feedback(id: &str, status: &str) -> Feedback {
        serde_json::from_value(json!({"_id": id, "status": status, "firstName": "Ana"})).unwrap()
    }

    async fn loaded_controller() -> PagedListController<Feedback, FixedSource> {
        let controller = PagedListController::new(FixedSource(vec![
            feedback("a", "PENDING"),
            feedback("b", "PENDING"),
        ]));
        controller.load_page(PageWindow::first(10)).await;
        controller
    }

    #[tokio::test]
    async fn test_status_push_updates_row_in_place() {
        let controller = loaded_controller().await;
        let event = LiveEvent::Message {
            event: STATUS_UPDATED.to_string(),
            payload: json!({"id": "b", "status": "RESOLVED"}),
        };

        assert_eq!(apply_live_event(&controller, event).await.as_deref(), Some("b"));
        let items = controller.items().await;
        assert_eq!(items[0].status, FeedbackStatus::Pending);
        assert_eq!(items[1].id, "b");
        assert_eq!(items[1].status, FeedbackStatus::Resolved);
        assert_eq!(items[1].first_name, "Ana");
    }

    #[tokio::test]
    async fn test_push_for_unknown_case_changes_nothing() {
        let controller = loaded_controller().await;
        let before = controller.items().await;
        let event = LiveEvent::Message {
            event: STATUS_UPDATED.to_string(),
            payload: json!({"id": "zzz", "status": "CANCEL"}),
        };

        assert_eq!(apply_live_event(&controller, event).await, None);
        assert_eq!(controller.items().await, before);
    }

    #[tokio::test]
    async fn test_unreadable_push_is_ignored() {
        let controller = loaded_controller().await;
        let event = LiveEvent::Message {
            event: STATUS_UPDATED.to_string(),
            payload: json!("Caso actualizado"),
        };
        assert_eq!(apply_live_event(&controller, event).await, None);
        assert_eq!(apply_live_event(&controller, LiveEvent::Connected).await, None);
    }

    #[tokio::test]
    async fn test_load_window_surfaces_failure() {
        struct Down;
        impl PageSource<Feedback> for Down {
            async fn fetch_page(
                &self,
                _request: &PageRequest,
            ) -> paged_list::Result<PagedResult<Feedback>> {
                Err(paged_list::ListError::Status(503))
            }
        }

        let controller = PagedListController::new(Down);
        let err = load_window(&controller, PageWindow::first(10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::List(paged_list::ListError::Status(503))
        ));
    }

    #[test]
    fn test_list_filters() {
        let filters = list_filters(Some("bache"), Some("all"));
        assert_eq!(filters.search.as_deref(), Some("bache"));
        assert_eq!(filters.status, StatusFilter::All);
        assert!(list_filters(None, None).is_empty());
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(
            parse_body(r#"{"name":"Supervisor"}"#).unwrap()["name"],
            "Supervisor"
        );
        assert!(matches!(parse_body("[1]"), Err(ConsoleError::Usage(_))));
        assert!(matches!(parse_body("{name"), Err(ConsoleError::Usage(_))));
    }

    #[tokio::test]
    async fn test_submit_requires_webhook() {
        let mut config = Config::from_env();
        config.feedback_webhook_url = None;
        let submission = FeedbackSubmission {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            kind: FeedbackType::Suggestion,
            description: "Más luminarias".to_string(),
            latitude: None,
            longitude: None,
            date: "2025-03-01".to_string(),
        };
        let err = submit(&config, submission).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));
    }

    #[test]
    fn test_geo_filters() {
        let filters = geo_filters(Some(KindArg::Complaint), Some("in_progress")).unwrap();
        assert_eq!(filters.kind, Some(FeedbackType::Complaint));
        assert_eq!(filters.status, Some(FeedbackStatus::InProgress));
        assert!(geo_filters(None, Some("archived")).is_err());
    }
}
