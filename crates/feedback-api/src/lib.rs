//! Citizen Feedback Backend Client
//!
//! Typed access to the feedback backend: paged `private/*` collections and
//! their records, the dashboard, company contacts, Excel reports, heat map
//! points, case cancellation and the public case lookup.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use feedback_api::{BackendClient, Feedback, Resource, ResourceSource};
//! use paged_list::{PageWindow, PagedListController};
//!
//! # async fn example() -> Result<(), feedback_api::ApiError> {
//! let client = Arc::new(BackendClient::new("http://localhost:3000", None)?);
//! let source = ResourceSource::<Feedback>::new(client.clone(), Resource::Feedback);
//! let list = PagedListController::new(source);
//!
//! list.load_page(PageWindow::first(10)).await;
//! for feedback in list.items().await {
//!     println!("{} {}", feedback.id, feedback.status.as_str());
//! }
//!
//! if let Some(case) = client.view_feedback("QJ-2025-0001").await? {
//!     println!("{} - {}", case.full_name(), case.status_label());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod source;
pub mod token;
pub mod types;
pub mod view;

pub use client::{BackendClient, Resource};
pub use error::{ApiError, Result};
pub use source::ResourceSource;
pub use token::{decode_claims, TokenClaims, TokenError};
pub use types::{
    Company, CompanyContact, CountById, DashboardSummary, Feedback, FeedbackGeo, FeedbackStatus,
    FeedbackSubmission, FeedbackType, GeoFilters, NewUser, PageResponse, Permission, PersonalData,
    ReportFilters, ReportKind, Role, StatusUpdate, TypeDistribution, User,
};
pub use view::{normalize_view_feedback, validate_case_number, ViewFeedback};
