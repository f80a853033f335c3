//! Feedback Console - operator CLI for the citizen feedback backend
//!
//! Resolves report coordinates to addresses, pages through backend
//! collections, follows live case status changes, and covers the admin
//! operations on records, company contacts and reports.

mod cli;
mod commands;
mod config;
mod error;

use crate::cli::{Cli, Command, ContactAction};
use crate::config::Config;
use crate::error::Result;
use chrono::Utc;
use clap::Parser;
use feedback_api::{FeedbackSubmission, ReportFilters, ReportKind};
use paged_list::PageWindow;
use tracing::{debug, error};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let env_filter =
        EnvFilter::from_default_env().add_directive("feedback_console=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    };

    let config = Config::from_env();
    debug!(backend = %config.backend_url, "Loaded configuration");

    match cli.command {
        Command::Resolve { lat, lng } => commands::resolve(&config, lat, lng).await,
        Command::List {
            resource,
            offset,
            page_size,
            search,
            status,
        } => {
            let window = PageWindow::new(offset, page_size.unwrap_or(config.page_size));
            let filters = commands::list_filters(search.as_deref(), status.as_deref());
            commands::list(&config, resource.into(), window, filters).await
        }
        Command::Watch { page_size, status } => {
            let filters = commands::list_filters(None, status.as_deref());
            commands::watch(&config, page_size.unwrap_or(config.page_size), filters).await
        }
        Command::View { case_number } => commands::view(&config, &case_number).await,
        Command::Token { token } => commands::token(&config, token.as_deref()),
        Command::Cancel { id } => commands::cancel(&config, &id).await,
        Command::Geo { kind, status } => {
            let filters = commands::geo_filters(kind, status.as_deref())?;
            commands::geo(&config, filters).await
        }
        Command::Dashboard => commands::dashboard(&config).await,
        Command::Create { resource, data } => {
            commands::create(&config, resource.into(), &data).await
        }
        Command::Update { resource, id, data } => {
            commands::update(&config, resource.into(), &id, &data).await
        }
        Command::Contact { action } => match action {
            ContactAction::Add {
                company_id,
                person_id,
            } => commands::add_contact(&config, &company_id, &person_id).await,
            ContactAction::Remove {
                company_id,
                person_id,
            } => commands::remove_contact(&config, &company_id, &person_id).await,
        },
        Command::Report {
            by_company,
            from,
            to,
            kind,
            status,
            out,
        } => {
            let kind_of_report = if by_company {
                ReportKind::FeedbacksByCompany
            } else {
                ReportKind::Feedbacks
            };
            let filters = ReportFilters {
                start_date: from,
                end_date: to,
                kind,
                status,
            };
            commands::report(&config, kind_of_report, filters, &out).await
        }
        Command::Submit {
            name,
            email,
            kind,
            description,
            lat,
            lng,
        } => {
            let submission = FeedbackSubmission {
                name,
                email,
                kind: kind.into(),
                description,
                latitude: lat,
                longitude: lng,
                date: Utc::now().format("%Y-%m-%d").to_string(),
            };
            commands::submit(&config, submission).await
        }
    }
}
