use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use feedback_api::{FeedbackType, Resource};

#[derive(Parser, Debug)]
#[command(name = "feedback-console")]
#[command(about = "Operator console for the citizen feedback backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve coordinates to a single address line
    Resolve {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },

    /// Load one page of a backend collection
    #[command(alias = "ls")]
    List {
        #[arg(value_enum)]
        resource: ResourceArg,

        /// Index of the first row
        #[arg(long, default_value_t = 0)]
        offset: u64,

        /// Rows per page (defaults to PAGE_SIZE)
        #[arg(long)]
        page_size: Option<u32>,

        #[arg(short, long)]
        search: Option<String>,

        /// Status code, or ALL
        #[arg(long)]
        status: Option<String>,
    },

    /// Follow live status pushes against the first feedback page
    Watch {
        #[arg(long)]
        page_size: Option<u32>,

        #[arg(long)]
        status: Option<String>,
    },

    /// Look up a case by its public case number
    View { case_number: String },

    /// Decode the claims of a session token (defaults to API_TOKEN)
    Token { token: Option<String> },

    /// Cancel a feedback case
    Cancel { id: String },

    /// Print heat map points
    Geo {
        #[arg(long = "type", value_enum)]
        kind: Option<KindArg>,

        #[arg(long)]
        status: Option<String>,
    },

    /// Print the dashboard aggregates
    Dashboard,

    /// Create a user, role or permission from a JSON body
    Create {
        #[arg(value_enum)]
        resource: ResourceArg,

        #[arg(long)]
        data: String,
    },

    /// Patch a record with the fields of a JSON body
    Update {
        #[arg(value_enum)]
        resource: ResourceArg,

        id: String,

        #[arg(long)]
        data: String,
    },

    /// Manage company contacts
    Contact {
        #[command(subcommand)]
        action: ContactAction,
    },

    /// Download an Excel report
    Report {
        /// Group the report by company
        #[arg(long)]
        by_company: bool,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        #[arg(long = "type")]
        kind: Option<String>,

        #[arg(long)]
        status: Option<String>,

        #[arg(short, long)]
        out: PathBuf,
    },

    /// Send a citizen report to the intake webhook
    Submit {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long = "type", value_enum)]
        kind: KindArg,

        #[arg(long)]
        description: String,

        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        lng: Option<f64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ContactAction {
    /// Link a person to a company
    Add { company_id: String, person_id: String },
    /// Unlink a person from a company
    Remove { company_id: String, person_id: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceArg {
    Feedback,
    Users,
    Companies,
    Roles,
    Permissions,
    NotAssignedUsers,
}

impl From<ResourceArg> for Resource {
    fn from(arg: ResourceArg) -> Self {
        match arg {
            ResourceArg::Feedback => Resource::Feedback,
            ResourceArg::Users => Resource::Users,
            ResourceArg::Companies => Resource::Companies,
            ResourceArg::Roles => Resource::Roles,
            ResourceArg::Permissions => Resource::Permissions,
            ResourceArg::NotAssignedUsers => Resource::NotAssignedUsers,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Complaint,
    Suggestion,
    Compliment,
}

impl From<KindArg> for FeedbackType {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Complaint => FeedbackType::Complaint,
            KindArg::Suggestion => FeedbackType::Suggestion,
            KindArg::Compliment => FeedbackType::Compliment,
        }
    }
}
