//! Command-line interface of the `adflow` binary.

use crate::models::{CampaignStatus, Platform, ReportFormat, Role};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "adflow")]
#[command(version)]
#[command(about = "Command-line client for the AdFlow campaign API")]
pub struct Cli {
    /// API server URL, e.g. http://localhost:5000 (overrides configuration)
    #[arg(long, global = true, env = "ADFLOW_SERVER")]
    pub server: Option<String>,

    /// Where the session tokens are kept
    #[arg(long, global = true, value_name = "PATH", env = "ADFLOW_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session
    Login {
        /// Username or email
        username: String,
        #[arg(long, env = "ADFLOW_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Register(RegisterArgs),
    /// End the session and forget the stored tokens
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Change the password of the signed-in user
    ChangePassword {
        #[arg(long, env = "ADFLOW_PASSWORD", hide_env_values = true)]
        current: String,
        #[arg(long = "new", env = "ADFLOW_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
    /// Manage campaigns
    Campaigns {
        #[command(subcommand)]
        command: CampaignCommand,
    },
    /// Aggregated performance of all campaigns
    Dashboard,
    /// Supported advertising platforms
    Platforms,
    /// Administration (requires the admin role)
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
    /// Download the campaign report
    Report {
        /// csv, html or json
        #[arg(long, default_value = "csv")]
        format: ReportFormat,
        /// Output file; `-` writes to stdout. Defaults to the server's filename.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "ADFLOW_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CampaignCommand {
    /// List campaigns
    List {
        #[arg(long)]
        status: Option<CampaignStatus>,
    },
    /// Show one campaign
    Show { id: i64 },
    /// Create a campaign
    Create(CreateCampaignArgs),
    /// Delete a campaign
    Delete { id: i64 },
    /// Report delivery metrics for a campaign
    Metrics(MetricsArgs),
    /// Run the optimizer on a campaign
    Optimize { id: i64 },
    /// Detailed analytics for a campaign
    Analytics { id: i64 },
}

#[derive(Args, Debug)]
pub struct CreateCampaignArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub budget: f64,
    /// Comma-separated, e.g. google_ads,facebook
    #[arg(long, value_delimiter = ',', required = true)]
    pub platforms: Vec<Platform>,
    /// YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS
    #[arg(long, value_parser = parse_datetime)]
    pub start: NaiveDateTime,
    #[arg(long, value_parser = parse_datetime)]
    pub end: Option<NaiveDateTime>,
    #[arg(long)]
    pub objective: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct MetricsArgs {
    pub id: i64,
    #[arg(long)]
    pub impressions: Option<u64>,
    #[arg(long)]
    pub clicks: Option<u64>,
    #[arg(long)]
    pub conversions: Option<u64>,
    #[arg(long)]
    pub spent: Option<f64>,
    #[arg(long)]
    pub ctr: Option<f64>,
    #[arg(long)]
    pub cpc: Option<f64>,
    #[arg(long)]
    pub cpa: Option<f64>,
    #[arg(long)]
    pub roas: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Platform-wide statistics
    Stats,
    /// Recent optimizer actions
    Activity {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// List users
    Users {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        per_page: u32,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one user
    User { id: i64 },
    /// Update profile fields, role or flags of a user
    UpdateUser(UpdateUserArgs),
    /// Enable or disable a user
    ToggleActive { id: i64 },
    /// Change a user's role (user, agency or admin)
    SetRole {
        id: i64,
        #[arg(value_parser = Role::from_str)]
        role: Role,
    },
    /// Delete a user
    DeleteUser { id: i64 },
    /// Promote yourself to admin while no admin exists
    Bootstrap,
}

#[derive(Args, Debug)]
pub struct UpdateUserArgs {
    pub id: i64,
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long, value_parser = Role::from_str)]
    pub role: Option<Role>,
    /// true or false
    #[arg(long)]
    pub active: Option<bool>,
    /// true or false
    #[arg(long)]
    pub verified: Option<bool>,
}

fn parse_datetime(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", value))
}
