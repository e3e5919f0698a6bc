//! Command-line interface definitions.

pub mod banner;
pub mod check;
pub mod run;
pub mod send;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default address of a locally running service.
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8080";

/// Alertbus - route events to notification channels.
#[derive(Parser, Debug)]
#[command(name = "alertbus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the event service (foreground)
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Publish an event to a running service
    Send(SendArgs),
}

/// Subcommands for `alertbus check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
    /// Query the health endpoint of a running service
    Service(ServiceUrlArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ServiceUrlArg {
    /// Base URL of the service
    #[arg(long, default_value = DEFAULT_SERVICE_URL)]
    pub url: String,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file (defaults apply if it does not exist)
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override listen host
    #[arg(long)]
    pub host: Option<String>,

    /// Override listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Skip ASCII art banner
    #[arg(long)]
    pub no_banner: bool,
}

/// Arguments for the `send` subcommand.
#[derive(Parser, Debug)]
pub struct SendArgs {
    /// Event type, e.g. price_alert
    pub event_type: String,

    /// Event payload as a JSON object
    #[arg(long)]
    pub data: Option<String>,

    /// Priority (LOW, MEDIUM, HIGH, CRITICAL)
    #[arg(long)]
    pub priority: Option<String>,

    /// Notification rule as JSON, e.g. '{"field": "change", "abs_gte": 2}'
    #[arg(long)]
    pub threshold: Option<String>,

    /// Base URL of the service
    #[arg(long, default_value = DEFAULT_SERVICE_URL)]
    pub url: String,
}
