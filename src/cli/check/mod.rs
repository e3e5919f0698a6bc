//! Configuration and service validation commands.

use std::path::Path;
use std::time::Duration;

use serde_json::Value;

use crate::app::Config;
use crate::error::{Error, Result};

/// Validate configuration file without starting the service.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    println!("Checking configuration: {}", path.display());
    println!();

    if !path.exists() {
        println!("⚠ Configuration file not found, checking defaults and environment");
        println!();
    }

    let config = Config::load_or_default(path)?;

    println!("✓ Configuration file is valid");
    println!();
    println!("Summary:");
    for line in summary(&config) {
        println!("  {line}");
    }
    println!();
    println!("Configuration is ready to use.");
    Ok(())
}

fn summary(config: &Config) -> Vec<String> {
    let timeout = match config.bus.delivery_timeout_secs {
        0 => "disabled".to_string(),
        secs => format!("{secs}s"),
    };
    let discord = match &config.discord.webhook_url {
        Some(_) if config.discord.event_types.is_empty() => format!(
            "enabled (all events, min priority {})",
            config.discord.min_priority
        ),
        Some(_) => format!(
            "enabled ({}, min priority {})",
            config.discord.event_types.join(", "),
            config.discord.min_priority
        ),
        None => "disabled".to_string(),
    };
    let heartbeat = match &config.heartbeat.url {
        Some(url) => format!("{url} every {}s", config.heartbeat.interval_secs),
        None => "disabled".to_string(),
    };

    vec![
        format!("Listen: {}:{}", config.server.host, config.server.port),
        format!("Delivery timeout: {timeout}"),
        format!(
            "Logging: {} ({})",
            config.logging.level, config.logging.format
        ),
        format!(
            "Console: {}",
            if config.console.enabled {
                "enabled"
            } else {
                "disabled"
            }
        ),
        format!("Discord: {discord}"),
        format!("Heartbeat: {heartbeat}"),
    ]
}

/// Call `GET /health` on a running service and print the counters.
pub async fn execute_service(base_url: &str) -> Result<()> {
    let url = format!("{}/health", base_url.trim_end_matches('/'));
    println!("Checking service: {url}");
    println!();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Server(format!("health check returned {status}")));
    }

    let body: Value = response.json().await?;
    println!("✓ Service is {}", body["status"].as_str().unwrap_or("unknown"));
    for key in ["listeners", "published", "delivered", "failed"] {
        println!("  {key}: {}", body[key]);
    }
    Ok(())
}
