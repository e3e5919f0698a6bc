//! App orchestration module.
//!
//! Wires configuration into a running service: the event bus and its
//! listeners, the optional heartbeat, and the HTTP ingestion API.

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{info, warn};

use crate::adapter::inbound::http;
use crate::adapter::outbound::notifier::{ConsoleNotifier, LogNotifier};
use crate::adapter::outbound::HeartbeatMonitor;
use crate::app::config::Config;
use crate::application::EventBus;
use crate::error::Result;
use crate::port::Listener;

#[cfg(feature = "discord")]
use crate::adapter::outbound::notifier::discord::{DiscordConfig, DiscordNotifier};
#[cfg(feature = "discord")]
use crate::domain::PriorityFilter;

/// Main application struct.
pub struct App;

impl App {
    /// Run the service until Ctrl-C.
    pub async fn run(config: Config) -> Result<()> {
        let bus = Arc::new(build_bus(&config)?);
        info!(
            listeners = ?bus.registry().names(),
            delivery_timeout = ?bus.config().delivery_timeout,
            "Event bus ready"
        );

        let heartbeat = match &config.heartbeat.url {
            Some(url) => Some(
                HeartbeatMonitor::new(
                    url.clone(),
                    Duration::from_secs(config.heartbeat.interval_secs),
                )?
                .spawn(),
            ),
            None => None,
        };

        let result = http::serve(
            (config.server.host.as_str(), config.server.port),
            Arc::clone(&bus),
            shutdown_signal(),
        )
        .await;

        if let Some(handle) = heartbeat {
            handle.abort();
        }

        // Accepted events must reach their listeners before the runtime drops.
        bus.drain().await;

        let stats = bus.stats();
        info!(
            published = stats.published,
            delivered = stats.delivered,
            failed = stats.failed,
            "Service stopped"
        );
        result
    }
}

/// Build a bus with every configured listener registered.
pub fn build_bus(config: &Config) -> Result<EventBus> {
    let bus = EventBus::with_config(config.bus_config());
    for listener in build_listeners(config)? {
        bus.register(listener);
    }
    Ok(bus)
}

/// Build the listeners enabled by `config`. The log listener is always
/// present.
pub fn build_listeners(config: &Config) -> Result<Vec<Listener>> {
    let mut listeners = vec![Listener::new(LogNotifier)];

    if config.console.enabled {
        listeners.push(Listener::new(ConsoleNotifier::new()));
    }

    #[cfg(feature = "discord")]
    if let Some(url) = &config.discord.webhook_url {
        let notifier = DiscordNotifier::new(DiscordConfig {
            username: config.discord.username.clone(),
            max_retries: config.discord.max_retries,
            ..DiscordConfig::new(url.clone())
        })?;
        let listener = Listener::new(notifier)
            .subscribe_to(&config.discord.event_types)
            .with_filter(PriorityFilter::new(config.discord.min_priority));
        info!(
            subscription = %listener.subscription(),
            min_priority = %config.discord.min_priority,
            "Discord notifier enabled"
        );
        listeners.push(listener);
    }

    #[cfg(not(feature = "discord"))]
    if config.discord.webhook_url.is_some() {
        warn!("Discord webhook configured but the `discord` feature is disabled");
    }

    Ok(listeners)
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
