//! Discord webhook notifier.
//!
//! Posts one embed per event to a Discord webhook. Rate limits (HTTP 429)
//! are honoured via `Retry-After`; server errors and network failures back
//! off exponentially; other client errors are not retried.
//!
//! Requires the `discord` feature to be enabled.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use tracing::{debug, error, info, warn};

use crate::domain::Event;
use crate::error::DeliveryError;
use crate::port::Notifier;

use super::format::{format_event_message, WebhookPayload};

/// Longest `Retry-After` we are willing to sleep for.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Configuration for the Discord notifier.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    /// Webhook URL from the Discord channel settings.
    pub webhook_url: String,
    /// Display name for the posting bot.
    pub username: String,
    /// Total attempts per notification (at least one).
    pub max_retries: u32,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// First backoff delay; doubles on every retry.
    pub backoff_base: Duration,
}

impl DiscordConfig {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            username: "Crypto Alert Bot".to_string(),
            max_retries: 3,
            request_timeout: Duration::from_secs(10),
            backoff_base: Duration::from_secs(1),
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Upper bound on one delivery: every attempt hits the request timeout
    /// and every pause between attempts is the longer of the backoff and a
    /// capped `Retry-After`.
    #[must_use]
    pub fn worst_case_delivery(&self) -> Duration {
        let attempts = self.max_retries.max(1);
        let requests = self.request_timeout.saturating_mul(attempts);
        (0..attempts - 1).fold(requests, |total, attempt| {
            total.saturating_add(self.backoff(attempt).max(MAX_RETRY_AFTER))
        })
    }
}

/// Notifier that posts events to a Discord webhook.
pub struct DiscordNotifier {
    config: DiscordConfig,
    client: reqwest::Client,
}

impl DiscordNotifier {
    /// Create a notifier with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: DiscordConfig) -> crate::error::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        info!(username = %config.username, "Discord notifier ready");
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &DiscordConfig {
        &self.config
    }

    async fn send_with_retry(&self, payload: &WebhookPayload) -> Result<(), DeliveryError> {
        let attempts = self.config.max_retries.max(1);
        let mut last_error = String::new();

        for attempt in 0..attempts {
            let is_last = attempt + 1 == attempts;

            match self
                .client
                .post(&self.config.webhook_url)
                .json(payload)
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => {
                    debug!(attempt, "Discord notification sent");
                    return Ok(());
                }
                Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS => {
                    let wait = retry_after(response.headers()).unwrap_or(Duration::from_secs(1));
                    warn!(
                        attempt,
                        retry_after_ms = wait.as_millis() as u64,
                        "Rate limited by Discord"
                    );
                    last_error = "rate limited (HTTP 429)".to_string();
                    if !is_last {
                        tokio::time::sleep(wait).await;
                    }
                    continue;
                }
                Ok(response) if response.status().is_client_error() => {
                    let status = response.status().as_u16();
                    error!(status, "Discord rejected notification");
                    return Err(DeliveryError::Status { status });
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    warn!(attempt, status, "Discord webhook returned an error");
                    last_error = DeliveryError::Status { status }.to_string();
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Network error sending Discord notification");
                    last_error = e.to_string();
                }
            }

            if !is_last {
                tokio::time::sleep(self.config.backoff(attempt)).await;
            }
        }

        Err(DeliveryError::RetriesExhausted {
            attempts,
            last: last_error,
        })
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    fn name(&self) -> &str {
        "discord"
    }

    async fn deliver(&self, event: &Event) -> Result<(), DeliveryError> {
        debug!(
            event_id = %event.id(),
            event_type = %event.event_type(),
            "Sending Discord notification"
        );
        let payload = format_event_message(event, &self.config.username);
        self.send_with_retry(&payload).await
    }

    fn delivery_budget(&self) -> Option<Duration> {
        Some(self.config.worst_case_delivery())
    }
}

/// `Retry-After` in (possibly fractional) seconds, capped.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let seconds: f64 = headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(Duration::from_secs_f64(seconds).min(MAX_RETRY_AFTER))
}
