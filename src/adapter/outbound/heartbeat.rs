//! Uptime heartbeat.
//!
//! Pings an external monitor on a fixed interval so it can alarm when the
//! service goes quiet.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::error::DeliveryError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Periodic `GET` against a heartbeat URL.
pub struct HeartbeatMonitor {
    url: String,
    interval: Duration,
    client: reqwest::Client,
}

impl HeartbeatMonitor {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, interval: Duration) -> crate::error::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            url: url.into(),
            interval,
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Send a single heartbeat.
    pub async fn ping(&self) -> Result<(), DeliveryError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Status {
                status: status.as_u16(),
            })
        }
    }

    /// Ping forever. Failures are logged and the loop carries on.
    pub async fn run(self) {
        info!(
            url = %self.url,
            interval_secs = self.interval.as_secs(),
            "Heartbeat monitor started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.ping().await {
                Ok(()) => debug!(url = %self.url, "Heartbeat sent"),
                Err(e) => error!(url = %self.url, error = %e, "Heartbeat failed"),
            }
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn spawn_monitor_endpoint(status: StatusCode) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/ping",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    status
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/ping"), hits)
    }

    #[tokio::test]
    async fn ping_succeeds_on_2xx() {
        let (url, hits) = spawn_monitor_endpoint(StatusCode::OK).await;
        let monitor = HeartbeatMonitor::new(url, Duration::from_secs(30)).unwrap();

        monitor.ping().await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn ping_reports_error_status() {
        let (url, _) = spawn_monitor_endpoint(StatusCode::SERVICE_UNAVAILABLE).await;
        let monitor = HeartbeatMonitor::new(url, Duration::from_secs(30)).unwrap();

        let err = monitor.ping().await.unwrap_err();

        assert!(matches!(err, DeliveryError::Status { status: 503 }));
    }

    #[tokio::test]
    async fn loop_survives_failures() {
        let (url, hits) = spawn_monitor_endpoint(StatusCode::INTERNAL_SERVER_ERROR).await;
        let handle = HeartbeatMonitor::new(url, Duration::from_millis(10))
            .unwrap()
            .spawn();

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(!handle.is_finished());
        assert!(hits.load(Ordering::SeqCst) >= 2);
        handle.abort();
    }
}
