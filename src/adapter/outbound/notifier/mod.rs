//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for various notification backends.

mod console;

#[cfg(feature = "discord")]
pub mod discord;

pub use console::ConsoleNotifier;

use async_trait::async_trait;
use tracing::info;

use crate::domain::Event;
use crate::error::DeliveryError;
use crate::port::Notifier;

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, event: &Event) -> Result<(), DeliveryError> {
        info!(
            event_id = %event.id(),
            event_type = %event.event_type(),
            priority = %event.priority(),
            threshold = %event.notify_threshold(),
            data = %serde_json::Value::Object(event.data().clone()),
            "Event notification"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_notifier_always_succeeds() {
        let event = Event::builder("price_alert")
            .field("price", 45230.5)
            .build()
            .unwrap();

        assert!(LogNotifier.deliver(&event).await.is_ok());
        assert_eq!(LogNotifier.name(), "log");
    }
}
