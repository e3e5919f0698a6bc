//! Notifier port for event delivery.
//!
//! A [`Notifier`] is the side-effecting half of a listener: it receives an
//! event that has already passed subscription, filters and threshold, and
//! delivers it somewhere (a webhook, the log, stdout). The bus does not
//! interpret what happens inside `deliver`.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::Event;
use crate::error::DeliveryError;

/// Trait for notification backends.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - `deliver` may suspend on I/O; the bus runs each delivery as its own
///   task, so a slow notifier does not hold up others
/// - Retry policy, formatting and protocol are the notifier's business
/// - A notifier that retries internally should report its worst case through
///   [`delivery_budget`](Self::delivery_budget)
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Name used in logs and dispatch reports.
    fn name(&self) -> &str;

    /// Deliver one event.
    async fn deliver(&self, event: &Event) -> Result<(), DeliveryError>;

    /// Longest one `deliver` call can run, retries included. The bus never
    /// abandons a delivery before this much time has passed.
    fn delivery_budget(&self) -> Option<Duration> {
        None
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    fn name(&self) -> &str {
        "null"
    }

    async fn deliver(&self, _event: &Event) -> Result<(), DeliveryError> {
        Ok(())
    }
}
