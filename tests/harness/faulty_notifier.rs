use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alertbus::domain::Event;
use alertbus::error::DeliveryError;
use alertbus::port::Notifier;
use async_trait::async_trait;

/// Always fails with the given message.
pub struct FailingNotifier {
    name: String,
    message: String,
    attempts: Arc<AtomicUsize>,
}

impl FailingNotifier {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            attempts: Arc::default(),
        }
    }

    /// Shared counter of delivery attempts.
    pub fn attempts(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.attempts)
    }
}

#[async_trait]
impl Notifier for FailingNotifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn deliver(&self, _event: &Event) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(DeliveryError::Other(self.message.clone()))
    }
}

/// Sleeps before succeeding.
pub struct SlowNotifier {
    name: String,
    delay: Duration,
    budget: Option<Duration>,
    completed: Arc<AtomicUsize>,
}

impl SlowNotifier {
    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            delay,
            budget: None,
            completed: Arc::default(),
        }
    }

    /// Declare how long a delivery may legitimately take.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Shared counter of deliveries that ran to completion.
    pub fn completed(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.completed)
    }
}

#[async_trait]
impl Notifier for SlowNotifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn deliver(&self, _event: &Event) -> Result<(), DeliveryError> {
        tokio::time::sleep(self.delay).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn delivery_budget(&self) -> Option<Duration> {
        self.budget
    }
}

/// Panics on every delivery.
pub struct PanickingNotifier;

#[async_trait]
impl Notifier for PanickingNotifier {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn deliver(&self, event: &Event) -> Result<(), DeliveryError> {
        panic!("cannot handle {}", event.event_type());
    }
}
