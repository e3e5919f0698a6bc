//! Shared notifiers and fixtures for integration tests.

#![allow(dead_code)]

mod faulty_notifier;
mod recording_notifier;

pub use faulty_notifier::{FailingNotifier, PanickingNotifier, SlowNotifier};
pub use recording_notifier::RecordingNotifier;

use alertbus::domain::{Event, Priority};

/// A `price_alert` with a string-typed `change` field, as producers send it.
pub fn price_alert(change: &str, priority: Priority) -> Event {
    Event::builder("price_alert")
        .field("symbol", "BTC/USDT")
        .field("change", change)
        .priority(priority)
        .build()
        .expect("valid event")
}
