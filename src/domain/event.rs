//! The event record routed through the bus.
//!
//! An [`Event`] is immutable once built: fields are private and only
//! reachable through accessors. Use [`Event::builder`] to set anything other
//! than the event type.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use super::priority::Priority;
use super::threshold::NotifyThreshold;
use crate::error::EventError;

/// Untyped event payload. This is also the notification body.
pub type EventData = serde_json::Map<String, Value>;

/// Convert a producer-supplied payload into [`EventData`]. `null` is an
/// empty payload.
///
/// # Errors
///
/// Returns [`EventError::InvalidData`] for anything but an object or `null`.
pub fn event_data(value: Value) -> Result<EventData, EventError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(EventData::new()),
        Value::Bool(_) => Err(EventError::InvalidData { found: "boolean" }),
        Value::Number(_) => Err(EventError::InvalidData { found: "number" }),
        Value::String(_) => Err(EventError::InvalidData { found: "string" }),
        Value::Array(_) => Err(EventError::InvalidData { found: "array" }),
    }
}

/// One occurrence to be routed and possibly notified.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    id: Uuid,
    event_type: String,
    data: EventData,
    priority: Priority,
    notify_threshold: NotifyThreshold,
    created_at: DateTime<Utc>,
}

impl Event {
    /// Create an event with default payload, priority and threshold.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::EmptyEventType`] if `event_type` is blank.
    pub fn new(event_type: impl Into<String>) -> Result<Self, EventError> {
        Self::builder(event_type).build()
    }

    /// Start building an event of the given type.
    pub fn builder(event_type: impl Into<String>) -> EventBuilder {
        EventBuilder::new(event_type)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn data(&self) -> &EventData {
        &self.data
    }

    /// Look up a single payload field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn notify_threshold(&self) -> &NotifyThreshold {
        &self.notify_threshold
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether this event's threshold says it is worth notifying about.
    #[must_use]
    pub fn should_notify(&self) -> bool {
        self.notify_threshold.evaluate(&self.data)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {} - Priority: {}",
            self.event_type,
            self.created_at.to_rfc3339(),
            self.priority
        )
    }
}

/// Builder for [`Event`].
///
/// ```ignore
/// let event = Event::builder("price_alert")
///     .field("symbol", "BTC/USDT")
///     .field("change", -3.5)
///     .priority(Priority::High)
///     .threshold(NotifyThreshold::field_compare("change", Comparison::AbsGte, 2.0))
///     .build()?;
/// ```
#[derive(Debug)]
pub struct EventBuilder {
    event_type: String,
    data: EventData,
    priority: Priority,
    notify_threshold: NotifyThreshold,
}

impl EventBuilder {
    fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            data: EventData::new(),
            priority: Priority::default(),
            notify_threshold: NotifyThreshold::default(),
        }
    }

    /// Replace the whole payload.
    pub fn data(mut self, data: EventData) -> Self {
        self.data = data;
        self
    }

    /// Set one payload field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn threshold(mut self, threshold: NotifyThreshold) -> Self {
        self.notify_threshold = threshold;
        self
    }

    /// Build the event, stamping its id and creation time.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::EmptyEventType`] if the event type is blank.
    pub fn build(self) -> Result<Event, EventError> {
        if self.event_type.trim().is_empty() {
            return Err(EventError::EmptyEventType);
        }

        Ok(Event {
            id: Uuid::new_v4(),
            event_type: self.event_type,
            data: self.data,
            priority: self.priority,
            notify_threshold: self.notify_threshold,
            created_at: Utc::now(),
        })
    }
}
