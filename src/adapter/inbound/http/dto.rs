//! Wire types for the ingestion API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::application::BusStats;
use crate::domain::{event_data, Event, NotifyThreshold, Priority};
use crate::error::EventError;

/// Body of `POST /event`.
///
/// Every field is kept as raw JSON so that a wrong type is reported as a
/// validation problem rather than a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct IngestRequest {
    #[serde(default)]
    pub event_type: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub priority: Option<Value>,
    #[serde(default)]
    pub notify_threshold: Option<Value>,
}

/// Why an ingestion request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("Missing 'event_type' field")]
    MissingEventType,

    #[error("Error creating event: {0}")]
    Event(#[from] EventError),
}

impl IngestRequest {
    /// Validate the request and build the event to publish.
    ///
    /// Priority and threshold are lenient: an unknown priority becomes
    /// `MEDIUM` and a malformed threshold never notifies.
    pub fn into_event(self) -> Result<Event, IngestError> {
        let event_type = match self.event_type {
            Some(Value::String(s)) if !s.trim().is_empty() => s,
            _ => return Err(IngestError::MissingEventType),
        };

        let data = event_data(self.data.unwrap_or(Value::Null))?;

        let priority = match &self.priority {
            Some(Value::String(s)) => Priority::parse_or_default(s),
            Some(other) => {
                debug!(priority = %other, "Non-string priority, using default");
                Priority::default()
            }
            None => Priority::default(),
        };

        let threshold = NotifyThreshold::from_json_lenient(self.notify_threshold.as_ref());

        Ok(Event::builder(event_type)
            .data(data)
            .priority(priority)
            .threshold(threshold)
            .build()?)
    }
}

/// Successful `POST /event` response.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
    pub message: String,
    pub event_type: String,
    pub event_id: Uuid,
    pub will_notify: bool,
    pub priority: Priority,
}

impl IngestResponse {
    pub fn accepted(event: &Event) -> Self {
        Self {
            status: "success",
            message: format!("Event '{}' published successfully", event.event_type()),
            event_type: event.event_type().to_string(),
            event_id: event.id(),
            will_notify: event.should_notify(),
            priority: event.priority(),
        }
    }
}

/// `GET /health` response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub listeners: usize,
    #[serde(flatten)]
    pub stats: BusStats,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
