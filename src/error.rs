use std::time::Duration;

use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised while constructing an [`Event`](crate::domain::Event).
///
/// This is the only error class a producer has to handle synchronously;
/// everything past construction is recovered inside dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("event_type must be a non-empty string")]
    EmptyEventType,

    #[error("event data must be a JSON object, got {found}")]
    InvalidData { found: &'static str },
}

/// A producer-supplied notification rule that could not be decoded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThresholdError {
    #[error("threshold rule must be a JSON object")]
    NotAnObject,

    #[error("threshold field name must be a string")]
    InvalidField,

    #[error("unknown threshold operator: {0}")]
    UnknownOperator(String),

    #[error("threshold on field '{field}' has no operator")]
    MissingOperator { field: String },

    #[error("bound for operator '{operator}' is not a number")]
    NonNumericBound { operator: &'static str },

    #[error("unrecognized threshold rule")]
    Unrecognized,
}

/// Errors a notifier returns from a failed delivery.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint returned status {status}")]
    Status { status: u16 },

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    #[error("{0}")]
    Other(String),
}

/// Why the bus recorded a listener invocation as failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryFailure {
    #[error("delivery failed: {0}")]
    Error(String),

    #[error("delivery timed out after {0:?}")]
    TimedOut(Duration),

    #[error("listener panicked: {0}")]
    Panicked(String),
}

impl From<DeliveryError> for DeliveryFailure {
    fn from(err: DeliveryError) -> Self {
        Self::Error(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Threshold(#[from] ThresholdError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, Error>;
