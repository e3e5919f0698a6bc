use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::dto::{ErrorResponse, HealthResponse, IngestRequest, IngestResponse};
use super::{HttpState, SERVICE_NAME};

/// A JSON `{"error": ...}` response with a status code.
#[derive(Debug)]
pub(super) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// `POST /event`
pub(super) async fn ingest(
    State(state): State<HttpState>,
    body: Bytes,
) -> Result<Json<IngestResponse>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::bad_request("Empty request body"));
    }

    let value: Value =
        serde_json::from_slice(&body).map_err(|_| ApiError::bad_request("Invalid JSON"))?;
    if !value.is_object() {
        return Err(ApiError::bad_request("Request body must be a JSON object"));
    }

    let request: IngestRequest =
        serde_json::from_value(value).map_err(|_| ApiError::bad_request("Invalid JSON"))?;
    let event = request.into_event().map_err(|e| {
        warn!(error = %e, "Rejected event");
        ApiError::bad_request(e.to_string())
    })?;

    let response = IngestResponse::accepted(&event);
    info!(
        event_id = %event.id(),
        event_type = %event.event_type(),
        priority = %event.priority(),
        will_notify = response.will_notify,
        "Event accepted"
    );

    state.bus.publish_detached(event);
    Ok(Json(response))
}

/// `GET /health`
pub(super) async fn health(State(state): State<HttpState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        listeners: state.bus.listener_count(),
        stats: state.bus.stats(),
    })
}

/// `GET /`
pub(super) async fn index() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "usage": "POST /event with JSON body: {\"event_type\": \"...\", \"data\": {...}, \"priority\": \"HIGH\"}",
        "endpoints": {
            "POST /event": "Publish an event of any type",
            "GET /health": "Health check and dispatch counters"
        },
        "example": {
            "event_type": "price_alert",
            "data": {"symbol": "BTC/USDT", "price": "$45,000", "change": "+5.3%"},
            "priority": "HIGH",
            "notify_threshold": {"field": "change", "abs_gte": 2.0}
        }
    }))
}

pub(super) async fn not_found() -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        message: "Endpoint not found".to_string(),
    }
}
