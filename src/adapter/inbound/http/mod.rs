//! HTTP ingestion API.
//!
//! Producers `POST /event` with a JSON body; the event is validated, handed
//! to the bus without waiting for delivery, and acknowledged immediately.

mod dto;
mod handlers;

pub use dto::{ErrorResponse, HealthResponse, IngestError, IngestRequest, IngestResponse};

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::application::EventBus;
use crate::error::{Error, Result};

/// Name reported by `/` and `/health`.
pub const SERVICE_NAME: &str = "alertbus";

#[derive(Clone)]
pub(crate) struct HttpState {
    bus: Arc<EventBus>,
}

/// Build the API router around a shared bus.
pub fn router(bus: Arc<EventBus>) -> Router {
    Router::new()
        .route("/", get(handlers::index).fallback(handlers::not_found))
        .route(
            "/event",
            post(handlers::ingest).fallback(handlers::not_found),
        )
        .route(
            "/health",
            get(handlers::health).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(HttpState { bus })
}

/// Bind `addr` and serve until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(
    addr: impl ToSocketAddrs,
    bus: Arc<EventBus>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Event API listening");

    axum::serve(listener, router(bus))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::Server(e.to_string()))
}
