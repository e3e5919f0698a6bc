//! Publish/subscribe event bus.
//!
//! The bus resolves the listeners subscribed to an event, runs each
//! listener's filter chain, evaluates the event's notification threshold
//! and delivers to every listener that qualifies. Deliveries run as
//! independent tasks: a listener that errors, panics or hangs is recorded in
//! the [`DispatchReport`] and never affects the others or the caller.
//!
//! ```text
//! publish(event)
//!   └─ resolve(event_type) ──► [A, B, C]        registry snapshot
//!        ├─ A: filters ✗                        Filtered
//!        ├─ B: filters ✓ threshold ✗            BelowThreshold
//!        └─ C: filters ✓ threshold ✓ ──► spawn  Delivered | Failed
//! ```

mod registry;
mod report;

pub use registry::ListenerRegistry;
pub use report::{DeliveryStatus, DispatchReport, ListenerOutcome};

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde::Serialize;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::domain::Event;
use crate::error::DeliveryFailure;
use crate::port::Listener;

/// Default per-listener delivery timeout. Notifiers with a larger
/// [`delivery_budget`](crate::port::Notifier::delivery_budget) get theirs.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Bus tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// Abandon a delivery after this long, or after the notifier's own
    /// budget if that is longer. `None` waits indefinitely.
    pub delivery_timeout: Option<Duration>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            delivery_timeout: Some(DEFAULT_DELIVERY_TIMEOUT),
        }
    }
}

/// Lifetime counters, as reported by the health endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusStats {
    pub published: u64,
    pub delivered: u64,
    pub failed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    published: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
}

/// Central dispatcher.
#[derive(Default)]
pub struct EventBus {
    registry: ListenerRegistry,
    config: BusConfig,
    counters: Counters,
    in_flight: TaskTracker,
}

impl EventBus {
    /// Create a bus with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: BusConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Register a listener. Safe to call while publishes are in flight.
    pub fn register(&self, listener: Listener) {
        self.registry.register(listener);
    }

    /// Remove listeners by name.
    pub fn unregister(&self, name: &str) -> usize {
        self.registry.unregister(name)
    }

    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    /// Detached publishes that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn stats(&self) -> BusStats {
        BusStats {
            published: self.counters.published.load(Ordering::Relaxed),
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    /// Route an event to every interested listener and wait for all
    /// deliveries to finish, fail or time out.
    pub async fn publish(&self, event: Event) -> DispatchReport {
        let event = Arc::new(event);
        self.counters.published.fetch_add(1, Ordering::Relaxed);

        let listeners = self.registry.resolve(event.event_type());
        let mut report = DispatchReport::new(event.id(), event.event_type());

        if listeners.is_empty() {
            warn!(
                event_id = %event.id(),
                event_type = %event.event_type(),
                "No listeners for event"
            );
            return report;
        }

        // Pure, so one evaluation serves every listener.
        let should_notify = event.should_notify();

        let pending = listeners.into_iter().map(|listener| {
            let stage = if !listener.accepts(&event) {
                Stage::Done(DeliveryStatus::Filtered)
            } else if !should_notify {
                Stage::Done(DeliveryStatus::BelowThreshold)
            } else {
                debug!(
                    event_id = %event.id(),
                    listener = %listener.name(),
                    "Routing event to listener"
                );
                Stage::Running(spawn_delivery(
                    Arc::clone(&listener),
                    Arc::clone(&event),
                    self.config.delivery_timeout,
                ))
            };
            async move { (listener, stage.finish().await) }
        });

        for (listener, status) in join_all(pending).await {
            if let DeliveryStatus::Failed(failure) = &status {
                warn!(
                    event_id = %event.id(),
                    listener = %listener.name(),
                    error = %failure,
                    "Listener delivery failed"
                );
            }
            report.record(listener.name(), status);
        }

        self.counters
            .delivered
            .fetch_add(report.delivered() as u64, Ordering::Relaxed);
        self.counters
            .failed
            .fetch_add(report.failed() as u64, Ordering::Relaxed);

        info!(
            event_id = %event.id(),
            event_type = %event.event_type(),
            priority = %event.priority(),
            delivered = report.delivered(),
            filtered = report.filtered(),
            below_threshold = report.below_threshold(),
            failed = report.failed(),
            "Event dispatched"
        );

        report
    }

    /// Spawn [`publish`](Self::publish) so the producer does not wait on
    /// slow listeners. The task is tracked until [`drain`](Self::drain).
    pub fn publish_detached(self: &Arc<Self>, event: Event) -> JoinHandle<DispatchReport> {
        let bus = Arc::clone(self);
        self.in_flight.spawn(async move { bus.publish(event).await })
    }

    /// Wait for every detached publish to finish, including any started
    /// while draining. Call before shutting down the runtime.
    pub async fn drain(&self) {
        let pending = self.in_flight.len();
        if pending > 0 {
            info!(pending, "Draining in-flight events");
        }
        self.in_flight.close();
        self.in_flight.wait().await;
        self.in_flight.reopen();
    }
}

/// Where a resolved listener ended up before any awaiting happens.
enum Stage {
    Done(DeliveryStatus),
    Running(JoinHandle<Result<(), DeliveryFailure>>),
}

impl Stage {
    async fn finish(self) -> DeliveryStatus {
        match self {
            Self::Done(status) => status,
            Self::Running(handle) => match handle.await {
                Ok(Ok(())) => DeliveryStatus::Delivered,
                Ok(Err(failure)) => DeliveryStatus::Failed(failure),
                Err(err) => DeliveryStatus::Failed(join_failure(err)),
            },
        }
    }
}

fn spawn_delivery(
    listener: Arc<Listener>,
    event: Arc<Event>,
    timeout: Option<Duration>,
) -> JoinHandle<Result<(), DeliveryFailure>> {
    let timeout = effective_timeout(timeout, listener.notifier().delivery_budget());
    tokio::spawn(async move {
        let delivery = listener.notifier().deliver(&event);
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, delivery).await {
                Ok(result) => result.map_err(DeliveryFailure::from),
                Err(_) => Err(DeliveryFailure::TimedOut(limit)),
            },
            None => delivery.await.map_err(DeliveryFailure::from),
        }
    })
}

/// The bus limit, raised to the notifier's budget. Disabled stays disabled.
fn effective_timeout(limit: Option<Duration>, budget: Option<Duration>) -> Option<Duration> {
    limit.map(|limit| budget.map_or(limit, |budget| limit.max(budget)))
}

fn join_failure(err: JoinError) -> DeliveryFailure {
    if err.is_panic() {
        DeliveryFailure::Panicked(panic_message(err.into_panic()))
    } else {
        DeliveryFailure::Error("delivery task was cancelled".to_string())
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
