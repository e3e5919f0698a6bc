//! Alertbus - a publish/subscribe event router for notifications.
//!
//! Producers publish [`domain::Event`]s of any type. The
//! [`application::EventBus`] resolves the listeners subscribed to that type,
//! runs each listener's filter chain, checks the event's notification
//! threshold and delivers to every listener that qualifies. Each delivery is
//! isolated: errors, panics and timeouts end up in the returned
//! [`application::DispatchReport`] instead of reaching the producer.
//!
//! # Modules
//!
//! - [`domain`] - Events, priorities, threshold rules and filters
//! - [`port`] - The `Notifier` trait and `Listener` registration type
//! - [`application`] - The event bus, listener registry and dispatch report
//! - [`adapter`] - HTTP ingestion, log/console/Discord notifiers, heartbeat
//! - [`app`] - Configuration loading and service orchestration
//! - [`cli`] - Command-line interface
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `discord` (default) - Discord webhook notifier
//!
//! # Example
//!
//! ```no_run
//! use alertbus::adapter::outbound::notifier::LogNotifier;
//! use alertbus::application::EventBus;
//! use alertbus::domain::{Comparison, Event, NotifyThreshold, Priority, PriorityFilter};
//! use alertbus::port::Listener;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let bus = EventBus::new();
//! bus.register(
//!     Listener::new(LogNotifier)
//!         .subscribe_to(["price_alert"])
//!         .with_filter(PriorityFilter::new(Priority::High)),
//! );
//!
//! let event = Event::builder("price_alert")
//!     .field("change", "+5.3%")
//!     .priority(Priority::High)
//!     .threshold(NotifyThreshold::field_compare("change", Comparison::AbsGte, 2.0))
//!     .build()?;
//!
//! let report = bus.publish(event).await;
//! assert_eq!(report.delivered(), 1);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod port;
