//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!   producer ───────►│   EventBus (application)│
//!                    └────────────┬────────────┘
//!                                 │ Listener { subscription, filters }
//!            ┌────────────────────┼────────────────────┐
//!            ▼                    ▼                    ▼
//!      ┌───────────┐        ┌───────────┐        ┌───────────┐
//!      │    Log    │        │  Console  │        │  Discord  │
//!      │ Notifier  │        │ Notifier  │        │ Notifier  │
//!      └───────────┘        └───────────┘        └───────────┘
//! ```
//!
//! - [`Notifier`] - the delivery capability adapters implement
//! - [`Listener`] - a notifier plus its subscription and filter chain

mod listener;
mod notifier;

pub use listener::{Listener, Subscription, ALL_EVENTS};
pub use notifier::{Notifier, NullNotifier};
