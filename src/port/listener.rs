//! Listener registrations.
//!
//! A [`Listener`] pairs a [`Notifier`] with what it subscribes to and the
//! filters that gate it.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use super::notifier::Notifier;
use crate::domain::{Event, EventFilter, FilterChain};

/// Event type that subscribes a listener to every event.
pub const ALL_EVENTS: &str = "*";

/// Which event types a listener receives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Subscription {
    /// Every event type.
    #[default]
    All,
    /// Only the named event types.
    Types(BTreeSet<String>),
}

impl Subscription {
    /// Build a subscription from a list of event types.
    ///
    /// An empty list, or any entry equal to `"*"`, subscribes to everything.
    pub fn from_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let types: BTreeSet<String> = types.into_iter().map(Into::into).collect();
        if types.is_empty() || types.contains(ALL_EVENTS) {
            Self::All
        } else {
            Self::Types(types)
        }
    }

    pub fn matches(&self, event_type: &str) -> bool {
        match self {
            Self::All => true,
            Self::Types(types) => types.contains(event_type),
        }
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_EVENTS),
            Self::Types(types) => {
                let joined: Vec<&str> = types.iter().map(String::as_str).collect();
                f.write_str(&joined.join(","))
            }
        }
    }
}

/// A registered consumer of events.
#[derive(Clone)]
pub struct Listener {
    name: String,
    subscription: Subscription,
    filters: FilterChain,
    notifier: Arc<dyn Notifier>,
}

impl Listener {
    /// Create a listener subscribed to all events, named after its notifier.
    pub fn new(notifier: impl Notifier + 'static) -> Self {
        Self::from_arc(Arc::new(notifier))
    }

    /// Like [`new`](Self::new), for a notifier that is already shared.
    pub fn from_arc(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            name: notifier.name().to_string(),
            subscription: Subscription::All,
            filters: FilterChain::new(),
            notifier,
        }
    }

    /// Override the diagnostic name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Restrict the listener to the given event types (`"*"` means all).
    #[must_use]
    pub fn subscribe_to<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subscription = Subscription::from_types(types);
        self
    }

    #[must_use]
    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscription = subscription;
        self
    }

    /// Append a filter to the chain.
    #[must_use]
    pub fn with_filter(mut self, filter: impl EventFilter + 'static) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn is_subscribed(&self, event_type: &str) -> bool {
        self.subscription.matches(event_type)
    }

    /// Whether the filter chain lets this event through.
    pub fn accepts(&self, event: &Event) -> bool {
        self.filters.passes(event)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("name", &self.name)
            .field("subscription", &self.subscription)
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}
