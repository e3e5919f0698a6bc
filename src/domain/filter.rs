//! Listener-side event filters.
//!
//! Filters decide whether a listener cares about an event at all; the
//! notification threshold then decides whether that particular event is
//! worth notifying about. Filters must be side-effect free.

use std::fmt;
use std::sync::Arc;

use super::event::Event;
use super::priority::Priority;

/// A predicate over an event.
pub trait EventFilter: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Returns `true` if the event passes.
    fn passes(&self, event: &Event) -> bool;
}

/// Passes events at or above a minimum priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityFilter {
    min_priority: Priority,
}

impl PriorityFilter {
    #[must_use]
    pub const fn new(min_priority: Priority) -> Self {
        Self { min_priority }
    }

    pub fn min_priority(&self) -> Priority {
        self.min_priority
    }
}

impl EventFilter for PriorityFilter {
    fn name(&self) -> &str {
        "priority"
    }

    fn passes(&self, event: &Event) -> bool {
        event.priority() >= self.min_priority
    }
}

/// Ordered AND over a list of filters. An empty chain passes everything.
#[derive(Clone, Default)]
pub struct FilterChain {
    filters: Vec<Arc<dyn EventFilter>>,
}

impl FilterChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter; filters run in insertion order.
    pub fn push(&mut self, filter: impl EventFilter + 'static) {
        self.filters.push(Arc::new(filter));
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, filter: impl EventFilter + 'static) -> Self {
        self.push(filter);
        self
    }

    /// Short-circuits on the first failing filter.
    pub fn passes(&self, event: &Event) -> bool {
        self.filters.iter().all(|filter| filter.passes(event))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.filters.iter().map(|filter| filter.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event(priority: Priority) -> Event {
        Event::builder("price_alert")
            .priority(priority)
            .build()
            .unwrap()
    }

    struct CountingReject {
        calls: Arc<AtomicUsize>,
    }

    impl EventFilter for CountingReject {
        fn name(&self) -> &str {
            "reject"
        }

        fn passes(&self, _event: &Event) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            false
        }
    }

    #[test]
    fn priority_filter_is_a_floor() {
        let filter = PriorityFilter::new(Priority::High);

        assert!(!filter.passes(&event(Priority::Medium)));
        assert!(filter.passes(&event(Priority::High)));
        assert!(filter.passes(&event(Priority::Critical)));
    }

    #[test]
    fn empty_chain_passes() {
        let chain = FilterChain::new();
        assert!(chain.is_empty());
        assert!(chain.passes(&event(Priority::Low)));
    }

    #[test]
    fn chain_requires_every_filter() {
        let chain = FilterChain::new()
            .with(PriorityFilter::new(Priority::Low))
            .with(PriorityFilter::new(Priority::High));

        assert!(!chain.passes(&event(Priority::Medium)));
        assert!(chain.passes(&event(Priority::Critical)));
    }

    #[test]
    fn chain_stops_at_first_failure() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let chain = FilterChain::new()
            .with(CountingReject {
                calls: first.clone(),
            })
            .with(CountingReject {
                calls: second.clone(),
            });

        assert!(!chain.passes(&event(Priority::Critical)));
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn debug_lists_filter_names() {
        let chain = FilterChain::new().with(PriorityFilter::new(Priority::Low));
        assert_eq!(format!("{chain:?}"), "[\"priority\"]");
    }
}
