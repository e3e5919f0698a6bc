//! Listener registry.
//!
//! Copy-on-write: registration swaps in a new listener list, and each
//! dispatch works from the snapshot it resolved. Registration can therefore
//! interleave with dispatch, and the lock is never held across an `.await`.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::port::Listener;

/// Registry of listeners, kept in registration order.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RwLock<Arc<Vec<Arc<Listener>>>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    ///
    /// Duplicate names are allowed; they are logged and reported by
    /// [`duplicate_names`](Self::duplicate_names).
    pub fn register(&self, listener: Listener) {
        let mut guard = self.listeners.write();
        if guard.iter().any(|existing| existing.name() == listener.name()) {
            warn!(listener = %listener.name(), "Registering listener with duplicate name");
        }

        info!(
            listener = %listener.name(),
            subscription = %listener.subscription(),
            filters = listener.filters().len(),
            "Registered listener"
        );

        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(Arc::new(listener));
        *guard = Arc::new(next);
    }

    /// Remove every listener with the given name. Returns how many were removed.
    pub fn unregister(&self, name: &str) -> usize {
        let mut guard = self.listeners.write();
        let next: Vec<Arc<Listener>> = guard
            .iter()
            .filter(|listener| listener.name() != name)
            .cloned()
            .collect();
        let removed = guard.len() - next.len();

        if removed > 0 {
            *guard = Arc::new(next);
            info!(listener = %name, removed, "Unregistered listener");
        }
        removed
    }

    /// Listeners subscribed to `event_type` (or to all types), in
    /// registration order.
    #[must_use]
    pub fn resolve(&self, event_type: &str) -> Vec<Arc<Listener>> {
        self.snapshot()
            .iter()
            .filter(|listener| listener.is_subscribed(event_type))
            .cloned()
            .collect()
    }

    /// The current listener list.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<Arc<Listener>>> {
        Arc::clone(&self.listeners.read())
    }

    /// Listener names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.snapshot()
            .iter()
            .map(|listener| listener.name().to_string())
            .collect()
    }

    /// Names registered more than once.
    #[must_use]
    pub fn duplicate_names(&self) -> Vec<String> {
        let snapshot = self.snapshot();
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for listener in snapshot.iter() {
            let name = listener.name();
            if !seen.insert(name) && !duplicates.iter().any(|d: &String| d == name) {
                duplicates.push(name.to_string());
            }
        }
        duplicates
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }
}
