//! Per-publish dispatch reports.

use uuid::Uuid;

use crate::error::DeliveryFailure;

/// What happened to one resolved listener during a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// `deliver` completed successfully.
    Delivered,
    /// The listener's filter chain rejected the event.
    Filtered,
    /// Filters passed but the event's notification threshold did not.
    BelowThreshold,
    /// `deliver` was invoked and failed, panicked or timed out.
    Failed(DeliveryFailure),
}

/// Outcome for a single listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerOutcome {
    pub listener: String,
    pub status: DeliveryStatus,
}

/// Result of one complete publish-to-listeners pipeline.
///
/// Outcomes are listed in resolution order, independent of the order in
/// which deliveries completed.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    event_id: Uuid,
    event_type: String,
    outcomes: Vec<ListenerOutcome>,
}

impl DispatchReport {
    pub(crate) fn new(event_id: Uuid, event_type: impl Into<String>) -> Self {
        Self {
            event_id,
            event_type: event_type.into(),
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, listener: impl Into<String>, status: DeliveryStatus) {
        self.outcomes.push(ListenerOutcome {
            listener: listener.into(),
            status,
        });
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn outcomes(&self) -> &[ListenerOutcome] {
        &self.outcomes
    }

    /// Number of listeners the event resolved to.
    pub fn resolved(&self) -> usize {
        self.outcomes.len()
    }

    pub fn delivered(&self) -> usize {
        self.count(|status| matches!(status, DeliveryStatus::Delivered))
    }

    pub fn filtered(&self) -> usize {
        self.count(|status| matches!(status, DeliveryStatus::Filtered))
    }

    pub fn below_threshold(&self) -> usize {
        self.count(|status| matches!(status, DeliveryStatus::BelowThreshold))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, DeliveryStatus::Failed(_)))
    }

    /// Failed listeners with the reason each one failed.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &DeliveryFailure)> {
        self.outcomes.iter().filter_map(|outcome| match &outcome.status {
            DeliveryStatus::Failed(failure) => Some((outcome.listener.as_str(), failure)),
            _ => None,
        })
    }

    /// Status for the first listener with the given name.
    pub fn status_of(&self, listener: &str) -> Option<&DeliveryStatus> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.listener == listener)
            .map(|outcome| &outcome.status)
    }

    /// True when no listener was subscribed to the event.
    pub fn is_unrouted(&self) -> bool {
        self.outcomes.is_empty()
    }

    fn count(&self, predicate: impl Fn(&DeliveryStatus) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.status))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn counts_each_status() {
        let mut report = DispatchReport::new(Uuid::new_v4(), "price_alert");
        report.record("a", DeliveryStatus::Delivered);
        report.record("b", DeliveryStatus::Filtered);
        report.record("c", DeliveryStatus::BelowThreshold);
        report.record(
            "d",
            DeliveryStatus::Failed(DeliveryFailure::TimedOut(Duration::from_secs(1))),
        );

        assert_eq!(report.resolved(), 4);
        assert_eq!(report.delivered(), 1);
        assert_eq!(report.filtered(), 1);
        assert_eq!(report.below_threshold(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.status_of("b"), Some(&DeliveryStatus::Filtered));

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "d");
    }

    #[test]
    fn empty_report_is_unrouted() {
        let report = DispatchReport::new(Uuid::new_v4(), "tick");
        assert!(report.is_unrouted());
        assert_eq!(report.event_type(), "tick");
    }
}
