use std::sync::{Arc, Mutex};

use alertbus::domain::Event;
use alertbus::error::DeliveryError;
use alertbus::port::Notifier;
use async_trait::async_trait;

/// Thread-safe event collector for notification assertions in tests.
///
/// Clones share the same buffer, so keep one handle and register another.
#[derive(Clone)]
pub struct RecordingNotifier {
    name: String,
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingNotifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Arc::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("lock notifier events").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("lock notifier events").clone()
    }

    pub fn event_types(&self) -> Vec<String> {
        self.events()
            .iter()
            .map(|event| event.event_type().to_string())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn deliver(&self, event: &Event) -> Result<(), DeliveryError> {
        self.events
            .lock()
            .expect("lock notifier events")
            .push(event.clone());
        Ok(())
    }
}
