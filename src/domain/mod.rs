//! Transport-agnostic domain types: events, priorities, thresholds, filters.

mod event;
mod filter;
mod priority;
mod threshold;

pub use event::{event_data, Event, EventBuilder, EventData};
pub use filter::{EventFilter, FilterChain, PriorityFilter};
pub use priority::{Priority, UnknownPriority};
pub use threshold::{coerce_number, Comparison, NotifyThreshold};
