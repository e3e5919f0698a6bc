//! Application services.
//!
//! The event bus is the only use case: route published events to the
//! listeners that should hear about them.

pub mod bus;

pub use bus::{
    BusConfig, BusStats, DeliveryStatus, DispatchReport, EventBus, ListenerOutcome,
    ListenerRegistry,
};
