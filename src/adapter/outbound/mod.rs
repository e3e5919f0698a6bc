//! Outbound adapters (driven side).

pub mod heartbeat;
pub mod notifier;

pub use heartbeat::HeartbeatMonitor;
