//! Application layer - configuration and service orchestration.

mod config;
mod orchestrator;

pub use config::{
    BusAppConfig, Config, ConsoleConfig, DiscordAppConfig, HeartbeatConfig, LoggingConfig,
    ServerConfig,
};
pub use orchestrator::{build_bus, build_listeners, App};
