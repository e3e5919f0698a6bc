//! Handler for the `run` command.

use tracing::info;

use crate::app::{App, Config};
use crate::cli::{banner, RunArgs};
use crate::error::Result;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load_or_default(&args.config)?;
    apply_overrides(&mut config, args);
    config.validate()?;

    config.init_logging();

    if !args.no_banner {
        banner::print_banner();
    }

    info!(
        config = %args.config.display(),
        host = %config.server.host,
        port = config.server.port,
        console = config.console.enabled,
        discord = config.discord.webhook_url.is_some(),
        heartbeat = config.heartbeat.url.is_some(),
        "alertbus starting"
    );

    App::run(config).await
}

fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
}
