//! Terminal notifier.
//!
//! Prints a framed block per event to stdout. Colour is only used when stdout
//! supports it, so piping the service into a file stays readable.

use std::io::Write;

use async_trait::async_trait;
use owo_colors::{OwoColorize, Stream};

use crate::domain::{Event, Priority};
use crate::error::DeliveryError;
use crate::port::Notifier;

const RULE_WIDTH: usize = 50;

/// Notifier that writes human-readable event blocks to stdout.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    async fn deliver(&self, event: &Event) -> Result<(), DeliveryError> {
        write_block(&render(event)).map_err(|e| DeliveryError::Other(format!("stdout: {e}")))
    }
}

fn write_block(block: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(block.as_bytes())?;
    stdout.flush()
}

/// Render the block printed for `event`.
pub(crate) fn render(event: &Event) -> String {
    let rule = "═".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(
        "🔔 {} [{}]\n",
        event
            .event_type()
            .if_supports_color(Stream::Stdout, |t| t.bold()),
        priority_label(event.priority()),
    ));
    out.push_str(&format!(
        "{}\n",
        event
            .created_at()
            .format("%Y-%m-%d %H:%M:%S UTC")
            .if_supports_color(Stream::Stdout, |t| t.dimmed()),
    ));
    out.push_str(&"─".repeat(RULE_WIDTH));
    out.push('\n');

    if event.data().is_empty() {
        out.push_str("  (no data)\n");
    }
    for (key, value) in event.data() {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        out.push_str(&format!(
            "  {}: {value}\n",
            key.if_supports_color(Stream::Stdout, |t| t.cyan())
        ));
    }

    out.push_str(&rule);
    out.push('\n');
    out
}

fn priority_label(priority: Priority) -> String {
    let label = priority.as_str();
    match priority {
        Priority::Low => label
            .if_supports_color(Stream::Stdout, |t| t.dimmed())
            .to_string(),
        Priority::Medium => label
            .if_supports_color(Stream::Stdout, |t| t.blue())
            .to_string(),
        Priority::High => label
            .if_supports_color(Stream::Stdout, |t| t.yellow())
            .to_string(),
        Priority::Critical => label
            .if_supports_color(Stream::Stdout, |t| t.red())
            .to_string(),
    }
}
