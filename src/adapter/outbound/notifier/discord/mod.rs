//! Discord webhook notifications.
//!
//! Events are rendered as a single embed, coloured by priority, with one
//! inline field per payload key.

mod format;
mod notifier;

pub use format::{format_event_message, priority_color, Embed, EmbedField, WebhookPayload};
pub use notifier::{DiscordConfig, DiscordNotifier};
