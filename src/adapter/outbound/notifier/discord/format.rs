//! Message formatting for Discord webhook notifications.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{Event, Priority};

/// Discord caps embeds at 25 fields; one is reserved for the priority.
const MAX_DATA_FIELDS: usize = 24;
/// Discord caps field values at 1024 characters.
const MAX_FIELD_VALUE: usize = 1024;

/// Body of a webhook `POST`.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub username: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub timestamp: String,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Embed colour for a priority level.
pub fn priority_color(priority: Priority) -> u32 {
    match priority {
        Priority::Low => 0x0080_8080,
        Priority::Medium => 0x0034_98db,
        Priority::High => 0x00f3_9c12,
        Priority::Critical => 0x00e7_4c3c,
    }
}

/// Format an event into a webhook payload with one embed.
pub fn format_event_message(event: &Event, username: &str) -> WebhookPayload {
    let mut fields: Vec<EmbedField> = event
        .data()
        .iter()
        .take(MAX_DATA_FIELDS)
        .map(|(key, value)| EmbedField {
            name: title_case(key),
            value: field_value(value),
            inline: true,
        })
        .collect();

    fields.push(EmbedField {
        name: "Priority".to_string(),
        value: event.priority().to_string(),
        inline: true,
    });

    WebhookPayload {
        username: username.to_string(),
        embeds: vec![Embed {
            title: format!("🔔 {}", event.event_type()),
            color: priority_color(event.priority()),
            timestamp: event.created_at().to_rfc3339(),
            fields,
        }],
    }
}

/// `change_percent` -> `Change Percent`.
fn title_case(key: &str) -> String {
    key.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn field_value(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    if text.is_empty() {
        return "-".to_string();
    }
    truncate(&text, MAX_FIELD_VALUE)
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars - 1).collect();
        out.push('…');
        out
    }
}
