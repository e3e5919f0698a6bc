//! Handler for the `send` command.

use std::time::Duration;

use serde_json::{json, Map, Value};

use crate::cli::SendArgs;
use crate::error::{Error, Result};

/// Post an event to a running service and print its answer.
pub async fn execute(args: &SendArgs) -> Result<()> {
    let body = request_body(args)?;
    let url = format!("{}/event", args.url.trim_end_matches('/'));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let response = client.post(&url).json(&body).send().await?;
    let status = response.status();
    let answer: Value = response.json().await?;

    println!("{}", serde_json::to_string_pretty(&answer)?);
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::Server(format!("service returned {status}")))
    }
}

/// Build the `POST /event` body from command-line arguments.
fn request_body(args: &SendArgs) -> Result<Value> {
    let mut body = Map::new();
    body.insert("event_type".to_string(), json!(args.event_type));

    if let Some(data) = &args.data {
        body.insert("data".to_string(), serde_json::from_str(data)?);
    }
    if let Some(priority) = &args.priority {
        body.insert("priority".to_string(), json!(priority));
    }
    if let Some(threshold) = &args.threshold {
        body.insert("notify_threshold".to_string(), serde_json::from_str(threshold)?);
    }

    Ok(Value::Object(body))
}
