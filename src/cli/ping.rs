//! One-shot commands: `ping` and `url`.

use anyhow::{Context, Result};
use reqwest::Url;
use serde_json::json;

use keepalive::{Config, HeartbeatService};

/// Send a single heartbeat. Failures are reported, never returned.
pub(crate) async fn cmd_ping(as_json: bool) -> Result<()> {
    let config = Config::load().with_context(|| "Failed to load configuration")?;
    let service =
        HeartbeatService::from_config(&config).with_context(|| "Failed to create heartbeat")?;

    println!("{}", ping_report(&service, as_json).await?);
    Ok(())
}

/// Run one heartbeat through `service` and render its outcome.
pub(crate) async fn ping_report(service: &HeartbeatService, as_json: bool) -> Result<String> {
    let outcome = service.trigger_now().await;
    format_outcome(service.endpoint(), &outcome, as_json)
}

fn format_outcome(endpoint: &Url, outcome: &keepalive::Result<u16>, as_json: bool) -> Result<String> {
    if as_json {
        let value = match outcome {
            Ok(status) => json!({
                "endpoint": endpoint.as_str(),
                "ok": true,
                "status": status,
            }),
            Err(e) => json!({
                "endpoint": endpoint.as_str(),
                "ok": false,
                "error": e.to_string(),
            }),
        };
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    Ok(match outcome {
        Ok(status) => format!("{} -> {}", endpoint, status),
        Err(e) => format!("{} -> failed: {}", endpoint, e),
    })
}

/// Print the endpoint the heartbeat would poll.
pub(crate) fn cmd_url() -> Result<()> {
    let config = Config::load().with_context(|| "Failed to load configuration")?;
    println!("{}", url_line(&config));
    Ok(())
}

fn url_line(config: &Config) -> String {
    config.endpoint.to_string()
}
