//! # M2X CLI
//!
//! Command-line utilities for inspecting devices and debugging requests.

use anyhow::{bail, Context, Result};
use m2x_client::{Client, ClientConfig, Params, Response, StreamValue};
use m2x_core::endpoint;
use serde_json::{json, Value};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_help();
        return Ok(());
    };
    let rest: Vec<&str> = args[1..].iter().map(String::as_str).collect();

    match command.as_str() {
        "url" => print_url(&rest)?,
        "help" | "--help" | "-h" => print_help(),
        _ => run_remote(command, &rest).await?,
    }

    Ok(())
}

/// Print the request an operation would issue, without sending it.
fn print_url(args: &[&str]) -> Result<()> {
    let Some((name, ids)) = args.split_first() else {
        bail!("Usage: m2x url <operation> [ids...]");
    };
    let endpoint = endpoint::find(name).with_context(|| format!("Unknown operation: {name}"))?;
    let path = endpoint.path(ids).context("Failed to resolve path")?;

    println!("{} {}", endpoint.method, path);
    if endpoint.json {
        println!("Content-Type: application/json");
    }
    Ok(())
}

async fn run_remote(command: &str, args: &[&str]) -> Result<()> {
    let config = ClientConfig::from_env().context("Invalid configuration")?;
    tracing::debug!(base_url = %config.base_url, command, "Running command");

    let client = Client::new(config).context("Failed to create client")?;
    let devices = client.devices();

    let response = match (command, args) {
        ("catalog", []) => devices.catalog(None).await,
        ("list", []) => devices.list().await,
        ("groups", []) => devices.groups().await,
        ("view", [id]) => devices.view(id).await,
        ("location", [id]) => devices.location(id).await,
        ("streams", [id]) => devices.streams(id).await,
        ("stream", [id, name]) => devices.stream(id, name).await,
        ("values", [id, name]) => devices.stream_values(id, name, None).await,
        ("values", [id, name, limit]) => {
            let limit: u64 = limit.parse().context("limit must be a number")?;
            let mut params = Params::new();
            params.insert("limit".to_string(), json!(limit));
            devices.stream_values(id, name, Some(params)).await
        }
        ("post", [id, name, value]) => {
            devices
                .post_values(id, name, &[StreamValue::now(parse_value(value))])
                .await
        }
        ("triggers", [id]) => devices.triggers(id).await,
        ("log", [id]) => devices.log(id).await,
        ("keys", [id]) => devices.keys(id).await,
        _ => {
            eprintln!("Unknown command or wrong arguments: {command}");
            print_help();
            std::process::exit(1);
        }
    };

    print_response(&response.context("Request failed")?)
}

/// Numbers are posted as numbers, everything else as text.
fn parse_value(raw: &str) -> Value {
    raw.parse::<f64>()
        .ok()
        .and_then(|n| serde_json::Number::from_f64(n).map(Value::Number))
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

fn print_response(response: &Response) -> Result<()> {
    match &response.body {
        Some(body) => println!("{}", serde_json::to_string_pretty(body)?),
        None => println!("({} no content)", response.status),
    }
    Ok(())
}

fn print_help() {
    println!(
        r#"M2X CLI

USAGE:
    m2x <COMMAND> [ARGS]

COMMANDS:
    catalog                      List public devices
    list                         List devices
    groups                       List device groups
    view <device>                Show device details
    location <device>            Show device location
    streams <device>             List device streams
    stream <device> <stream>     Show stream details
    values <device> <stream> [limit]
                                 List stream values, most recent first
    post <device> <stream> <value>
                                 Post a value stamped by the server
    triggers <device>            List device triggers
    log <device>                 Show device request log
    keys <device>                List API keys bound to a device
    url <operation> [ids...]     Print the request an operation issues
    help                         Show this help message

ENVIRONMENT:
    M2X_API_KEY       API key
    M2X_BASE_URL      API base URL (default https://api-m2x.att.com/v2)
    M2X_TIMEOUT_SECS  Request timeout in seconds
    RUST_LOG          Log filter (default warn)

EXAMPLES:
    m2x url streamValues abc123 temperature
    m2x values abc123 temperature 10
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_stay_numeric() {
        assert_eq!(parse_value("21.5"), json!(21.5));
        assert_eq!(parse_value("open"), json!("open"));
    }

    #[test]
    fn url_needs_known_operation() {
        assert!(print_url(&["streamValues", "abc", "temp"]).is_ok());
        assert!(print_url(&["nope"]).is_err());
        assert!(print_url(&["view"]).is_err());
        assert!(print_url(&[]).is_err());
    }
}
