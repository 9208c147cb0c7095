use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{json, Value};

use fcm_notify::{FcmClient, SendOutcome};

/// Send push notifications through the FCM legacy HTTP API
#[derive(Parser)]
#[command(name = "fcm-send")]
#[command(about = "Send push notifications through the FCM legacy HTTP API")]
#[command(version)]
struct Cli {
    /// Recipient registration tokens
    #[arg(required = true)]
    tokens: Vec<String>,

    /// FCM server key used for the Authorization header
    #[arg(long, env = "FCM_SERVER_KEY", hide_env_values = true)]
    server_key: String,

    /// Notification title
    #[arg(short, long)]
    title: Option<String>,

    /// Notification body text
    #[arg(short, long)]
    body: Option<String>,

    /// Custom data payload as a JSON object
    #[arg(short, long)]
    data: Option<String>,

    /// Override the send endpoint URL
    #[arg(long, hide = true)]
    endpoint: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let notification = build_notification(&cli);
    let data = parse_data(cli.data.as_deref())?;

    let client = match &cli.endpoint {
        Some(endpoint) => FcmClient::with_endpoint(&cli.server_key, endpoint),
        None => FcmClient::new(&cli.server_key),
    }?;

    let outcomes = if let [token] = cli.tokens.as_slice() {
        vec![client.send_to(token, notification.as_ref(), data.as_ref())?]
    } else {
        client.send(&cli.tokens, notification.as_ref(), data.as_ref())?
    };

    let mut rejected = 0;
    for outcome in &outcomes {
        match outcome {
            SendOutcome::Delivered(response) => {
                println!(
                    "200 OK: success={} failure={} canonical_ids={}",
                    response.success.unwrap_or(0),
                    response.failure.unwrap_or(0),
                    response.canonical_ids.unwrap_or(0)
                );
                for (token, result) in &response.results {
                    if let Some(error) = &result.error {
                        eprintln!("  {token}: {error}");
                    }
                }
            }
            SendOutcome::Rejected { status, body } => {
                rejected += 1;
                eprintln!("HTTP {status}: {body}");
            }
        }
    }

    if rejected > 0 {
        bail!("{rejected} of {} requests were rejected", outcomes.len());
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                log_level
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            ),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_notification(cli: &Cli) -> Option<Value> {
    if cli.title.is_none() && cli.body.is_none() {
        return None;
    }

    let mut notification = json!({});
    if let Some(title) = &cli.title {
        notification["title"] = json!(title);
    }
    if let Some(body) = &cli.body {
        notification["body"] = json!(body);
    }
    Some(notification)
}

fn parse_data(raw: Option<&str>) -> Result<Option<Value>> {
    raw.map(|text| {
        serde_json::from_str(text).context("--data must be a valid JSON object")
    })
    .transpose()
}
