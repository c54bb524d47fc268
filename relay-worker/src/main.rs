//! JobAlert Relay - fetches unread LinkedIn Job Alert emails from Gmail,
//! extracts the embedded job postings, and publishes each parsed alert as a
//! JSON message to RabbitMQ.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobalert::{pipeline, Config, GmailClient, Publisher};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    tracing::info!("relay_starting");

    // Load configuration from environment
    let config = Config::from_env();
    tracing::info!(
        environment = %config.environment,
        queue_destination = %config.queue_destination,
        gmail_query = %config.gmail_query,
        alert_sender = %config.alert_sender,
        max_results = config.max_results,
        "config_loaded"
    );

    if config.gmail_access_token.is_empty() {
        anyhow::bail!("GMAIL_ACCESS_TOKEN must be set");
    }

    let gmail = GmailClient::new(config.gmail_access_token.clone())?;
    let publisher = Publisher::new(config.amqp_url.clone(), config.queue_destination.clone());

    let tally = pipeline::run(&config, &gmail, &publisher).await?;

    tracing::info!(
        fetched = tally.fetched,
        published = tally.published,
        skipped = tally.skipped,
        failed = tally.failed,
        "batch_complete"
    );

    publisher.close().await;

    Ok(())
}
