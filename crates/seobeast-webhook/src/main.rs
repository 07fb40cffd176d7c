use seobeast_std::env::SystemEnv;
use seobeast_webhook::{NatsRevalidator, WebhookConfig, nats, revalidate, serve};
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = WebhookConfig::from_env(&SystemEnv);
    info!(config = ?config, "Starting SEOBeast webhook receiver");
    if config.webhook_secret.is_none() {
        warn!("SEOBEAST_WEBHOOK_SECRET is not set, every delivery will be rejected with 500");
    }

    let client = nats::connect(&config.nats)
        .await
        .expect("Failed to connect to NATS");
    let js = async_nats::jetstream::new(client);

    revalidate::ensure_stream(
        &js,
        &config.stream_name,
        &config.subject_prefix,
        config.stream_max_age,
    )
    .await
    .expect("Failed to create JetStream stream");

    let revalidator = NatsRevalidator::new(js, &config.subject_prefix);

    serve(&config, revalidator).await.expect("Server failed");
}
