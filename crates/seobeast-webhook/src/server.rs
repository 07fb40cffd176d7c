use std::net::SocketAddr;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::{Span, info, instrument};

use crate::config::WebhookConfig;
use crate::error::WebhookError;
use crate::payload::{EventKind, WebhookPayload};
use crate::revalidate::{Revalidate, revalidation_requests};
use crate::signal::shutdown_signal;
use crate::signature::{self, SIGNATURE_HEADER};

pub const WEBHOOK_PATH: &str = "/api/webhook";

/// Shared request state. Cloned per request; the revalidator is expected
/// to be a cheap handle.
#[derive(Clone)]
pub struct AppState<R> {
    revalidator: R,
    webhook_secret: Option<String>,
    blog_path: String,
}

impl<R: Revalidate> AppState<R> {
    pub fn new(config: &WebhookConfig, revalidator: R) -> Self {
        Self {
            revalidator,
            webhook_secret: config.webhook_secret.clone(),
            blog_path: config.blog_path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accepted {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub message: String,
    pub status: String,
}

pub fn router<R: Revalidate>(state: AppState<R>) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(handle_webhook::<R>).get(endpoint_info))
        .with_state(state)
}

/// Starts the webhook HTTP server on `0.0.0.0:{port}` and runs until
/// SIGINT/SIGTERM.
pub async fn serve<R: Revalidate>(config: &WebhookConfig, revalidator: R) -> std::io::Result<()> {
    let app = router(AppState::new(config, revalidator));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, path = WEBHOOK_PATH, "SEOBeast webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn endpoint_info() -> Json<EndpointInfo> {
    Json(EndpointInfo {
        message: "SEOBeast webhook endpoint".to_string(),
        status: "active".to_string(),
    })
}

/// Verification order is fixed: secret, signature header, signature,
/// payload. The body is never parsed before the signature checks out.
#[instrument(
    name = "seobeast.webhook",
    skip_all,
    fields(
        event = tracing::field::Empty,
        slug = tracing::field::Empty,
        kind = tracing::field::Empty,
    )
)]
async fn handle_webhook<R: Revalidate>(
    State(state): State<AppState<R>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Accepted>, WebhookError> {
    let Some(secret) = state.webhook_secret.as_deref() else {
        return Err(WebhookError::NotConfigured);
    };

    let signature = match headers.get(SIGNATURE_HEADER) {
        None => return Err(WebhookError::MissingSignature),
        Some(value) if value.is_empty() => return Err(WebhookError::MissingSignature),
        Some(value) => value.to_str().map_err(|_| WebhookError::InvalidSignature)?,
    };

    if !signature::verify(&body, signature, secret) {
        return Err(WebhookError::InvalidSignature);
    }

    let payload = WebhookPayload::parse(&body).map_err(WebhookError::InvalidPayload)?;
    let kind = payload.kind();

    let span = Span::current();
    span.record("event", payload.event.as_str());
    span.record("slug", payload.data.slug.as_str());
    span.record("kind", tracing::field::display(kind));

    info!("Received webhook event");

    let requests = revalidation_requests(&payload, &state.blog_path);
    for request in &requests {
        state
            .revalidator
            .revalidate(request)
            .await
            .map_err(|e| WebhookError::Revalidation(e.to_string()))?;
    }

    match kind {
        EventKind::Update => {
            let paths: Vec<&str> = requests.iter().map(|r| r.path.as_str()).collect();
            info!(paths = ?paths, "Revalidated paths for post");
        }
        EventKind::Removal => info!("Revalidated blog listing after removal"),
        EventKind::Unknown => info!("No cache action for unrecognised event"),
    }

    Ok(Json(Accepted { success: true }))
}
