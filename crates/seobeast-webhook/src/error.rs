use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Why a webhook delivery was refused.
///
/// The response body only ever carries the fixed message of the variant,
/// never the underlying cause.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Webhook not configured")]
    NotConfigured,

    #[error("Missing signature")]
    MissingSignature,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid payload")]
    InvalidPayload(#[source] crate::payload::InvalidPayload),

    #[error("Revalidation failed: {0}")]
    Revalidation(String),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotConfigured | Self::Revalidation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingSignature | Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::NotConfigured => "Webhook not configured",
            Self::MissingSignature => "Missing signature",
            Self::InvalidSignature => "Invalid signature",
            Self::InvalidPayload(_) => "Invalid payload",
            Self::Revalidation(_) => "Revalidation failed",
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        match &self {
            Self::NotConfigured => {
                tracing::error!("SEOBEAST_WEBHOOK_SECRET is not configured");
            }
            Self::Revalidation(cause) => tracing::error!(error = %cause, "Revalidation failed"),
            Self::InvalidSignature => tracing::warn!("Invalid webhook signature received"),
            Self::MissingSignature => tracing::warn!("Missing X-Webhook-Signature header"),
            Self::InvalidPayload(cause) => tracing::warn!(error = %cause, "Invalid webhook payload"),
        }

        (self.status(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::InvalidPayload;

    #[test]
    fn status_codes() {
        assert_eq!(WebhookError::NotConfigured.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(WebhookError::MissingSignature.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(WebhookError::InvalidSignature.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            WebhookError::InvalidPayload(InvalidPayload::MissingField("event")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::Revalidation("nats down".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_body_hides_cause() {
        let err = WebhookError::Revalidation("nats://10.0.0.7:4222 refused".to_string());
        assert!(err.to_string().contains("10.0.0.7"));
        assert_eq!(err.public_message(), "Revalidation failed");

        let err = WebhookError::InvalidPayload(InvalidPayload::MissingField("data.slug"));
        assert_eq!(err.public_message(), "Invalid payload");
    }

    #[test]
    fn into_response_sets_status() {
        let resp = WebhookError::InvalidSignature.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
