use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("SEOBeast website slug is not configured")]
    MissingWebsiteSlug,

    #[error("invalid SEOBeast API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("SEOBeast API resource not found: {path}")]
    NotFound { path: String },

    #[error("SEOBeast API error: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("SEOBeast API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode SEOBeast API response: {0}")]
    Decode(#[from] serde_json::Error),
}
