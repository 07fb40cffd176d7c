//! Cache revalidation: which rendered paths an event makes stale, and the
//! seam through which they are invalidated.

use std::future::Future;
use std::time::Duration;

use async_nats::jetstream::{self, stream};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::payload::{EventKind, WebhookPayload};

pub const DEFAULT_BLOG_PATH: &str = "/blog";

/// One stale path, as published to the rendering tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevalidationRequest {
    pub path: String,
    pub event: String,
    pub slug: String,
}

/// Invalidates one cached path. Invalidating the same path twice must be
/// harmless, so implementations need no cross-request coordination.
pub trait Revalidate: Send + Sync + Clone + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    fn revalidate(
        &self,
        request: &RevalidationRequest,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Paths made stale by `payload`.
///
/// Updates touch the post page and the listing; removals only the listing
/// (the post page 404s on its next render); unknown events touch nothing.
pub fn revalidation_paths(payload: &WebhookPayload, blog_path: &str) -> Vec<String> {
    let listing = blog_path.trim_end_matches('/');
    let listing = if listing.is_empty() { "/" } else { listing };

    match payload.kind() {
        EventKind::Update => vec![post_path(listing, &payload.data.slug), listing.to_string()],
        EventKind::Removal => vec![listing.to_string()],
        EventKind::Unknown => Vec::new(),
    }
}

fn post_path(listing: &str, slug: &str) -> String {
    if listing == "/" {
        format!("/{slug}")
    } else {
        format!("{listing}/{slug}")
    }
}

/// Builds the requests for every path `payload` makes stale.
pub fn revalidation_requests(payload: &WebhookPayload, blog_path: &str) -> Vec<RevalidationRequest> {
    revalidation_paths(payload, blog_path)
        .into_iter()
        .map(|path| RevalidationRequest {
            path,
            event: payload.event.to_string(),
            slug: payload.data.slug.clone(),
        })
        .collect()
}

pub fn revalidate_subject(prefix: &str) -> String {
    format!("{prefix}.revalidate")
}

#[derive(Debug, Error)]
pub enum RevalidateError {
    #[error("failed to encode revalidation request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to publish revalidation to {subject}: {error}")]
    Publish { subject: String, error: String },

    #[error("JetStream did not acknowledge revalidation on {subject}: {error}")]
    Ack { subject: String, error: String },
}

/// Publishes revalidations to JetStream for the rendering tier to consume.
///
/// Subject: `{prefix}.revalidate`. Headers: `X-Revalidate-Path`,
/// `X-Webhook-Event`. Payload: JSON [`RevalidationRequest`].
#[derive(Clone)]
pub struct NatsRevalidator {
    js: jetstream::Context,
    subject: String,
}

impl NatsRevalidator {
    pub fn new(js: jetstream::Context, subject_prefix: &str) -> Self {
        Self {
            js,
            subject: revalidate_subject(subject_prefix),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

impl Revalidate for NatsRevalidator {
    type Error = RevalidateError;

    async fn revalidate(&self, request: &RevalidationRequest) -> Result<(), RevalidateError> {
        let payload = serde_json::to_vec(request)?;

        let mut headers = async_nats::HeaderMap::new();
        headers.insert("X-Revalidate-Path", request.path.as_str());
        headers.insert("X-Webhook-Event", request.event.as_str());

        let ack = self
            .js
            .publish_with_headers(self.subject.clone(), headers, payload.into())
            .await
            .map_err(|e| RevalidateError::Publish {
                subject: self.subject.clone(),
                error: e.to_string(),
            })?;

        ack.await.map_err(|e| RevalidateError::Ack {
            subject: self.subject.clone(),
            error: e.to_string(),
        })?;

        debug!(path = %request.path, subject = %self.subject, "Published revalidation");
        Ok(())
    }
}

/// Creates the stream capturing `{prefix}.>` if it does not exist yet.
pub async fn ensure_stream(
    js: &jetstream::Context,
    stream_name: &str,
    subject_prefix: &str,
    max_age: Duration,
) -> Result<(), jetstream::context::CreateStreamError> {
    js.get_or_create_stream(stream::Config {
        name: stream_name.to_string(),
        subjects: vec![format!("{subject_prefix}.>")],
        max_age,
        ..Default::default()
    })
    .await?;

    info!(stream = stream_name, "JetStream stream ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(event: &str, slug: &str) -> WebhookPayload {
        let body = format!(
            r#"{{"event":"{event}","timestamp":"t","data":{{"postId":"1","slug":"{slug}","websiteSlug":"demo"}}}}"#
        );
        WebhookPayload::parse(body.as_bytes()).unwrap()
    }

    #[test]
    fn update_events_touch_post_and_listing() {
        for event in ["post.created", "post.updated", "post.published"] {
            assert_eq!(
                revalidation_paths(&payload(event, "hello-world"), DEFAULT_BLOG_PATH),
                vec!["/blog/hello-world", "/blog"],
                "event {event}"
            );
        }
    }

    #[test]
    fn removal_events_touch_only_listing() {
        for event in ["post.deleted", "post.unpublished"] {
            assert_eq!(
                revalidation_paths(&payload(event, "hello-world"), DEFAULT_BLOG_PATH),
                vec!["/blog"],
                "event {event}"
            );
        }
    }

    #[test]
    fn unknown_events_touch_nothing() {
        assert!(revalidation_paths(&payload("post.archived", "x"), DEFAULT_BLOG_PATH).is_empty());
    }

    #[test]
    fn custom_blog_path_is_normalised() {
        assert_eq!(
            revalidation_paths(&payload("post.updated", "a"), "/news/"),
            vec!["/news/a", "/news"]
        );
        assert_eq!(
            revalidation_paths(&payload("post.updated", "a"), "/"),
            vec!["/a", "/"]
        );
    }

    #[test]
    fn requests_carry_event_and_slug() {
        let requests = revalidation_requests(&payload("post.deleted", "gone"), DEFAULT_BLOG_PATH);

        assert_eq!(
            requests,
            vec![RevalidationRequest {
                path: "/blog".to_string(),
                event: "post.deleted".to_string(),
                slug: "gone".to_string(),
            }]
        );
    }

    #[test]
    fn subject_uses_prefix() {
        assert_eq!(revalidate_subject("seobeast"), "seobeast.revalidate");
    }

    #[test]
    fn request_json_shape() {
        let request = RevalidationRequest {
            path: "/blog/a".to_string(),
            event: "post.updated".to_string(),
            slug: "a".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"path": "/blog/a", "event": "post.updated", "slug": "a"})
        );
    }
}
