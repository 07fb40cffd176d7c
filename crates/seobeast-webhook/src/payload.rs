//! Typed webhook payloads and event classification.
//!
//! ```json
//! {
//!   "event": "post.updated",
//!   "timestamp": "2024-01-01T00:00:00Z",
//!   "data": {
//!     "postId": "42",
//!     "slug": "hello-world",
//!     "websiteSlug": "demo",
//!     "status": "published",
//!     "title": "Hello World"
//!   }
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Event tag sent by SEOBeast. Tags this version does not know about are
/// kept verbatim in [`WebhookEvent::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WebhookEvent {
    PostCreated,
    PostUpdated,
    PostDeleted,
    PostPublished,
    PostUnpublished,
    Other(String),
}

/// What a webhook event means for cached pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Post content changed or became visible.
    Update,
    /// Post disappeared from the public site.
    Removal,
    /// Not an event this receiver acts on.
    Unknown,
}

impl WebhookEvent {
    pub fn as_str(&self) -> &str {
        match self {
            Self::PostCreated => "post.created",
            Self::PostUpdated => "post.updated",
            Self::PostDeleted => "post.deleted",
            Self::PostPublished => "post.published",
            Self::PostUnpublished => "post.unpublished",
            Self::Other(tag) => tag,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::PostCreated | Self::PostUpdated | Self::PostPublished => EventKind::Update,
            Self::PostDeleted | Self::PostUnpublished => EventKind::Removal,
            Self::Other(_) => EventKind::Unknown,
        }
    }
}

impl From<&str> for WebhookEvent {
    fn from(tag: &str) -> Self {
        match tag {
            "post.created" => Self::PostCreated,
            "post.updated" => Self::PostUpdated,
            "post.deleted" => Self::PostDeleted,
            "post.published" => Self::PostPublished,
            "post.unpublished" => Self::PostUnpublished,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for WebhookEvent {
    fn from(tag: String) -> Self {
        match Self::from(tag.as_str()) {
            Self::Other(_) => Self::Other(tag),
            known => known,
        }
    }
}

impl From<WebhookEvent> for String {
    fn from(event: WebhookEvent) -> Self {
        match event {
            WebhookEvent::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Update => "update",
            Self::Removal => "removal",
            Self::Unknown => "unknown",
        })
    }
}

/// Classifies a raw event tag.
pub fn classify(event: &str) -> EventKind {
    WebhookEvent::from(event).kind()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEventData {
    pub post_id: String,
    pub slug: String,
    pub website_slug: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A validated webhook delivery.
///
/// Only obtainable through [`WebhookPayload::parse`], so `event`,
/// `timestamp`, `data.post_id`, `data.slug` and `data.website_slug` are
/// always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    pub event: WebhookEvent,
    pub timestamp: String,
    pub data: PostEventData,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPayload {
    #[error("malformed JSON body: {0}")]
    Malformed(String),

    #[error("missing or empty required field `{0}`")]
    MissingField(&'static str),
}

// Required fields follow the sender's truthiness rules: a number or `true`
// is taken as its JSON text, while `null`, `""`, `0` and `false` count as
// absent. Arrays and objects are never valid field values.
#[derive(Deserialize)]
struct RawPayload {
    event: Option<Value>,
    timestamp: Option<Value>,
    data: Option<RawData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawData {
    post_id: Option<Value>,
    slug: Option<Value>,
    website_slug: Option<Value>,
    status: Option<Value>,
    title: Option<Value>,
}

fn scalar(value: Option<Value>, field: &'static str) -> Result<Option<String>, InvalidPayload> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::Bool(true)) => Ok(Some("true".to_string())),
        Some(Value::String(s)) => Ok(Some(s).filter(|s| !s.is_empty())),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Array(_) | Value::Object(_)) => Err(InvalidPayload::Malformed(format!(
            "`{field}` must be a string, number or boolean"
        ))),
    }
}

fn required(value: Option<Value>, field: &'static str) -> Result<String, InvalidPayload> {
    scalar(value, field)?.ok_or(InvalidPayload::MissingField(field))
}

impl WebhookPayload {
    /// Parses and validates an untrusted request body.
    ///
    /// The event tag is not checked against the known set; see
    /// [`WebhookEvent::kind`].
    pub fn parse(raw: &[u8]) -> Result<Self, InvalidPayload> {
        let raw: RawPayload =
            serde_json::from_slice(raw).map_err(|e| InvalidPayload::Malformed(e.to_string()))?;

        let event = required(raw.event, "event")?;
        let timestamp = required(raw.timestamp, "timestamp")?;
        let data = raw.data.ok_or(InvalidPayload::MissingField("data"))?;

        Ok(Self {
            event: WebhookEvent::from(event),
            timestamp,
            data: PostEventData {
                post_id: required(data.post_id, "data.postId")?,
                slug: required(data.slug, "data.slug")?,
                website_slug: required(data.website_slug, "data.websiteSlug")?,
                status: scalar(data.status, "data.status")?.unwrap_or_default(),
                title: scalar(data.title, "data.title")?,
            },
        })
    }

    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }
}
