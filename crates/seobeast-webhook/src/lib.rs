//! # seobeast-webhook
//!
//! SEOBeast CMS webhook receiver that turns content changes into page
//! revalidations published on NATS JetStream.
//!
//! ## How it works
//!
//! 1. SEOBeast sends `POST /api/webhook` with an `X-Webhook-Signature` header
//!    (hex HMAC-SHA256 of the raw body) and a JSON payload.
//! 2. The signature is checked against `SEOBEAST_WEBHOOK_SECRET` before the
//!    body is parsed.
//! 3. The event is classified: `post.created`, `post.updated` and
//!    `post.published` refresh the post page and the blog listing;
//!    `post.deleted` and `post.unpublished` refresh the listing only.
//!    Other events are acknowledged and ignored.
//! 4. Each stale path is published to `{SEOBEAST_SUBJECT_PREFIX}.revalidate`.
//!    The stream (`SEOBEAST` by default, capturing `seobeast.>`) is created on
//!    startup if it doesn't exist.
//!
//! ## Responses
//!
//! | Condition | Status | Body |
//! |---|---|---|
//! | secret not configured | 500 | `{"error":"Webhook not configured"}` |
//! | signature header missing | 401 | `{"error":"Missing signature"}` |
//! | signature mismatch | 401 | `{"error":"Invalid signature"}` |
//! | payload invalid | 400 | `{"error":"Invalid payload"}` |
//! | publish failed | 500 | `{"error":"Revalidation failed"}` |
//! | accepted | 200 | `{"success":true}` |
//!
//! ## Configuration (env vars)
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `SEOBEAST_WEBHOOK_SECRET` | (unset) | HMAC-SHA256 shared secret |
//! | `SEOBEAST_WEBHOOK_PORT` | `3000` | HTTP listening port |
//! | `SEOBEAST_BLOG_PATH` | `/blog` | Path of the blog listing page |
//! | `SEOBEAST_SUBJECT_PREFIX` | `seobeast` | NATS subject prefix |
//! | `SEOBEAST_STREAM_NAME` | `SEOBEAST` | JetStream stream name |
//! | `SEOBEAST_STREAM_MAX_AGE_SECS` | `86400` | Max age of revalidation messages |
//! | `NATS_URL` | `localhost:4222` | NATS server URL(s), comma separated |
//! | `NATS_CREDS` / `NATS_TOKEN` | (unset) | NATS authentication |

pub mod config;
pub mod error;
pub mod nats;
pub mod payload;
pub mod revalidate;
pub mod server;
pub mod signal;
pub mod signature;

#[cfg(any(test, feature = "test-support"))]
pub mod mocks;

pub use config::WebhookConfig;
pub use error::WebhookError;
pub use payload::{EventKind, WebhookEvent, WebhookPayload};
pub use revalidate::{NatsRevalidator, Revalidate, RevalidationRequest};
pub use server::{AppState, router, serve};
