//! # seobeast-client
//!
//! Client for the SEOBeast public content API (`/public/v1/{websiteSlug}/...`).
//!
//! The client is an ordinary value: build one from an [`ApiConfig`] at
//! startup and hand it to whoever renders pages. There is no process-wide
//! instance.
//!
//! ```rust,no_run
//! use seobeast_client::{ApiConfig, PostsQuery, SeobeastClient};
//! use seobeast_std::SystemEnv;
//!
//! # async fn run() -> Result<(), seobeast_client::ClientError> {
//! let client = SeobeastClient::new(&ApiConfig::from_env(&SystemEnv))?;
//! let page = client.get_posts(&PostsQuery::new().limit(20)).await?;
//! for post in page.posts {
//!     println!("{} ({})", post.title, post.slug);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration (env vars)
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `SEOBEAST_API_URL` | `http://localhost:8080` | Base URL of the SEOBeast instance |
//! | `SEOBEAST_WEBSITE_SLUG` | (empty) | Website whose content is fetched |
//! | `SEOBEAST_API_TIMEOUT_SECS` | `10` | Per-request timeout |

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::{PostsQuery, SeobeastClient};
pub use config::ApiConfig;
pub use error::ClientError;
pub use models::{Author, Category, Post, PostStatus, PostsResponse, Tag};
