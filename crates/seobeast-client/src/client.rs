use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::models::{Category, Post, PostsResponse, Tag};

const CLIENT_USER_AGENT: &str = "SEOBeast-Rust-Client/1.0";

/// Filters for [`SeobeastClient::get_posts`]. Unset fields are left out of
/// the query string; a zero `page` or `limit` counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub tag: Option<String>,
}

impl PostsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page.filter(|p| *p > 0) {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category", category.to_string()));
        }
        if let Some(tag) = self.tag.as_deref().filter(|t| !t.is_empty()) {
            pairs.push(("tag", tag.to_string()));
        }
        pairs
    }
}

/// Read-only client for one website's public content.
#[derive(Debug, Clone)]
pub struct SeobeastClient {
    http: reqwest::Client,
    base_url: Url,
    website_slug: String,
}

impl SeobeastClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Self::with_http_client(config, http)
    }

    /// Uses a caller-supplied `reqwest::Client` (shared pools, custom TLS).
    pub fn with_http_client(
        config: &ApiConfig,
        http: reqwest::Client,
    ) -> Result<Self, ClientError> {
        let trimmed = config.base_url.trim_end_matches('/');
        let base_url = Url::parse(trimmed)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{trimmed}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(trimmed.to_string()));
        }

        if config.website_slug.is_empty() {
            warn!("SEOBEAST_WEBSITE_SLUG is not set, API calls will fail");
        }

        Ok(Self {
            http,
            base_url,
            website_slug: config.website_slug.clone(),
        })
    }

    pub fn website_slug(&self) -> &str {
        &self.website_slug
    }

    /// Published posts, newest first as ordered by the API.
    pub async fn get_posts(&self, query: &PostsQuery) -> Result<PostsResponse, ClientError> {
        self.get_json(&["posts"], &query.pairs()).await
    }

    /// A single post. A missing slug yields [`ClientError::NotFound`].
    pub async fn get_post(&self, slug: &str) -> Result<Post, ClientError> {
        // URL serialisation drops dot segments, which would turn these into
        // the listing endpoint.
        if !self.website_slug.is_empty() && matches!(slug, "" | "." | "..") {
            return Err(ClientError::NotFound {
                path: format!("{}/{slug}", self.endpoint(&["posts"]).path()),
            });
        }
        self.get_json(&["posts", slug], &[]).await
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>, ClientError> {
        self.get_json(&["categories"], &[]).await
    }

    pub async fn get_tags(&self) -> Result<Vec<Tag>, ClientError> {
        self.get_json(&["tags"], &[]).await
    }

    /// RSS feed served by the CMS for this website.
    pub fn feed_url(&self) -> String {
        self.endpoint(&["feed"]).into()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `with_http_client` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["public", "v1", self.website_slug.as_str()])
                .extend(segments);
        }
        url
    }

    #[instrument(name = "seobeast.api", skip_all, fields(path = tracing::field::Empty))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<T, ClientError> {
        if self.website_slug.is_empty() {
            return Err(ClientError::MissingWebsiteSlug);
        }

        let url = self.endpoint(segments);
        tracing::Span::current().record("path", url.path());

        let mut request = self
            .http
            .get(url.clone())
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("SEOBeast API returned 404");
            return Err(ClientError::NotFound {
                path: url.path().to_string(),
            });
        }
        if !status.is_success() {
            warn!(status = status.as_u16(), "SEOBeast API returned an error status");
            return Err(ClientError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
