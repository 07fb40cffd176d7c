use std::time::Duration;

use seobeast_std::env::ReadEnv;

use crate::nats::NatsConfig;
use crate::revalidate::DEFAULT_BLOG_PATH;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SUBJECT_PREFIX: &str = "seobeast";
const DEFAULT_STREAM_NAME: &str = "SEOBEAST";
const DEFAULT_STREAM_MAX_AGE_SECS: u64 = 24 * 60 * 60;

/// Configuration for the webhook receiver, built once at startup and
/// passed into [`serve`](crate::serve).
///
/// Resolved from environment variables:
/// - `SEOBEAST_WEBHOOK_SECRET`: shared HMAC secret (requests get 500 while unset)
/// - `SEOBEAST_WEBHOOK_PORT`: HTTP listening port (default: 3000)
/// - `SEOBEAST_BLOG_PATH`: path of the blog listing page (default: `/blog`)
/// - `SEOBEAST_SUBJECT_PREFIX`: NATS subject prefix (default: `seobeast`)
/// - `SEOBEAST_STREAM_NAME`: JetStream stream name (default: `SEOBEAST`)
/// - `SEOBEAST_STREAM_MAX_AGE_SECS`: max age of revalidation messages (default: 86400)
/// - `NATS_URL`, `NATS_CREDS`, `NATS_TOKEN` for the NATS connection
#[derive(Clone)]
pub struct WebhookConfig {
    pub webhook_secret: Option<String>,
    pub port: u16,
    pub blog_path: String,
    pub subject_prefix: String,
    pub stream_name: String,
    pub stream_max_age: Duration,
    pub nats: NatsConfig,
}

impl WebhookConfig {
    pub fn from_env<E: ReadEnv>(env: &E) -> Self {
        Self {
            webhook_secret: env.non_empty("SEOBEAST_WEBHOOK_SECRET"),
            port: env.parsed("SEOBEAST_WEBHOOK_PORT").unwrap_or(DEFAULT_PORT),
            blog_path: env
                .non_empty("SEOBEAST_BLOG_PATH")
                .map_or_else(|| DEFAULT_BLOG_PATH.to_string(), |p| normalize_path(&p)),
            subject_prefix: env
                .non_empty("SEOBEAST_SUBJECT_PREFIX")
                .unwrap_or_else(|| DEFAULT_SUBJECT_PREFIX.to_string()),
            stream_name: env
                .non_empty("SEOBEAST_STREAM_NAME")
                .unwrap_or_else(|| DEFAULT_STREAM_NAME.to_string()),
            stream_max_age: Duration::from_secs(
                env.parsed("SEOBEAST_STREAM_MAX_AGE_SECS")
                    .unwrap_or(DEFAULT_STREAM_MAX_AGE_SECS),
            ),
            nats: NatsConfig::from_env(env),
        }
    }

    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into()).filter(|s: &String| !s.is_empty());
        self
    }
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("port", &self.port)
            .field("blog_path", &self.blog_path)
            .field("subject_prefix", &self.subject_prefix)
            .field("stream_name", &self.stream_name)
            .field("stream_max_age", &self.stream_max_age)
            .field("nats", &self.nats)
            .finish()
    }
}

/// Leading slash, no trailing slash (except for the root itself).
fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    format!("/{trimmed}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use seobeast_std::env::InMemoryEnv;

    #[test]
    fn defaults_when_no_env_vars() {
        let config = WebhookConfig::from_env(&InMemoryEnv::new());

        assert!(config.webhook_secret.is_none());
        assert_eq!(config.port, 3000);
        assert_eq!(config.blog_path, "/blog");
        assert_eq!(config.subject_prefix, "seobeast");
        assert_eq!(config.stream_name, "SEOBEAST");
        assert_eq!(config.stream_max_age, Duration::from_secs(86400));
        assert_eq!(config.nats.servers, vec!["localhost:4222"]);
    }

    #[test]
    fn reads_all_env_vars() {
        let env: InMemoryEnv = [
            ("SEOBEAST_WEBHOOK_SECRET", "whsec_123"),
            ("SEOBEAST_WEBHOOK_PORT", "9090"),
            ("SEOBEAST_BLOG_PATH", "news/"),
            ("SEOBEAST_SUBJECT_PREFIX", "cms"),
            ("SEOBEAST_STREAM_NAME", "CMS"),
            ("SEOBEAST_STREAM_MAX_AGE_SECS", "3600"),
            ("NATS_URL", "nats:4222"),
        ]
        .into_iter()
        .collect();

        let config = WebhookConfig::from_env(&env);

        assert_eq!(config.webhook_secret.as_deref(), Some("whsec_123"));
        assert_eq!(config.port, 9090);
        assert_eq!(config.blog_path, "/news");
        assert_eq!(config.subject_prefix, "cms");
        assert_eq!(config.stream_name, "CMS");
        assert_eq!(config.stream_max_age, Duration::from_secs(3600));
        assert_eq!(config.nats.servers, vec!["nats:4222"]);
    }

    #[test]
    fn empty_secret_counts_as_unset() {
        let env = InMemoryEnv::new();
        env.set("SEOBEAST_WEBHOOK_SECRET", "");

        assert!(WebhookConfig::from_env(&env).webhook_secret.is_none());
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let env = InMemoryEnv::new();
        env.set("SEOBEAST_WEBHOOK_PORT", "not-a-number");
        env.set("SEOBEAST_STREAM_MAX_AGE_SECS", "-1");

        let config = WebhookConfig::from_env(&env);

        assert_eq!(config.port, 3000);
        assert_eq!(config.stream_max_age, Duration::from_secs(86400));
    }

    #[test]
    fn secret_is_redacted_in_debug() {
        let config = WebhookConfig::from_env(&InMemoryEnv::new()).with_webhook_secret("hunter2");

        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn two_configurations_coexist() {
        let a = WebhookConfig::from_env(&InMemoryEnv::new()).with_webhook_secret("a");
        let b = WebhookConfig::from_env(&InMemoryEnv::new()).with_webhook_secret("b");

        assert_eq!(a.webhook_secret.as_deref(), Some("a"));
        assert_eq!(b.webhook_secret.as_deref(), Some("b"));
    }

    #[test]
    fn normalize_path_variants() {
        assert_eq!(normalize_path("/blog"), "/blog");
        assert_eq!(normalize_path("blog/"), "/blog");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(" /a/b/ "), "/a/b");
    }
}
