use std::time::Duration;

use seobeast_std::env::ReadEnv;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where the content API lives and which website to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub website_slug: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, website_slug: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            website_slug: website_slug.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads `SEOBEAST_API_URL`, `SEOBEAST_WEBSITE_SLUG` and
    /// `SEOBEAST_API_TIMEOUT_SECS`.
    pub fn from_env<E: ReadEnv>(env: &E) -> Self {
        Self {
            base_url: env
                .non_empty("SEOBEAST_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            website_slug: env.var("SEOBEAST_WEBSITE_SLUG").unwrap_or_default(),
            timeout: Duration::from_secs(
                env.parsed("SEOBEAST_API_TIMEOUT_SECS")
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seobeast_std::env::InMemoryEnv;

    #[test]
    fn defaults_when_unset() {
        let config = ApiConfig::from_env(&InMemoryEnv::new());

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.website_slug, "");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn reads_env_vars() {
        let env = InMemoryEnv::from_iter([
            ("SEOBEAST_API_URL", "https://cms.example.com/"),
            ("SEOBEAST_WEBSITE_SLUG", "demo"),
            ("SEOBEAST_API_TIMEOUT_SECS", "3"),
        ]);

        let config = ApiConfig::from_env(&env);

        assert_eq!(config.base_url, "https://cms.example.com/");
        assert_eq!(config.website_slug, "demo");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn invalid_timeout_falls_back_to_default() {
        let env = InMemoryEnv::new();
        env.set("SEOBEAST_API_TIMEOUT_SECS", "soon");

        assert_eq!(ApiConfig::from_env(&env).timeout, Duration::from_secs(10));
    }
}
