//! NATS connection for the revalidation bus.

use std::path::PathBuf;
use std::time::Duration;

use async_nats::{Client, ConnectOptions, Event};
use seobeast_std::env::ReadEnv;
use thiserror::Error;
use tracing::{info, instrument, warn};

const DEFAULT_NATS_URL: &str = "localhost:4222";
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub enum NatsAuth {
    Credentials(PathBuf),
    Token(String),
    None,
}

impl NatsAuth {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Credentials(_) => "credentials file",
            Self::Token(_) => "token",
            Self::None => "none",
        }
    }
}

impl std::fmt::Debug for NatsAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Credentials(path) => f.debug_tuple("Credentials").field(path).finish(),
            Self::Token(_) => f.write_str("Token(<redacted>)"),
            Self::None => f.write_str("None"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NatsConfig {
    pub servers: Vec<String>,
    pub auth: NatsAuth,
}

impl NatsConfig {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            servers: vec![url.into()],
            auth: NatsAuth::None,
        }
    }

    /// `NATS_URL` is a comma-separated server list. `NATS_CREDS` wins over
    /// `NATS_TOKEN` when both are set.
    pub fn from_env<E: ReadEnv>(env: &E) -> Self {
        let raw = env
            .non_empty("NATS_URL")
            .unwrap_or_else(|| DEFAULT_NATS_URL.to_string());
        let servers = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let auth = if let Some(path) = env.non_empty("NATS_CREDS") {
            NatsAuth::Credentials(PathBuf::from(path))
        } else if let Some(token) = env.non_empty("NATS_TOKEN") {
            NatsAuth::Token(token)
        } else {
            NatsAuth::None
        };

        Self { servers, auth }
    }
}

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("failed to load NATS credentials file: {0}")]
    InvalidCredentials(#[source] std::io::Error),

    #[error("failed to connect to NATS servers {servers:?}: {error}")]
    ConnectionFailed {
        servers: Vec<String>,
        #[source]
        error: async_nats::ConnectError,
    },
}

fn reconnect_delay(attempts: usize) -> Duration {
    let exp = u32::try_from(attempts).unwrap_or(u32::MAX);
    Duration::from_secs(std::cmp::min(
        MAX_RECONNECT_DELAY.as_secs(),
        2u64.saturating_pow(exp),
    ))
}

async fn log_event(event: Event) {
    match event {
        Event::Connected => info!("NATS connected"),
        Event::Disconnected => warn!("NATS disconnected, reconnecting"),
        Event::ServerError(err) => warn!(error = %err, "NATS server error"),
        Event::ClientError(err) => warn!(error = %err, "NATS client error"),
        Event::LameDuckMode => warn!("NATS server entering lame duck mode"),
        other => info!(event = %other, "NATS event"),
    }
}

/// Connects with retry on the initial attempt and capped exponential
/// reconnect backoff.
#[instrument(name = "nats.connect", skip(config), fields(servers = ?config.servers, auth = config.auth.description()))]
pub async fn connect(config: &NatsConfig) -> Result<Client, ConnectError> {
    let options = match &config.auth {
        NatsAuth::Credentials(path) => ConnectOptions::with_credentials_file(path.clone())
            .await
            .map_err(ConnectError::InvalidCredentials)?,
        NatsAuth::Token(token) => ConnectOptions::with_token(token.clone()),
        NatsAuth::None => ConnectOptions::new(),
    };

    let client = options
        .retry_on_initial_connect()
        .connection_timeout(CONNECTION_TIMEOUT)
        .reconnect_delay_callback(reconnect_delay)
        .event_callback(|event| async move { log_event(event).await })
        .connect(&config.servers)
        .await
        .map_err(|error| ConnectError::ConnectionFailed {
            servers: config.servers.clone(),
            error,
        })?;

    info!("Connected to NATS");
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seobeast_std::env::InMemoryEnv;

    #[test]
    fn defaults_to_localhost_without_auth() {
        let config = NatsConfig::from_env(&InMemoryEnv::new());

        assert_eq!(config.servers, vec!["localhost:4222"]);
        assert!(matches!(config.auth, NatsAuth::None));
    }

    #[test]
    fn parses_server_list() {
        let env = InMemoryEnv::new();
        env.set("NATS_URL", "nats-a:4222, nats-b:4222,,");

        assert_eq!(
            NatsConfig::from_env(&env).servers,
            vec!["nats-a:4222", "nats-b:4222"]
        );
    }

    #[test]
    fn credentials_win_over_token() {
        let env = InMemoryEnv::new();
        env.set("NATS_CREDS", "/etc/nats/revalidate.creds");
        env.set("NATS_TOKEN", "tok");

        assert!(matches!(
            NatsConfig::from_env(&env).auth,
            NatsAuth::Credentials(p) if p == std::path::Path::new("/etc/nats/revalidate.creds")
        ));
    }

    #[test]
    fn token_auth_is_redacted_in_debug() {
        let env = InMemoryEnv::new();
        env.set("NATS_TOKEN", "very-secret-token");
        let config = NatsConfig::from_env(&env);

        assert_eq!(config.auth.description(), "token");
        assert!(!format!("{config:?}").contains("very-secret-token"));
    }

    #[test]
    fn reconnect_delay_backs_off_and_caps() {
        assert_eq!(reconnect_delay(0), Duration::from_secs(1));
        assert_eq!(reconnect_delay(3), Duration::from_secs(8));
        assert_eq!(reconnect_delay(5), MAX_RECONNECT_DELAY);
        assert_eq!(reconnect_delay(usize::MAX), MAX_RECONNECT_DELAY);
    }

    #[test]
    fn connect_error_display() {
        let err = ConnectError::InvalidCredentials(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        assert!(err.to_string().contains("no such file"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
