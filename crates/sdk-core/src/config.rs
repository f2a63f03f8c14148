/// Client configuration, built in code or loaded from `JOBSERVER_*` variables
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

pub const ENV_URL: &str = "JOBSERVER_URL";
pub const ENV_TIMEOUT_SECS: &str = "JOBSERVER_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "JOBSERVER_CONNECT_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the job server (e.g. "http://localhost:8090")
    pub base_url: String,

    /// Whole-request timeout enforced by the transport
    pub timeout: Duration,

    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var(ENV_URL).map_err(|_| ConfigError::MissingEnvVar(ENV_URL.to_string()))?;

        let timeout = secs_from_env(ENV_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS)?;
        let connect_timeout = secs_from_env(ENV_CONNECT_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS)?;

        let config = Self {
            base_url,
            timeout,
            connect_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        normalize_base_url(&self.base_url)?;
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "timeout must be > 0".to_string(),
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "connect_timeout must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a job server URL and give it exactly one trailing slash.
///
/// Two URLs that normalize to the same value address the same server.
pub fn normalize_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: "url is empty".to_string(),
        });
    }

    let mut url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: "url cannot carry a path".to_string(),
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn secs_from_env(var: &str, default: u64) -> Result<Duration> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidValue(var.to_string())),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid job server url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
