//! Connection configuration for the OpenSearch cluster.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::errors::ProvisioningError;

/// Default OpenSearch host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default OpenSearch REST port.
pub const DEFAULT_PORT: u16 = 9200;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of automatic retries per request.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// URL scheme used to reach the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = ProvisioningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(ProvisioningError::validation(format!(
                "Unsupported scheme '{}', expected 'http' or 'https'",
                other
            ))),
        }
    }
}

/// Request-level retry policy.
///
/// Retries apply to individual requests issued through a connection, never to
/// connection establishment as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of extra attempts after the first one.
    pub max_retries: u32,
    /// Whether a request that timed out is retried.
    pub retry_on_timeout: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_on_timeout: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            retry_on_timeout: false,
        }
    }
}

/// Basic authentication credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Configuration for a connection to the search cluster.
///
/// Build one with [`ConnectionConfig::new`] and adjust fields as needed; the
/// defaults enable compression, a 30 second request timeout and 3 retries
/// that also fire on timeouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub auth: Option<BasicAuth>,
    /// Ask the cluster for gzip-compressed responses.
    pub compression: bool,
    /// Timeout applied to every request.
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl ConnectionConfig {
    /// Create a configuration for `host:port` with the default transport settings.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: Scheme::default(),
            host: host.into(),
            port,
            auth: None,
            compression: true,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    /// Check host and port before any network activity.
    pub fn validate(&self) -> Result<(), ProvisioningError> {
        if self.host.trim().is_empty() {
            return Err(ProvisioningError::validation("host must not be empty"));
        }
        if self.port == 0 {
            return Err(ProvisioningError::validation("port must be positive"));
        }
        Ok(())
    }

    /// The base URL of the cluster, e.g. `http://localhost:9200/`.
    pub fn url(&self) -> Result<Url, ProvisioningError> {
        self.validate()?;
        let raw = format!("{}://{}:{}", self.scheme, self.host.trim(), self.port);
        Url::parse(&raw).map_err(|e| {
            ProvisioningError::validation(format!("Invalid cluster address '{}': {}", raw, e))
        })
    }
}
