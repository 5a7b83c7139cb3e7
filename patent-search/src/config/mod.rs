//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Default |
//! |----------|---------|
//! | `OPENSEARCH_HOST` | `localhost` |
//! | `OPENSEARCH_PORT` | `9200` |
//! | `OPENSEARCH_SCHEME` | `http` |
//! | `OPENSEARCH_USER` / `OPENSEARCH_PASS` | unset (no auth) |
//! | `OPENSEARCH_TIMEOUT_SECS` | `30` |
//! | `OPENSEARCH_MAX_RETRIES` | `3` |
//! | `OPENSEARCH_RETRY_ON_TIMEOUT` | `true` |
//! | `OPENSEARCH_COMPRESSION` | `true` |
//! | `PATENT_INDEX_NAME` | unset (no provisioning) |
//! | `EMBEDDING_URL` | `http://localhost:11434` |
//! | `EMBEDDING_MODEL` | `nomic-embed-text` |

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::str::FromStr;
use std::time::Duration;

use patent_search_repository::config::{DEFAULT_HOST, DEFAULT_PORT};
use patent_search_repository::embedding::{DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_URL};
use patent_search_repository::{BasicAuth, ConnectionConfig, Scheme};

use crate::errors::AppError;

/// Everything the binary needs to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub connection: ConnectionConfig,
    /// Index to (re)provision before listing, if any.
    pub index_name: Option<String>,
    pub embedding_url: String,
    pub embedding_model: String,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns the value of a variable if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = get("OPENSEARCH_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(get("OPENSEARCH_PORT"), "OPENSEARCH_PORT", DEFAULT_PORT)?;

        let mut connection = ConnectionConfig::new(host, port);

        if let Some(scheme) = get("OPENSEARCH_SCHEME") {
            connection.scheme = scheme
                .parse::<Scheme>()
                .map_err(|e| AppError::config(format!("OPENSEARCH_SCHEME: {}", e)))?;
        }

        if let Some(username) = get("OPENSEARCH_USER") {
            connection.auth = Some(BasicAuth {
                username,
                password: lookup("OPENSEARCH_PASS").unwrap_or_default(),
            });
        }

        connection.timeout = Duration::from_secs(parse_or(
            get("OPENSEARCH_TIMEOUT_SECS"),
            "OPENSEARCH_TIMEOUT_SECS",
            connection.timeout.as_secs(),
        )?);
        connection.retry.max_retries = parse_or(
            get("OPENSEARCH_MAX_RETRIES"),
            "OPENSEARCH_MAX_RETRIES",
            connection.retry.max_retries,
        )?;
        connection.retry.retry_on_timeout = parse_flag(
            get("OPENSEARCH_RETRY_ON_TIMEOUT"),
            "OPENSEARCH_RETRY_ON_TIMEOUT",
            connection.retry.retry_on_timeout,
        )?;
        connection.compression = parse_flag(
            get("OPENSEARCH_COMPRESSION"),
            "OPENSEARCH_COMPRESSION",
            connection.compression,
        )?;

        connection
            .validate()
            .map_err(|e| AppError::config(e.to_string()))?;

        Ok(Self {
            connection,
            index_name: get("PATENT_INDEX_NAME"),
            embedding_url: get("EMBEDDING_URL").unwrap_or_else(|| DEFAULT_EMBEDDING_URL.to_string()),
            embedding_model: get("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::config(format!("{}: invalid value '{}': {}", key, raw, e))),
        None => Ok(default),
    }
}

fn parse_flag(value: Option<String>, key: &str, default: bool) -> Result<bool, AppError> {
    match value.as_deref().map(|v| v.trim().to_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(AppError::config(format!(
                "{}: expected a boolean, got '{}'",
                key, v
            ))),
        },
    }
}
