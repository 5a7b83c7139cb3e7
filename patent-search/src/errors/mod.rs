//! Error types for the patent search binary.

use patent_search_repository::ProvisioningError;
use thiserror::Error;

/// Errors that can occur while configuring or running the tool.
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or unparsable configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Connection or provisioning failure.
    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),

    /// Failure writing command output.
    #[error("Output error: {0}")]
    OutputError(#[from] std::io::Error),

    /// Failure initialising logging.
    #[error("Tracing error: {0}")]
    TracingError(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a tracing error.
    pub fn tracing(msg: impl Into<String>) -> Self {
        Self::TracingError(msg.into())
    }
}
