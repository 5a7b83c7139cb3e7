//! Provisioning error types.
//!
//! This module defines the unified error type for connecting to the search
//! cluster and (re)creating the patent index.

use thiserror::Error;

/// Unified errors from connection and provisioning operations.
///
/// Used by the `SearchCluster` and `Embedder` traits, `ConnectionManager` and
/// `IndexProvisioner`. Every variant carries the underlying message so the
/// original cause survives propagation to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisioningError {
    /// Validation error (e.g., empty host, zero port, invalid index name).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to establish or verify the connection to the cluster.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to check whether an index exists.
    #[error("Index lookup error: {0}")]
    IndexLookupError(String),

    /// Failed to delete an existing index.
    #[error("Index deletion error: {0}")]
    IndexDeletionError(String),

    /// Failed to resolve the embedding dimension.
    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    /// The cluster rejected or failed the index creation request.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Failed to parse a response from the cluster or embedding service.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ProvisioningError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index lookup error.
    pub fn index_lookup(msg: impl Into<String>) -> Self {
        Self::IndexLookupError(msg.into())
    }

    /// Create an index deletion error.
    pub fn index_deletion(msg: impl Into<String>) -> Self {
        Self::IndexDeletionError(msg.into())
    }

    /// Create an embedding error.
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::EmbeddingError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Whether this error means the cluster could not be reached or verified.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }
}
