//! Search cluster trait definition.
//!
//! This module defines the abstract interface for the cluster-level operations
//! used during connection setup and index provisioning.

use async_trait::async_trait;

use crate::errors::ProvisioningError;
use crate::opensearch::IndexSchema;
use crate::types::{ClusterInfo, IndexSummary};

/// Abstracts the underlying search cluster (OpenSearch, or an in-memory fake).
///
/// Implementations are injected into `IndexProvisioner` and
/// `ConnectionManager::verify`, so the provisioning state machine can be
/// exercised without a live cluster.
///
/// Each method issues exactly one logical request. Request-level retries are
/// the implementation's concern; callers never loop around these calls.
#[async_trait]
pub trait SearchCluster: Send + Sync {
    /// Liveness probe.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the cluster answered with a success status
    /// * `Err(ProvisioningError::ConnectionError)` - Otherwise
    async fn ping(&self) -> Result<(), ProvisioningError>;

    /// Fetch the cluster name and version.
    async fn info(&self) -> Result<ClusterInfo, ProvisioningError>;

    /// Check whether an index with this exact name exists.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` / `Ok(false)` - Whether the index exists
    /// * `Err(ProvisioningError::IndexLookupError)` - If the check itself failed
    async fn index_exists(&self, index_name: &str) -> Result<bool, ProvisioningError>;

    /// Delete an index with all of its documents and its mapping.
    async fn delete_index(&self, index_name: &str) -> Result<(), ProvisioningError>;

    /// Create an index with the given schema.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the cluster acknowledged the index
    /// * `Err(ProvisioningError::IndexCreationError)` - If the request was rejected or
    ///   failed; the message carries the cluster's error text
    async fn create_index(
        &self,
        index_name: &str,
        schema: &IndexSchema,
    ) -> Result<(), ProvisioningError>;

    /// List the indices present in the cluster.
    async fn list_indices(&self) -> Result<Vec<IndexSummary>, ProvisioningError>;
}
