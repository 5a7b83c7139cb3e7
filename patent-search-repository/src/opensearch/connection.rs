//! Connection setup and verification.

use tracing::{error, info};

use crate::config::ConnectionConfig;
use crate::errors::ProvisioningError;
use crate::interfaces::SearchCluster;
use crate::opensearch::cluster::OpenSearchCluster;
use crate::types::ClusterInfo;

/// Establishes validated connections to the search cluster.
///
/// A connection is only handed out after a liveness probe succeeded. There
/// is no retry loop around connection establishment; the request-level retry
/// policy from the configuration applies to the probe like to any request.
///
/// # Example
///
/// ```no_run
/// use patent_search_repository::{ConnectionConfig, ConnectionManager};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let manager = ConnectionManager::new(ConnectionConfig::new("localhost", 9200));
/// let cluster = manager.connect().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    config: ConnectionConfig,
}

impl ConnectionManager {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Build a client, probe the cluster and report its identity.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchCluster)` - A connection whose probe succeeded
    /// * `Err(ProvisioningError::ValidationError)` - If host or port are invalid
    /// * `Err(ProvisioningError::ConnectionError)` - If the probe or info request failed
    pub async fn connect(&self) -> Result<OpenSearchCluster, ProvisioningError> {
        let cluster = OpenSearchCluster::new(&self.config)?;

        info!(
            host = %self.config.host,
            port = self.config.port,
            scheme = %self.config.scheme,
            "Connecting to OpenSearch"
        );

        Self::verify(&cluster).await?;
        Ok(cluster)
    }

    /// Probe a cluster and fetch its identity.
    ///
    /// Any failure, whatever its original kind, is reported as a
    /// `ConnectionError`: a cluster that cannot answer `ping` and `info` is
    /// not usable for provisioning.
    pub async fn verify(cluster: &dyn SearchCluster) -> Result<ClusterInfo, ProvisioningError> {
        if let Err(e) = cluster.ping().await {
            error!(error = %e, "Connection to OpenSearch failed");
            return Err(Self::as_connection_error(e));
        }

        let cluster_info = cluster.info().await.map_err(|e| {
            error!(error = %e, "Failed to read OpenSearch cluster info");
            Self::as_connection_error(e)
        })?;

        info!(
            cluster_name = %cluster_info.cluster_name,
            version = %cluster_info.version,
            "Connected to OpenSearch"
        );

        Ok(cluster_info)
    }

    fn as_connection_error(e: ProvisioningError) -> ProvisioningError {
        match e {
            ProvisioningError::ConnectionError(_) => e,
            other => ProvisioningError::connection(other.to_string()),
        }
    }
}
