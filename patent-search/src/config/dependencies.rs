//! Dependency initialization and wiring for the patent search tool.

use std::sync::Arc;

use tracing::info;

use crate::config::Settings;
use crate::errors::AppError;
use patent_search_repository::{
    ConnectionManager, Embedder, IndexProvisioner, OllamaEmbedder, SearchCluster,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Verified connection to the cluster.
    pub cluster: Arc<dyn SearchCluster>,
    /// Provisioner for the configured index, when one was requested.
    pub provisioner: Option<IndexProvisioner>,
}

impl Dependencies {
    /// Connect to OpenSearch and build the embedder when provisioning is requested.
    ///
    /// The connection fails fast: a cluster that does not answer the liveness
    /// probe aborts start-up before any index is touched.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If the cluster is unreachable or the embedder cannot be built
    pub async fn new(settings: &Settings) -> Result<Self, AppError> {
        info!(
            host = %settings.connection.host,
            port = settings.connection.port,
            index_name = ?settings.index_name,
            "Initializing dependencies"
        );

        let cluster: Arc<dyn SearchCluster> =
            Arc::new(ConnectionManager::new(settings.connection.clone()).connect().await?);

        let provisioner = match &settings.index_name {
            Some(_) => {
                let embedder: Arc<dyn Embedder> = Arc::new(OllamaEmbedder::new(
                    &settings.embedding_url,
                    settings.embedding_model.clone(),
                )?);

                info!(
                    embedding_url = %settings.embedding_url,
                    embedding_model = %settings.embedding_model,
                    "Embedding client created"
                );

                Some(IndexProvisioner::new(cluster.clone(), embedder))
            }
            None => None,
        };

        Ok(Self {
            cluster,
            provisioner,
        })
    }
}
