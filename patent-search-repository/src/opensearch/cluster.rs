//! OpenSearch cluster implementation.
//!
//! This module provides the concrete implementation of `SearchCluster`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    cat::CatIndicesParts,
    http::{
        headers::{HeaderValue, ACCEPT_ENCODING},
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts},
    OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::{ConnectionConfig, RetryPolicy};
use crate::errors::ProvisioningError;
use crate::interfaces::SearchCluster;
use crate::opensearch::index_config::IndexSchema;
use crate::opensearch::retry::send_with_retry;
use crate::types::{ClusterInfo, IndexSummary};

/// Live handle to an OpenSearch cluster.
///
/// Wraps the `opensearch` client together with the retry policy applied to
/// every request. Obtain one through `ConnectionManager::connect`, which also
/// verifies the cluster is reachable.
///
/// # Example
///
/// ```ignore
/// use patent_search_repository::{ConnectionConfig, OpenSearchCluster, SearchCluster};
///
/// let cluster = OpenSearchCluster::new(&ConnectionConfig::new("localhost", 9200))?;
/// let exists = cluster.index_exists("patents").await?;
/// ```
pub struct OpenSearchCluster {
    client: OpenSearch,
    retry: RetryPolicy,
}

impl OpenSearchCluster {
    /// Build a client for the configured cluster. No request is sent.
    ///
    /// # Arguments
    ///
    /// * `config` - Address, credentials, compression, timeout and retry settings
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchCluster)` - A client ready to issue requests
    /// * `Err(ProvisioningError)` - If the address is invalid or the transport cannot be built
    pub fn new(config: &ConnectionConfig) -> Result<Self, ProvisioningError> {
        let url = config.url()?;

        let conn_pool = SingleNodeConnectionPool::new(url.clone());
        let accept_encoding = if config.compression { "gzip" } else { "identity" };
        let mut builder = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .timeout(config.timeout)
            .header(ACCEPT_ENCODING, HeaderValue::from_static(accept_encoding));

        if let Some(auth) = &config.auth {
            builder = builder.auth(Credentials::Basic(
                auth.username.clone(),
                auth.password.clone(),
            ));
        }

        let transport = builder
            .build()
            .map_err(|e| ProvisioningError::connection(e.to_string()))?;

        debug!(
            url = %url,
            compression = config.compression,
            timeout_secs = config.timeout.as_secs(),
            max_retries = config.retry.max_retries,
            retry_on_timeout = config.retry.retry_on_timeout,
            "Created OpenSearch client"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
            retry: config.retry,
        })
    }

    /// The retry policy applied to each request.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }
}

#[async_trait]
impl SearchCluster for OpenSearchCluster {
    async fn ping(&self) -> Result<(), ProvisioningError> {
        let client = &self.client;
        let response = send_with_retry(&self.retry, "ping", move || async move {
            client.ping().send().await
        })
        .await
        .map_err(|e| ProvisioningError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(ProvisioningError::connection(format!(
                "Ping failed with status {}",
                status
            )));
        }

        Ok(())
    }

    async fn info(&self) -> Result<ClusterInfo, ProvisioningError> {
        let client = &self.client;
        let response = send_with_retry(&self.retry, "info", move || async move {
            client.info().send().await
        })
        .await
        .map_err(|e| ProvisioningError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProvisioningError::connection(format!(
                "Info request failed with status {}: {}",
                status, error_body
            )));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| ProvisioningError::parse(e.to_string()))?;

        ClusterInfo::from_response(&body)
    }

    async fn index_exists(&self, index_name: &str) -> Result<bool, ProvisioningError> {
        let client = &self.client;
        let names = [index_name];
        let names = &names[..];

        let response = send_with_retry(&self.retry, "indices.exists", move || async move {
            client
                .indices()
                .exists(IndicesExistsParts::Index(names))
                .send()
                .await
        })
        .await
        .map_err(|e| ProvisioningError::index_lookup(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(ProvisioningError::index_lookup(format!(
                "Existence check for '{}' failed with status {}",
                index_name, status
            ))),
        }
    }

    async fn delete_index(&self, index_name: &str) -> Result<(), ProvisioningError> {
        let client = &self.client;
        let names = [index_name];
        let names = &names[..];

        let response = send_with_retry(&self.retry, "indices.delete", move || async move {
            client
                .indices()
                .delete(IndicesDeleteParts::Index(names))
                .send()
                .await
        })
        .await
        .map_err(|e| ProvisioningError::index_deletion(e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - the index may have been removed since the existence check
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = response.text().await.unwrap_or_default();
            error!(index = %index_name, status = %status, body = %error_body, "Delete index request failed");
            return Err(ProvisioningError::index_deletion(format!(
                "Delete of '{}' failed with status {}: {}",
                index_name, status, error_body
            )));
        }

        debug!(index = %index_name, "Index deleted");
        Ok(())
    }

    async fn create_index(
        &self,
        index_name: &str,
        schema: &IndexSchema,
    ) -> Result<(), ProvisioningError> {
        let client = &self.client;
        let body = schema.to_body()?;
        let body = &body;

        let response = send_with_retry(&self.retry, "indices.create", move || async move {
            client
                .indices()
                .create(IndicesCreateParts::Index(index_name))
                .body(body.clone())
                .send()
                .await
        })
        .await
        .map_err(|e| ProvisioningError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProvisioningError::index_creation(format!(
                "Create of '{}' failed with status {}: {}",
                index_name, status, error_body
            )));
        }

        info!(index = %index_name, dimension = ?schema.dimension(), "Index created");
        Ok(())
    }

    async fn list_indices(&self) -> Result<Vec<IndexSummary>, ProvisioningError> {
        let client = &self.client;
        let response = send_with_retry(&self.retry, "cat.indices", move || async move {
            client
                .cat()
                .indices(CatIndicesParts::None)
                .format("json")
                .send()
                .await
        })
        .await
        .map_err(|e| ProvisioningError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProvisioningError::connection(format!(
                "Listing indices failed with status {}: {}",
                status, error_body
            )));
        }

        response
            .json::<Vec<IndexSummary>>()
            .await
            .map_err(|e| ProvisioningError::parse(e.to_string()))
    }
}
