//! In-memory cluster and embedder shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use async_trait::async_trait;
use patent_search_repository::{
    ClusterInfo, Embedder, IndexSchema, IndexSummary, ProvisioningError, SearchCluster,
};
use serde_json::Value;
use tokio::sync::Mutex;

/// Cluster keeping index bodies in a map, with optional create rejection.
pub struct InMemoryCluster {
    indices: Mutex<BTreeMap<String, Value>>,
    reject_create: Option<String>,
}

impl InMemoryCluster {
    pub fn new() -> Self {
        Self {
            indices: Mutex::new(BTreeMap::new()),
            reject_create: None,
        }
    }

    /// A cluster whose create requests fail with `reason`.
    pub fn rejecting_creates(reason: &str) -> Self {
        Self {
            indices: Mutex::new(BTreeMap::new()),
            reject_create: Some(reason.to_string()),
        }
    }

    /// Seed an index with an arbitrary body.
    pub async fn insert(&self, index_name: &str, body: Value) {
        self.indices
            .lock()
            .await
            .insert(index_name.to_string(), body);
    }

    pub async fn body(&self, index_name: &str) -> Option<Value> {
        self.indices.lock().await.get(index_name).cloned()
    }

    pub async fn count(&self) -> usize {
        self.indices.lock().await.len()
    }
}

#[async_trait]
impl SearchCluster for InMemoryCluster {
    async fn ping(&self) -> Result<(), ProvisioningError> {
        Ok(())
    }

    async fn info(&self) -> Result<ClusterInfo, ProvisioningError> {
        Ok(ClusterInfo {
            cluster_name: "in-memory".to_string(),
            version: "2.11.0".to_string(),
        })
    }

    async fn index_exists(&self, index_name: &str) -> Result<bool, ProvisioningError> {
        Ok(self.indices.lock().await.contains_key(index_name))
    }

    async fn delete_index(&self, index_name: &str) -> Result<(), ProvisioningError> {
        self.indices.lock().await.remove(index_name);
        Ok(())
    }

    async fn create_index(
        &self,
        index_name: &str,
        schema: &IndexSchema,
    ) -> Result<(), ProvisioningError> {
        if let Some(reason) = &self.reject_create {
            return Err(ProvisioningError::index_creation(format!(
                "Create of '{}' failed with status 400 Bad Request: {}",
                index_name, reason
            )));
        }

        let mut indices = self.indices.lock().await;
        if indices.contains_key(index_name) {
            return Err(ProvisioningError::index_creation(format!(
                "resource_already_exists_exception: index [{}] already exists",
                index_name
            )));
        }
        indices.insert(index_name.to_string(), schema.to_body()?);
        Ok(())
    }

    async fn list_indices(&self) -> Result<Vec<IndexSummary>, ProvisioningError> {
        Ok(self
            .indices
            .lock()
            .await
            .keys()
            .map(|name| IndexSummary {
                index: name.clone(),
                health: Some("green".to_string()),
                status: Some("open".to_string()),
                docs_count: Some("0".to_string()),
            })
            .collect())
    }
}

/// Embedder returning a constant vector of the configured length.
pub struct FixedEmbedder {
    pub dimension: usize,
}

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, ProvisioningError> {
        Ok(vec![0.1; self.dimension])
    }
}
