//! Types shared by the connection and provisioning code.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::ProvisioningError;

/// Identity of the cluster reported by its root endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterInfo {
    pub cluster_name: String,
    pub version: String,
}

impl ClusterInfo {
    /// Extract the cluster name and version number from an `info` response body.
    pub fn from_response(body: &Value) -> Result<Self, ProvisioningError> {
        let cluster_name = body["cluster_name"]
            .as_str()
            .ok_or_else(|| ProvisioningError::parse("info response is missing 'cluster_name'"))?;
        let version = body["version"]["number"]
            .as_str()
            .ok_or_else(|| ProvisioningError::parse("info response is missing 'version.number'"))?;

        Ok(Self {
            cluster_name: cluster_name.to_string(),
            version: version.to_string(),
        })
    }
}

/// One row of the `_cat/indices?format=json` listing.
///
/// The cat API reports every column as a string; only `index` is guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexSummary {
    pub index: String,
    #[serde(default)]
    pub health: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "docs.count")]
    pub docs_count: Option<String>,
}

/// A step of the delete-then-create provisioning procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningState {
    /// Query whether the index already exists.
    CheckExistence,
    /// Remove the existing index with all its documents and mapping.
    Delete,
    /// Embed the probe text to learn the vector dimension.
    ResolveDimension,
    /// Submit the create request for the resolved dimension.
    Create { dimension: usize },
    /// The index exists with the current schema.
    Complete { dimension: usize },
}

impl ProvisioningState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}

/// Outcome of a successful provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningReport {
    pub index_name: String,
    pub dimension: usize,
    /// Whether a pre-existing index was deleted during the run.
    pub deleted_existing: bool,
    /// Every state the run passed through, in order, ending with `Complete`.
    pub transitions: Vec<ProvisioningState>,
}
