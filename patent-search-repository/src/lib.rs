//! # Patent Search Repository
//!
//! This crate connects to an OpenSearch cluster and provisions the patent
//! index used for vector similarity search. It includes definitions for
//! errors, the cluster and embedding interfaces, a concrete implementation
//! for OpenSearch and the delete-then-create provisioning state machine.

pub mod config;
pub mod embedding;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod provisioner;
pub mod types;
pub mod utils;

pub use config::{BasicAuth, ConnectionConfig, RetryPolicy, Scheme};
pub use embedding::OllamaEmbedder;
pub use errors::ProvisioningError;
pub use interfaces::{Embedder, SearchCluster};
pub use opensearch::{ConnectionManager, IndexSchema, OpenSearchCluster};
pub use provisioner::{IndexProvisioner, ProvisioningRun, DIMENSION_PROBE_TEXT};
pub use types::{ClusterInfo, IndexSummary, ProvisioningReport, ProvisioningState};
pub use utils::validate_index_name;
