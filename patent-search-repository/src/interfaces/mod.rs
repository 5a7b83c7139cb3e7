//! Interface definitions for the search cluster and the embedding model.
//!
//! These traits let the provisioning code run against OpenSearch in
//! production and against in-memory implementations in tests.

mod embedder;
mod search_cluster;

pub use embedder::Embedder;
pub use search_cluster::SearchCluster;
