//! OpenSearch implementation of the search cluster.
//!
//! This module provides the concrete `SearchCluster` backed by OpenSearch,
//! the connection manager that validates it, the request retry policy and
//! the patent index schema.

mod cluster;
mod connection;
mod index_config;
mod retry;

pub use cluster::OpenSearchCluster;
pub use connection::ConnectionManager;
pub use index_config::{
    FieldMapping, IndexSchema, IndexSettings, KnnSettings, Mappings, SpaceType, EMBEDDING_FIELD,
    PUBLICATION_DATE_FORMAT,
};
pub use retry::FailureKind;
