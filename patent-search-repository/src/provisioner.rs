//! Index provisioning.
//!
//! This module (re)creates the patent index so that its mapping always
//! matches the current schema. Provisioning is a small state machine:
//!
//! ```text
//! CheckExistence --exists--> Delete --> ResolveDimension --> Create --> Complete
//!        |                                   ^
//!        +-------------missing---------------+
//! ```
//!
//! # Note on destructive recreation
//!
//! An existing index is always deleted, even when its mapping is already
//! correct, so every run discards the documents it held. Between `Delete`
//! and `Create` the index does not exist and concurrent readers see
//! "index not found". Nothing is rolled back when `Create` fails; re-running
//! the procedure from a missing index skips `Delete`.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::errors::ProvisioningError;
use crate::interfaces::{Embedder, SearchCluster};
use crate::opensearch::IndexSchema;
use crate::types::{ProvisioningReport, ProvisioningState};
use crate::utils::validate_index_name;

/// Text embedded to discover the vector dimension. It is never stored.
pub const DIMENSION_PROBE_TEXT: &str = "Sample text for dimension detection";

/// Ensures a named index exists with the current patent schema.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use patent_search_repository::{
///     ConnectionConfig, ConnectionManager, IndexProvisioner, OllamaEmbedder,
/// };
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let cluster = ConnectionManager::new(ConnectionConfig::new("localhost", 9200))
///     .connect()
///     .await?;
/// let embedder = OllamaEmbedder::new("http://localhost:11434", "nomic-embed-text")?;
///
/// let provisioner = IndexProvisioner::new(Arc::new(cluster), Arc::new(embedder));
/// let report = provisioner.ensure_index("patents").await?;
/// println!("embedding dimension: {}", report.dimension);
/// # Ok(())
/// # }
/// ```
pub struct IndexProvisioner {
    cluster: Arc<dyn SearchCluster>,
    embedder: Arc<dyn Embedder>,
}

impl IndexProvisioner {
    /// Create a provisioner over a connected cluster and an embedding model.
    pub fn new(cluster: Arc<dyn SearchCluster>, embedder: Arc<dyn Embedder>) -> Self {
        Self { cluster, embedder }
    }

    /// Start a provisioning run for `index_name` without issuing any request.
    ///
    /// Use this instead of [`ensure_index`](Self::ensure_index) to drive the
    /// run one state at a time.
    ///
    /// # Returns
    ///
    /// * `Ok(ProvisioningRun)` - A run positioned at `CheckExistence`
    /// * `Err(ProvisioningError::ValidationError)` - If the index name is invalid
    pub fn begin(&self, index_name: &str) -> Result<ProvisioningRun<'_>, ProvisioningError> {
        validate_index_name(index_name)?;

        Ok(ProvisioningRun {
            provisioner: self,
            index_name: index_name.to_string(),
            state: ProvisioningState::CheckExistence,
            deleted_existing: false,
            transitions: vec![ProvisioningState::CheckExistence],
        })
    }

    /// Delete `index_name` if it exists, then create it with the current schema.
    ///
    /// # Returns
    ///
    /// * `Ok(ProvisioningReport)` - The index exists with a mapping matching the schema
    /// * `Err(ProvisioningError)` - The first fault hit; the index may be left absent
    pub async fn ensure_index(
        &self,
        index_name: &str,
    ) -> Result<ProvisioningReport, ProvisioningError> {
        let mut run = self.begin(index_name)?;

        while !run.state().is_terminal() {
            run.advance().await?;
        }

        run.report()
            .ok_or_else(|| ProvisioningError::index_creation("provisioning run did not complete"))
    }
}

/// A single provisioning run, advanced one state at a time.
///
/// After a failed [`advance`](Self::advance) the run stays in the state that
/// failed, so callers can see where it stopped.
pub struct ProvisioningRun<'p> {
    provisioner: &'p IndexProvisioner,
    index_name: String,
    state: ProvisioningState,
    deleted_existing: bool,
    transitions: Vec<ProvisioningState>,
}

impl ProvisioningRun<'_> {
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// The state the next call to `advance` will execute.
    pub fn state(&self) -> ProvisioningState {
        self.state
    }

    /// States visited so far, starting with `CheckExistence`.
    pub fn transitions(&self) -> &[ProvisioningState] {
        &self.transitions
    }

    /// Execute the current state and move to the next one.
    ///
    /// Calling this on a completed run does nothing.
    ///
    /// # Returns
    ///
    /// * `Ok(ProvisioningState)` - The new current state
    /// * `Err(ProvisioningError)` - The fault raised by the current state
    pub async fn advance(&mut self) -> Result<ProvisioningState, ProvisioningError> {
        let next = match self.state {
            ProvisioningState::CheckExistence => self.check_existence().await?,
            ProvisioningState::Delete => self.delete().await?,
            ProvisioningState::ResolveDimension => self.resolve_dimension().await?,
            ProvisioningState::Create { dimension } => self.create(dimension).await?,
            ProvisioningState::Complete { .. } => return Ok(self.state),
        };

        debug!(index = %self.index_name, from = ?self.state, to = ?next, "Provisioning transition");

        self.state = next;
        self.transitions.push(next);
        Ok(next)
    }

    /// Summary of the run, available once it reached `Complete`.
    pub fn report(&self) -> Option<ProvisioningReport> {
        match self.state {
            ProvisioningState::Complete { dimension } => Some(ProvisioningReport {
                index_name: self.index_name.clone(),
                dimension,
                deleted_existing: self.deleted_existing,
                transitions: self.transitions.clone(),
            }),
            _ => None,
        }
    }

    async fn check_existence(&self) -> Result<ProvisioningState, ProvisioningError> {
        if self.provisioner.cluster.index_exists(&self.index_name).await? {
            info!(
                index = %self.index_name,
                "Deleting existing index to recreate it with current mappings"
            );
            Ok(ProvisioningState::Delete)
        } else {
            Ok(ProvisioningState::ResolveDimension)
        }
    }

    async fn delete(&mut self) -> Result<ProvisioningState, ProvisioningError> {
        self.provisioner
            .cluster
            .delete_index(&self.index_name)
            .await?;
        self.deleted_existing = true;
        Ok(ProvisioningState::ResolveDimension)
    }

    async fn resolve_dimension(&self) -> Result<ProvisioningState, ProvisioningError> {
        let embedding = self
            .provisioner
            .embedder
            .embed(DIMENSION_PROBE_TEXT)
            .await?;

        let dimension = embedding.len();
        if dimension == 0 {
            return Err(ProvisioningError::embedding(
                "embedding model returned an empty vector for the probe text",
            ));
        }

        info!(index = %self.index_name, dimension, "Using embedding dimension");
        Ok(ProvisioningState::Create { dimension })
    }

    async fn create(&self, dimension: usize) -> Result<ProvisioningState, ProvisioningError> {
        let schema = IndexSchema::patents(dimension)?;

        if let Err(e) = self
            .provisioner
            .cluster
            .create_index(&self.index_name, &schema)
            .await
        {
            error!(index = %self.index_name, error = %e, "Error creating index");
            return Err(e);
        }

        info!(
            index = %self.index_name,
            dimension,
            "Created index with vector search capabilities"
        );
        Ok(ProvisioningState::Complete { dimension })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClusterInfo, IndexSummary};
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    /// Mock cluster recording the index operations it receives
    struct MockCluster {
        calls: Mutex<Vec<String>>,
        exists: bool,
        exists_error: Option<ProvisioningError>,
        delete_error: Option<ProvisioningError>,
        create_error: Option<ProvisioningError>,
        created_dimension: Mutex<Option<usize>>,
    }

    impl MockCluster {
        fn new(exists: bool) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                exists,
                exists_error: None,
                delete_error: None,
                create_error: None,
                created_dimension: Mutex::new(None),
            }
        }

        async fn calls(&self) -> Vec<String> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl SearchCluster for MockCluster {
        async fn ping(&self) -> Result<(), ProvisioningError> {
            Ok(())
        }

        async fn info(&self) -> Result<ClusterInfo, ProvisioningError> {
            Ok(ClusterInfo {
                cluster_name: "mock".to_string(),
                version: "2.11.0".to_string(),
            })
        }

        async fn index_exists(&self, index_name: &str) -> Result<bool, ProvisioningError> {
            self.calls.lock().await.push(format!("exists:{}", index_name));
            match &self.exists_error {
                Some(e) => Err(e.clone()),
                None => Ok(self.exists),
            }
        }

        async fn delete_index(&self, index_name: &str) -> Result<(), ProvisioningError> {
            self.calls.lock().await.push(format!("delete:{}", index_name));
            match &self.delete_error {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }

        async fn create_index(
            &self,
            index_name: &str,
            schema: &IndexSchema,
        ) -> Result<(), ProvisioningError> {
            self.calls.lock().await.push(format!("create:{}", index_name));
            if let Some(e) = &self.create_error {
                return Err(e.clone());
            }
            *self.created_dimension.lock().await = schema.dimension();
            Ok(())
        }

        async fn list_indices(&self) -> Result<Vec<IndexSummary>, ProvisioningError> {
            Ok(Vec::new())
        }
    }

    /// Mock embedder returning a vector of fixed length
    struct MockEmbedder {
        dimension: usize,
        error: Option<ProvisioningError>,
        probes: Mutex<Vec<String>>,
    }

    impl MockEmbedder {
        fn new(dimension: usize) -> Self {
            Self {
                dimension,
                error: None,
                probes: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Embedder for MockEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, ProvisioningError> {
            self.probes.lock().await.push(text.to_string());
            match &self.error {
                Some(e) => Err(e.clone()),
                None => Ok(vec![0.5; self.dimension]),
            }
        }
    }

    fn provisioner(
        cluster: MockCluster,
        embedder: MockEmbedder,
    ) -> (IndexProvisioner, Arc<MockCluster>, Arc<MockEmbedder>) {
        let cluster = Arc::new(cluster);
        let embedder = Arc::new(embedder);
        (
            IndexProvisioner::new(cluster.clone(), embedder.clone()),
            cluster,
            embedder,
        )
    }

    #[tokio::test]
    async fn test_missing_index_skips_delete() {
        let (provisioner, cluster, _) = provisioner(MockCluster::new(false), MockEmbedder::new(384));

        let report = provisioner.ensure_index("patents").await.unwrap();

        assert_eq!(report.index_name, "patents");
        assert_eq!(report.dimension, 384);
        assert!(!report.deleted_existing);
        assert_eq!(
            report.transitions,
            vec![
                ProvisioningState::CheckExistence,
                ProvisioningState::ResolveDimension,
                ProvisioningState::Create { dimension: 384 },
                ProvisioningState::Complete { dimension: 384 },
            ]
        );
        assert_eq!(cluster.calls().await, vec!["exists:patents", "create:patents"]);
        assert_eq!(*cluster.created_dimension.lock().await, Some(384));
    }

    #[tokio::test]
    async fn test_existing_index_is_deleted_before_create() {
        let (provisioner, cluster, _) = provisioner(MockCluster::new(true), MockEmbedder::new(768));

        let report = provisioner.ensure_index("papers").await.unwrap();

        assert!(report.deleted_existing);
        assert_eq!(
            report.transitions,
            vec![
                ProvisioningState::CheckExistence,
                ProvisioningState::Delete,
                ProvisioningState::ResolveDimension,
                ProvisioningState::Create { dimension: 768 },
                ProvisioningState::Complete { dimension: 768 },
            ]
        );
        assert_eq!(
            cluster.calls().await,
            vec!["exists:papers", "delete:papers", "create:papers"]
        );
    }

    #[tokio::test]
    async fn test_advance_step_by_step() {
        let (provisioner, cluster, embedder) =
            provisioner(MockCluster::new(true), MockEmbedder::new(16));

        let mut run = provisioner.begin("patents").unwrap();
        assert_eq!(run.state(), ProvisioningState::CheckExistence);
        assert!(run.report().is_none());

        assert_eq!(run.advance().await.unwrap(), ProvisioningState::Delete);
        assert!(cluster.calls().await.len() == 1);

        assert_eq!(run.advance().await.unwrap(), ProvisioningState::ResolveDimension);
        assert_eq!(cluster.calls().await.last().unwrap(), "delete:patents");

        assert_eq!(
            run.advance().await.unwrap(),
            ProvisioningState::Create { dimension: 16 }
        );
        assert_eq!(
            *embedder.probes.lock().await,
            vec![DIMENSION_PROBE_TEXT.to_string()]
        );

        assert_eq!(
            run.advance().await.unwrap(),
            ProvisioningState::Complete { dimension: 16 }
        );

        // Completed runs stay put
        assert_eq!(
            run.advance().await.unwrap(),
            ProvisioningState::Complete { dimension: 16 }
        );
        assert_eq!(cluster.calls().await.len(), 3);
        assert_eq!(run.transitions().len(), 5);
        assert_eq!(run.report().unwrap().dimension, 16);
    }

    #[tokio::test]
    async fn test_invalid_index_name_issues_no_requests() {
        let (provisioner, cluster, embedder) =
            provisioner(MockCluster::new(true), MockEmbedder::new(8));

        let result = provisioner.ensure_index("Patents").await;

        assert!(matches!(
            result.unwrap_err(),
            ProvisioningError::ValidationError(_)
        ));
        assert!(cluster.calls().await.is_empty());
        assert!(embedder.probes.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_existence_check_failure() {
        let mut cluster = MockCluster::new(true);
        cluster.exists_error = Some(ProvisioningError::index_lookup("status 500"));
        let (provisioner, cluster, _) = provisioner(cluster, MockEmbedder::new(8));

        let mut run = provisioner.begin("patents").unwrap();
        let result = run.advance().await;

        assert_eq!(
            result.unwrap_err(),
            ProvisioningError::index_lookup("status 500")
        );
        assert_eq!(run.state(), ProvisioningState::CheckExistence);
        assert_eq!(cluster.calls().await, vec!["exists:patents"]);
    }

    #[tokio::test]
    async fn test_delete_failure_stops_before_create() {
        let mut cluster = MockCluster::new(true);
        cluster.delete_error = Some(ProvisioningError::index_deletion("forbidden"));
        let (provisioner, cluster, embedder) = provisioner(cluster, MockEmbedder::new(8));

        let result = provisioner.ensure_index("patents").await;

        assert!(matches!(
            result.unwrap_err(),
            ProvisioningError::IndexDeletionError(_)
        ));
        assert_eq!(cluster.calls().await, vec!["exists:patents", "delete:patents"]);
        assert!(embedder.probes.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_failure_has_no_fallback_dimension() {
        let mut embedder = MockEmbedder::new(8);
        embedder.error = Some(ProvisioningError::embedding("model not loaded"));
        let (provisioner, cluster, _) = provisioner(MockCluster::new(false), embedder);

        let mut run = provisioner.begin("patents").unwrap();
        run.advance().await.unwrap();
        let result = run.advance().await;

        assert_eq!(
            result.unwrap_err(),
            ProvisioningError::embedding("model not loaded")
        );
        assert_eq!(run.state(), ProvisioningState::ResolveDimension);
        assert_eq!(cluster.calls().await, vec!["exists:patents"]);
    }

    #[tokio::test]
    async fn test_empty_embedding_rejected() {
        let (provisioner, cluster, _) = provisioner(MockCluster::new(false), MockEmbedder::new(0));

        let result = provisioner.ensure_index("patents").await;

        assert!(matches!(
            result.unwrap_err(),
            ProvisioningError::EmbeddingError(_)
        ));
        assert_eq!(cluster.calls().await, vec!["exists:patents"]);
    }

    #[tokio::test]
    async fn test_create_failure_is_reraised_with_cause() {
        let mut cluster = MockCluster::new(true);
        cluster.create_error = Some(ProvisioningError::index_creation(
            "status 400: illegal_argument_exception",
        ));
        let (provisioner, cluster, _) = provisioner(cluster, MockEmbedder::new(8));

        let mut run = provisioner.begin("patents").unwrap();
        for _ in 0..3 {
            run.advance().await.unwrap();
        }
        let result = run.advance().await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("illegal_argument_exception"));
        assert_eq!(run.state(), ProvisioningState::Create { dimension: 8 });
        assert!(run.report().is_none());
        // The prior delete is not rolled back
        assert_eq!(
            cluster.calls().await,
            vec!["exists:patents", "delete:patents", "create:patents"]
        );
    }
}
