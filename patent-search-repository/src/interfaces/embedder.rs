//! Embedding model trait definition.

use async_trait::async_trait;

use crate::errors::ProvisioningError;

/// Turns text into a dense vector.
///
/// Provisioning only needs the length of the returned vector, which becomes
/// the dimension of the index's `knn_vector` field.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<f32>)` - The embedding vector
    /// * `Err(ProvisioningError::EmbeddingError)` - If the model could not be reached
    ///   or answered with something other than a vector
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProvisioningError>;
}
