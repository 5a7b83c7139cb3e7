//! Embedding model clients.
//!
//! Provisioning only asks the embedding model for one vector, so a single
//! HTTP client for an Ollama-compatible server covers the production path.

mod ollama;

pub use ollama::{OllamaEmbedder, DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_URL};
