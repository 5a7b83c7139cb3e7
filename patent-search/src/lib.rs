//! # Patent Search
//!
//! Command-line entry point around `patent-search-repository`: connects to
//! OpenSearch, optionally (re)provisions the patent vector index and lists
//! the indices present in the cluster.
//!
//! ## Modules
//!
//! - [`config`]: Environment configuration and dependency initialization
//! - [`runner`]: Provisioning and index listing flow
//! - [`errors`]: Error types for the binary

pub mod config;
pub mod errors;
pub mod runner;

pub use config::{Dependencies, Settings};
pub use errors::AppError;
