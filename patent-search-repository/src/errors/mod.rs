//! Error types for the patent search repository.
//!
//! This module provides a unified error type for connection setup and index
//! provisioning.

mod provisioning_error;

pub use provisioning_error::ProvisioningError;
