//! Error types for the unified API.

use contentsum_registry::RegistryError;
use thiserror::Error;

use crate::consistency::ConsistencyReport;

/// Errors surfaced to the session layer.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Registry error.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Local and remote content disagree.
    #[error("content mismatch: {0}")]
    Mismatch(ConsistencyReport),
}

/// Result type for content operations.
pub type Result<T> = std::result::Result<T, ContentError>;
