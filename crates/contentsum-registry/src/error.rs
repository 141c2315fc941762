//! Error types for the registry module.

use thiserror::Error;

/// Errors that can occur while building or loading a content table.
///
/// Checksum computation itself never fails; these only cover getting a table
/// into the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The content loader reported a failure.
    #[error("content load failed: {0}")]
    LoadFailed(String),

    /// The loader went away without delivering a table.
    #[error("content loader dropped before delivering a table")]
    LoaderDropped,

    /// Two items in one table share a name.
    #[error("duplicate content name: {0}")]
    DuplicateName(String),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
