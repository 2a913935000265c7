//! # Error Types
//!
//! Validation errors for DA value types.

use thiserror::Error;

/// Errors raised while building DA value types.
#[derive(Debug, Error)]
pub enum TypesError {
    /// Only version-0 namespaces carry user blobs.
    #[error("Unsupported namespace version: {0}")]
    UnsupportedNamespaceVersion(u8),

    /// Namespace is reserved by the protocol and cannot carry blobs.
    #[error("Namespace {0} is reserved and cannot be used for blobs")]
    ReservedNamespace(String),

    /// Blob with no payload.
    #[error("Blob data must not be empty")]
    EmptyBlob,

    /// Rejected by the Celestia type layer.
    #[error(transparent)]
    Celestia(#[from] celestia_types::Error),
}
