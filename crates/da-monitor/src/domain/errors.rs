//! # Domain Errors
//!
//! Error types for the monitor core.
//!
//! Setup and bootstrap errors are fatal and propagate to the process
//! boundary. Per-header step errors are logged and absorbed by the pipeline.

use da_types::TypesError;
use thiserror::Error;

/// Error reported by the node capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// Network or transport failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Node answered with a JSON-RPC error.
    #[error("Node error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message from the node
        message: String,
    },

    /// Node answered with something that could not be decoded.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Subscription could not be established.
    #[error("Subscription rejected: {0}")]
    Subscription(String),
}

/// Monitor error types.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Header subscription could not be opened.
    #[error("Failed to subscribe to headers: {0}")]
    Subscribe(#[source] NodeError),

    /// Subscription ended without the loop being cancelled.
    #[error("Header subscription closed by the node")]
    SubscriptionClosed,

    /// Blob could not be built.
    #[error("Failed to construct blob: {0}")]
    BlobConstruction(#[from] TypesError),

    /// Node rejected the submission.
    #[error("Failed to submit blob: {0}")]
    Submit(#[source] NodeError),

    /// Blob retrieval failed.
    #[error("Failed to retrieve blobs at height {height}: {source}")]
    Retrieve {
        /// Height queried
        height: u64,
        /// Underlying node error
        #[source]
        source: NodeError,
    },

    /// Header lookup by height failed.
    #[error("Failed to get header at height {height}: {source}")]
    HeaderLookup {
        /// Height queried
        height: u64,
        /// Underlying node error
        #[source]
        source: NodeError,
    },

    /// Extended data square retrieval failed.
    #[error("Failed to fetch EDS at height {height}: {source}")]
    EdsFetch {
        /// Height queried
        height: u64,
        /// Underlying node error
        #[source]
        source: NodeError,
    },

    /// Submitted blob missing from its inclusion height.
    #[error("Submitted blob not found at height {height} in namespace {namespace}")]
    BlobNotFound {
        /// Inclusion height reported by the node
        height: u64,
        /// Namespace queried
        namespace: String,
    },

    /// Retrieved blob does not match the submitted one.
    #[error("Commitment mismatch at height {height}: submitted {submitted}, retrieved {retrieved}")]
    CommitmentMismatch {
        /// Inclusion height reported by the node
        height: u64,
        /// Hex commitment of the submitted blob
        submitted: String,
        /// Hex commitment of the first retrieved blob
        retrieved: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A monitor task panicked or was aborted.
    #[error("Monitor task failed: {0}")]
    Task(String),
}
