//! Error type for node RPC calls.

use std::time::Duration;

use da_types::TypesError;
use thiserror::Error;

/// Errors from the node RPC client.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Invalid node URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid auth token: {0}")]
    InvalidToken(String),

    #[error("Failed to create HTTP client: {0}")]
    HttpClientCreation(#[source] reqwest::Error),

    #[error("{method} request failed: {source}")]
    Http {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] Box<tokio_tungstenite::tungstenite::Error>),

    /// JSON-RPC error object returned by the node.
    #[error("{method} returned RPC error {code}: {message}")]
    Rpc {
        method: &'static str,
        code: i64,
        message: String,
    },

    #[error("{method} response missing result")]
    MissingResult { method: &'static str },

    #[error("Failed to decode {method} response: {source}")]
    Decode {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode {method} request: {source}")]
    Encode {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Response decoded but does not form a valid value.
    #[error("{method} returned an invalid value: {source}")]
    Invalid {
        method: &'static str,
        #[source]
        source: TypesError,
    },

    #[error("Subscription closed before it was confirmed")]
    SubscriptionNotConfirmed,

    #[error("{method} timed out after {after:?}")]
    Timeout {
        method: &'static str,
        after: Duration,
    },

    #[error("{method} cancelled")]
    Cancelled { method: &'static str },
}

impl RpcError {
    /// Whether the node reported that the requested item does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RpcError::Rpc { message, .. } if message.contains("not found"))
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for RpcError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        RpcError::WebSocket(Box::new(e))
    }
}
