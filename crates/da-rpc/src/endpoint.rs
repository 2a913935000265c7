//! Node endpoint resolution.
//!
//! A node exposes one RPC port for both transports. The configured URL may use
//! any of `ws`, `wss`, `http` or `https`; the counterpart scheme is derived.

use crate::RpcError;

/// HTTP and WebSocket URLs of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub http: String,
    pub ws: String,
}

impl Endpoints {
    pub fn from_url(url: &str) -> Result<Self, RpcError> {
        let url = url.trim().trim_end_matches('/');
        let (scheme, rest) = url.split_once("://").ok_or_else(|| RpcError::InvalidUrl {
            url: url.to_string(),
            reason: "missing scheme".to_string(),
        })?;

        if rest.is_empty() {
            return Err(RpcError::InvalidUrl {
                url: url.to_string(),
                reason: "missing host".to_string(),
            });
        }

        let (http_scheme, ws_scheme) = match scheme.to_ascii_lowercase().as_str() {
            "ws" | "http" => ("http", "ws"),
            "wss" | "https" => ("https", "wss"),
            other => {
                return Err(RpcError::InvalidUrl {
                    url: url.to_string(),
                    reason: format!("unsupported scheme {other:?}"),
                })
            }
        };

        Ok(Self {
            http: format!("{http_scheme}://{rest}"),
            ws: format!("{ws_scheme}://{rest}"),
        })
    }
}
