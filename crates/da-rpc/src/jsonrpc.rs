//! JSON-RPC 2.0 envelopes, including the channel notifications used by the
//! node for subscriptions (`xrpc.ch.val` / `xrpc.ch.close`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Notification carrying one value of a subscription channel.
pub const CHANNEL_VALUE: &str = "xrpc.ch.val";
/// Notification closing a subscription channel.
pub const CHANNEL_CLOSE: &str = "xrpc.ch.close";

/// JSON-RPC request structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a, T: Serialize> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: T,
    pub id: u64,
}

impl<'a, T: Serialize> JsonRpcRequest<'a, T> {
    pub fn new(method: &'a str, params: T, id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id,
        }
    }
}

/// JSON-RPC response structure.
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    #[allow(dead_code)]
    pub jsonrpc: Option<String>,
    #[allow(dead_code)]
    pub id: Option<u64>,
    pub result: Option<T>,
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// Any message read from the subscription socket: a response to one of our
/// requests, or a server-initiated notification.
#[derive(Debug, Deserialize)]
pub struct SocketMessage {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<JsonRpcError>,
    pub method: Option<String>,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl SocketMessage {
    /// For `xrpc.ch.val`: the channel id and carried value.
    pub fn channel_value(self) -> Option<(Value, Value)> {
        if self.method.as_deref() != Some(CHANNEL_VALUE) {
            return None;
        }
        let mut params = self.params.into_iter();
        Some((params.next()?, params.next()?))
    }

    /// For `xrpc.ch.close`: the closed channel id.
    pub fn closed_channel(&self) -> Option<&Value> {
        if self.method.as_deref() != Some(CHANNEL_CLOSE) {
            return None;
        }
        self.params.first()
    }
}
