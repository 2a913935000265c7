//! # DA RPC
//!
//! JSON-RPC client for a Celestia node.
//!
//! Unary calls (`header.GetByHeight`, `blob.GetAll`, `blob.Submit`,
//! `share.GetEDS`) go over HTTP; `header.Subscribe` runs over a WebSocket and
//! feeds headers into a bounded channel.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let client = NodeClient::connect(ClientConfig::new("ws://localhost:26658"))?;
//! let header = client.header_get_by_height(100).await?;
//! let eds = client.share_get_eds(&header).await?;
//! ```

mod client;
mod endpoint;
mod error;
mod jsonrpc;
mod subscription;

pub use client::{ClientConfig, NodeClient};
pub use endpoint::Endpoints;
pub use error::RpcError;
pub use subscription::RpcHeaderSubscription;
