//! JSON-RPC adapter for the node port.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use da_rpc::{NodeClient, RpcError};
use da_types::{Blob, ExtendedDataSquare, ExtendedHeader, GasPrice, Namespace};

use crate::domain::NodeError;
use crate::ports::{DaNode, HeaderSubscription};

/// [`DaNode`] backed by a live node over JSON-RPC.
pub struct RpcNode {
    client: NodeClient,
}

impl RpcNode {
    pub fn new(client: NodeClient) -> Self {
        Self { client }
    }
}

impl From<RpcError> for NodeError {
    fn from(e: RpcError) -> Self {
        match e {
            RpcError::Rpc { code, message, .. } => NodeError::Rpc { code, message },
            RpcError::Decode { .. } | RpcError::MissingResult { .. } | RpcError::Invalid { .. } => {
                NodeError::Malformed(e.to_string())
            }
            RpcError::SubscriptionNotConfirmed
            | RpcError::Timeout { .. }
            | RpcError::Cancelled { .. } => NodeError::Subscription(e.to_string()),
            other => NodeError::Transport(other.to_string()),
        }
    }
}

#[async_trait]
impl DaNode for RpcNode {
    async fn subscribe_headers(
        &self,
        cancel: CancellationToken,
    ) -> Result<HeaderSubscription, NodeError> {
        let subscription = self.client.header_subscribe(cancel).await?;
        Ok(HeaderSubscription::new(subscription.into_receiver()))
    }

    async fn get_header_by_height(&self, height: u64) -> Result<ExtendedHeader, NodeError> {
        Ok(self.client.header_get_by_height(height).await?)
    }

    async fn get_all_blobs(
        &self,
        height: u64,
        namespaces: &[Namespace],
    ) -> Result<Vec<Blob>, NodeError> {
        Ok(self.client.blob_get_all(height, namespaces).await?)
    }

    async fn submit_blobs(&self, blobs: Vec<Blob>, gas_price: GasPrice) -> Result<u64, NodeError> {
        Ok(self.client.blob_submit(&blobs, gas_price).await?)
    }

    async fn get_eds(&self, header: &ExtendedHeader) -> Result<ExtendedDataSquare, NodeError> {
        Ok(self.client.share_get_eds(header).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_maps_to_node_error() {
        let err: NodeError = RpcError::Rpc {
            method: "blob.Submit",
            code: -32000,
            message: "insufficient funds".into(),
        }
        .into();
        assert_eq!(
            err,
            NodeError::Rpc {
                code: -32000,
                message: "insufficient funds".into()
            }
        );

        let err: NodeError = RpcError::MissingResult {
            method: "header.GetByHeight",
        }
        .into();
        assert!(matches!(err, NodeError::Malformed(_)));

        let err: NodeError = RpcError::InvalidToken("bad".into()).into();
        assert!(matches!(err, NodeError::Transport(_)));

        let err: NodeError = RpcError::Timeout {
            method: "header.Subscribe",
            after: std::time::Duration::from_secs(30),
        }
        .into();
        assert!(matches!(err, NodeError::Subscription(ref m) if m.contains("timed out")));
    }

    #[tokio::test]
    async fn test_unreachable_node_reports_transport_error() {
        let client = NodeClient::connect(
            da_rpc::ClientConfig::new("ws://127.0.0.1:1")
                .with_request_timeout(std::time::Duration::from_secs(2)),
        )
        .unwrap();
        let node = RpcNode::new(client);
        let err = node.get_header_by_height(1).await.unwrap_err();
        assert!(matches!(err, NodeError::Transport(_)));
    }
}
