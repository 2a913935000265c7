//! # Outbound Ports
//!
//! The node capability the monitor depends on, plus a scripted mock.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use celestia_types::test_utils::ExtendedHeaderGenerator;
use parking_lot::Mutex;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

use da_types::{Blob, Commitment, ExtendedDataSquare, ExtendedHeader, GasPrice, Namespace};

use crate::domain::NodeError;

/// Ordered stream of headers from one subscription.
///
/// Backed by a bounded channel: the producer suspends while the queue is
/// full. `next` yields `None` once the producer side is gone.
#[derive(Debug)]
pub struct HeaderSubscription {
    receiver: mpsc::Receiver<ExtendedHeader>,
}

impl HeaderSubscription {
    pub fn new(receiver: mpsc::Receiver<ExtendedHeader>) -> Self {
        Self { receiver }
    }

    /// Create a subscription together with its producer handle.
    pub fn channel(capacity: usize) -> (mpsc::Sender<ExtendedHeader>, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Self::new(rx))
    }

    pub async fn next(&mut self) -> Option<ExtendedHeader> {
        self.receiver.recv().await
    }
}

/// Data availability node - outbound port.
#[async_trait]
pub trait DaNode: Send + Sync + 'static {
    /// Open a header subscription. Headers stop when `cancel` fires.
    async fn subscribe_headers(
        &self,
        cancel: CancellationToken,
    ) -> Result<HeaderSubscription, NodeError>;

    /// Fetch the header at `height`.
    async fn get_header_by_height(&self, height: u64) -> Result<ExtendedHeader, NodeError>;

    /// Fetch all blobs at `height` in any of `namespaces`. Empty is not an error.
    async fn get_all_blobs(
        &self,
        height: u64,
        namespaces: &[Namespace],
    ) -> Result<Vec<Blob>, NodeError>;

    /// Submit blobs and return their inclusion height.
    async fn submit_blobs(&self, blobs: Vec<Blob>, gas_price: GasPrice) -> Result<u64, NodeError>;

    /// Fetch the extended data square of the block described by `header`.
    async fn get_eds(&self, header: &ExtendedHeader) -> Result<ExtendedDataSquare, NodeError>;
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

/// First inclusion height handed out by [`MockDaNode`].
pub const MOCK_FIRST_SUBMIT_HEIGHT: u64 = 10_000;

/// Failure switches for [`MockDaNode`].
#[derive(Debug, Clone, Default)]
pub struct MockBehavior {
    /// Refuse to open the subscription.
    pub fail_subscribe: bool,
    /// Never answer the subscribe call.
    pub stall_subscribe: bool,
    /// Heights at which `get_all_blobs` fails.
    pub fail_blob_fetch_at: Vec<u64>,
    /// Each `get_all_blobs` consumes one permit, waiting until one is added.
    pub blob_fetch_gate: Option<Arc<Semaphore>>,
    /// Fail every `get_header_by_height`.
    pub fail_header_lookup: bool,
    /// Fail every `get_eds`.
    pub fail_eds: bool,
    /// Fail every `submit_blobs`.
    pub fail_submit: bool,
    /// Return submitted blobs with this commitment instead of their own.
    pub corrupt_commitment: Option<Commitment>,
    /// Accept submissions but never return them.
    pub drop_submitted: bool,
}

/// One recorded call on [`MockDaNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeCall {
    Subscribe,
    GetHeader { height: u64 },
    GetAllBlobs { height: u64 },
    SubmitBlobs { count: usize },
    GetEds { height: u64 },
}

impl NodeCall {
    /// Height the call was made for, if any.
    pub fn height(&self) -> Option<u64> {
        match self {
            NodeCall::GetHeader { height }
            | NodeCall::GetAllBlobs { height }
            | NodeCall::GetEds { height } => Some(*height),
            _ => None,
        }
    }
}

/// Scripted node for testing.
///
/// Headers are pushed through the sender returned by [`MockDaNode::new`].
/// Submitted blobs are stored and served back by `get_all_blobs` at the
/// height `submit_blobs` reported.
pub struct MockDaNode {
    behavior: MockBehavior,
    subscription: Mutex<Option<HeaderSubscription>>,
    submitted: Mutex<BTreeMap<u64, Vec<Blob>>>,
    next_submit_height: AtomicU64,
    calls: Mutex<Vec<NodeCall>>,
}

impl MockDaNode {
    /// Mock plus the sender feeding its header subscription.
    pub fn new(behavior: MockBehavior, capacity: usize) -> (Self, mpsc::Sender<ExtendedHeader>) {
        let (tx, subscription) = HeaderSubscription::channel(capacity);
        let node = Self {
            behavior,
            subscription: Mutex::new(Some(subscription)),
            submitted: Mutex::new(BTreeMap::new()),
            next_submit_height: AtomicU64::new(MOCK_FIRST_SUBMIT_HEIGHT),
            calls: Mutex::new(Vec::new()),
        };
        (node, tx)
    }

    /// Mock whose subscription delivers `heights` and then closes.
    pub fn with_headers(behavior: MockBehavior, heights: &[u64]) -> Self {
        let (node, tx) = Self::new(behavior, heights.len());
        for &height in heights {
            // Capacity covers every header, so this never fails.
            let _ = tx.try_send(mock_header(height));
        }
        node
    }

    pub fn calls(&self) -> Vec<NodeCall> {
        self.calls.lock().clone()
    }

    /// Calls made for `height`, in order.
    pub fn calls_at(&self, height: u64) -> Vec<NodeCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.height() == Some(height))
            .cloned()
            .collect()
    }

    pub fn submission_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, NodeCall::SubmitBlobs { .. }))
            .count()
    }

    pub fn submitted_at(&self, height: u64) -> Vec<Blob> {
        self.submitted.lock().get(&height).cloned().unwrap_or_default()
    }

    fn record(&self, call: NodeCall) {
        self.calls.lock().push(call);
    }
}

/// Freshly signed header at `height` (at least 1).
pub fn mock_header(height: u64) -> ExtendedHeader {
    ExtendedHeaderGenerator::new_from_height(height).next()
}

fn mock_failure(operation: &str) -> NodeError {
    NodeError::Transport(format!("mock {operation} failure"))
}

#[async_trait]
impl DaNode for MockDaNode {
    async fn subscribe_headers(
        &self,
        _cancel: CancellationToken,
    ) -> Result<HeaderSubscription, NodeError> {
        self.record(NodeCall::Subscribe);
        if self.behavior.stall_subscribe {
            std::future::pending::<()>().await;
        }
        if self.behavior.fail_subscribe {
            return Err(NodeError::Subscription("mock subscribe failure".to_string()));
        }
        self.subscription
            .lock()
            .take()
            .ok_or_else(|| NodeError::Subscription("already subscribed".to_string()))
    }

    async fn get_header_by_height(&self, height: u64) -> Result<ExtendedHeader, NodeError> {
        self.record(NodeCall::GetHeader { height });
        if self.behavior.fail_header_lookup {
            return Err(mock_failure("header lookup"));
        }
        Ok(mock_header(height))
    }

    async fn get_all_blobs(
        &self,
        height: u64,
        namespaces: &[Namespace],
    ) -> Result<Vec<Blob>, NodeError> {
        self.record(NodeCall::GetAllBlobs { height });
        if let Some(gate) = &self.behavior.blob_fetch_gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        if self.behavior.fail_blob_fetch_at.contains(&height) {
            return Err(mock_failure("blob fetch"));
        }
        if self.behavior.drop_submitted {
            return Ok(Vec::new());
        }

        let blobs = self
            .submitted
            .lock()
            .get(&height)
            .map(|blobs| {
                blobs
                    .iter()
                    .filter(|b| namespaces.contains(&b.namespace))
                    .cloned()
                    .map(|mut b| {
                        if let Some(commitment) = self.behavior.corrupt_commitment {
                            b.commitment = commitment;
                        }
                        b
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(blobs)
    }

    async fn submit_blobs(&self, blobs: Vec<Blob>, _gas_price: GasPrice) -> Result<u64, NodeError> {
        self.record(NodeCall::SubmitBlobs { count: blobs.len() });
        if self.behavior.fail_submit {
            return Err(mock_failure("submit"));
        }
        let height = self.next_submit_height.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().insert(height, blobs);
        Ok(height)
    }

    async fn get_eds(&self, header: &ExtendedHeader) -> Result<ExtendedDataSquare, NodeError> {
        self.record(NodeCall::GetEds {
            height: header.height().value(),
        });
        if self.behavior.fail_eds {
            return Err(mock_failure("EDS fetch"));
        }
        Ok(ExtendedDataSquare::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns() -> Namespace {
        da_types::blob_namespace(&[0xC0, 0xDE]).unwrap()
    }

    #[tokio::test]
    async fn test_mock_serves_submitted_blobs() {
        let (node, _tx) = MockDaNode::new(MockBehavior::default(), 4);
        let blob = da_types::build_blob(ns(), b"hello".to_vec()).unwrap();
        let height = node
            .submit_blobs(vec![blob.clone()], GasPrice::NODE_DEFAULT)
            .await
            .unwrap();
        assert_eq!(height, MOCK_FIRST_SUBMIT_HEIGHT);

        let got = node.get_all_blobs(height, &[ns()]).await.unwrap();
        assert_eq!(got, vec![blob]);

        let other = da_types::blob_namespace(&[0x01, 0x00]).unwrap();
        assert!(node.get_all_blobs(height, &[other]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_subscription_is_single_use() {
        let node = MockDaNode::with_headers(MockBehavior::default(), &[1, 2]);
        let mut sub = node
            .subscribe_headers(CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(sub.next().await.map(|h| h.height().value()), Some(1));
        assert_eq!(sub.next().await.map(|h| h.height().value()), Some(2));
        assert!(sub.next().await.is_none());

        let second = node.subscribe_headers(CancellationToken::new()).await;
        assert!(matches!(second, Err(NodeError::Subscription(_))));
    }

    #[tokio::test]
    async fn test_mock_failure_switches() {
        let behavior = MockBehavior {
            fail_blob_fetch_at: vec![7],
            fail_eds: true,
            fail_submit: true,
            ..Default::default()
        };
        let (node, _tx) = MockDaNode::new(behavior, 1);

        assert!(node.get_all_blobs(7, &[ns()]).await.is_err());
        assert!(node.get_all_blobs(8, &[ns()]).await.unwrap().is_empty());
        assert!(node.get_eds(&mock_header(7)).await.is_err());
        assert!(node
            .submit_blobs(Vec::new(), GasPrice::NODE_DEFAULT)
            .await
            .is_err());
        assert_eq!(node.calls_at(7).len(), 2);
    }

    #[tokio::test]
    async fn test_mock_corrupts_commitment() {
        let bogus = Commitment::new([0xEE; 32]);
        let (node, _tx) = MockDaNode::new(
            MockBehavior {
                corrupt_commitment: Some(bogus),
                ..Default::default()
            },
            1,
        );
        let blob = da_types::build_blob(ns(), b"hello".to_vec()).unwrap();
        let height = node
            .submit_blobs(vec![blob], GasPrice::NODE_DEFAULT)
            .await
            .unwrap();
        let got = node.get_all_blobs(height, &[ns()]).await.unwrap();
        assert_eq!(got[0].commitment, bogus);
    }

    #[test]
    fn test_mock_header_has_requested_height() {
        assert_eq!(mock_header(1).height().value(), 1);
        assert_eq!(mock_header(0x0102).height().value(), 0x0102);
    }

    #[tokio::test]
    async fn test_blob_fetch_gate_holds_until_permit() {
        let gate = Arc::new(Semaphore::new(0));
        let (node, _tx) = MockDaNode::new(
            MockBehavior {
                blob_fetch_gate: Some(Arc::clone(&gate)),
                ..Default::default()
            },
            1,
        );
        let namespaces = [ns()];
        let fetch = node.get_all_blobs(3, &namespaces);
        tokio::pin!(fetch);

        let waited = tokio::time::timeout(std::time::Duration::from_millis(50), &mut fetch).await;
        assert!(waited.is_err());
        assert_eq!(node.calls_at(3), vec![NodeCall::GetAllBlobs { height: 3 }]);

        gate.add_permits(1);
        assert!(fetch.await.unwrap().is_empty());
    }
}
