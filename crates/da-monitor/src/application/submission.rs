//! Submit-and-verify routine shared by the pipeline and the bootstrap.

use std::sync::Arc;

use tracing::{debug, info};

use da_types::{commitment_hex, Blob, Commitment, GasPrice, Namespace, NamespaceExt};

use crate::domain::{BlobProducer, MonitorError, SubmissionReceipt};
use crate::ports::DaNode;

/// Submits a fresh blob and reads it back to confirm inclusion.
pub struct BlobSubmitter<N: DaNode> {
    node: Arc<N>,
    namespace: Namespace,
    producer: Arc<dyn BlobProducer>,
    gas_price: GasPrice,
}

impl<N: DaNode> Clone for BlobSubmitter<N> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
            namespace: self.namespace,
            producer: Arc::clone(&self.producer),
            gas_price: self.gas_price,
        }
    }
}

impl<N: DaNode> BlobSubmitter<N> {
    pub fn new(
        node: Arc<N>,
        namespace: Namespace,
        producer: Arc<dyn BlobProducer>,
        gas_price: GasPrice,
    ) -> Self {
        Self {
            node,
            namespace,
            producer,
            gas_price,
        }
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Produce, submit, retrieve and compare one blob.
    pub async fn submit_and_verify(&self) -> Result<SubmissionReceipt, MonitorError> {
        let blob = self.producer.produce(self.namespace)?;
        let commitment = blob.commitment;
        debug!(
            namespace = %self.namespace.short_hex(),
            len = blob.data.len(),
            commitment = %commitment_hex(&commitment),
            "Submitting blob"
        );

        let height = self
            .node
            .submit_blobs(vec![blob], self.gas_price)
            .await
            .map_err(MonitorError::Submit)?;
        info!("🟢 Blob was included at height {}", height);

        let retrieved = self
            .node
            .get_all_blobs(height, &[self.namespace])
            .await
            .map_err(|source| MonitorError::Retrieve { height, source })?;

        verify_commitment(height, &self.namespace, commitment, &retrieved)?;
        info!(
            "✅ Blob verified at height {} (commitment {})",
            height,
            commitment_hex(&commitment)
        );

        Ok(SubmissionReceipt {
            height,
            commitment,
            retrieved: retrieved.len(),
        })
    }
}

/// Check that some blob in `retrieved` carries `submitted`.
///
/// On mismatch the first retrieved commitment is reported.
pub fn verify_commitment(
    height: u64,
    namespace: &Namespace,
    submitted: Commitment,
    retrieved: &[Blob],
) -> Result<(), MonitorError> {
    let first = retrieved.first().ok_or_else(|| MonitorError::BlobNotFound {
        height,
        namespace: namespace.short_hex(),
    })?;

    if retrieved.iter().any(|b| b.commitment == submitted) {
        Ok(())
    } else {
        Err(MonitorError::CommitmentMismatch {
            height,
            submitted: commitment_hex(&submitted),
            retrieved: commitment_hex(&first.commitment),
        })
    }
}
