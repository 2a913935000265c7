//! Per-header action pipeline.
//!
//! Steps run in order and in isolation: a failing step is logged and
//! reported, and the next step still runs.

use std::sync::Arc;

use tracing::{error, info};

use da_types::{ExtendedHeader, Namespace, NamespaceExt};

use crate::application::submission::BlobSubmitter;
use crate::domain::{EdsSummary, MonitorError, PipelineReport, StepOutcome, SubmissionReceipt};
use crate::ports::DaNode;

/// Runs blob fetch, EDS fetch and the optional submit-and-verify per header.
pub struct ActionPipeline<N: DaNode> {
    node: Arc<N>,
    namespace: Namespace,
    submitter: Option<BlobSubmitter<N>>,
}

impl<N: DaNode> ActionPipeline<N> {
    /// Pipeline without the submit step.
    pub fn new(node: Arc<N>, namespace: Namespace) -> Self {
        Self {
            node,
            namespace,
            submitter: None,
        }
    }

    /// Enable submit-and-verify on every header.
    pub fn with_submitter(mut self, submitter: BlobSubmitter<N>) -> Self {
        self.submitter = Some(submitter);
        self
    }

    pub async fn run(&self, header: &ExtendedHeader) -> PipelineReport {
        let height = header.height().value();
        let hash = header.hash();
        info!("🧊 New header received: Height {}, Hash {}", height, hash);

        let blobs = self.fetch_blobs(height).await;
        let eds = self.fetch_eds(height).await;
        let submission = match &self.submitter {
            Some(submitter) => Self::submit(submitter, height).await,
            None => StepOutcome::Skipped,
        };

        PipelineReport {
            height,
            hash,
            blobs,
            eds,
            submission,
        }
    }

    async fn fetch_blobs(&self, height: u64) -> StepOutcome<usize> {
        match self.node.get_all_blobs(height, &[self.namespace]).await {
            Ok(blobs) => {
                info!(
                    "🟣 Found {} blobs at height {} in namespace {}",
                    blobs.len(),
                    height,
                    self.namespace.short_hex()
                );
                StepOutcome::Succeeded(blobs.len())
            }
            Err(source) => {
                let err = MonitorError::Retrieve { height, source };
                error!("🚧 {}", err);
                StepOutcome::Failed(err.to_string())
            }
        }
    }

    async fn fetch_eds(&self, height: u64) -> StepOutcome<EdsSummary> {
        // share.GetEDS wants the node's own header, so look it up again.
        let header = match self.node.get_header_by_height(height).await {
            Ok(header) => header,
            Err(source) => {
                let err = MonitorError::HeaderLookup { height, source };
                error!("🚧 {}", err);
                return StepOutcome::Failed(err.to_string());
            }
        };

        match self.node.get_eds(&header).await {
            Ok(eds) => {
                let summary = EdsSummary::from(&eds);
                info!(
                    "🟩 EDS at height {}: {}x{} ({} shares)",
                    height, summary.width, summary.width, summary.share_count
                );
                StepOutcome::Succeeded(summary)
            }
            Err(source) => {
                let err = MonitorError::EdsFetch { height, source };
                error!("🚧 {}", err);
                StepOutcome::Failed(err.to_string())
            }
        }
    }

    async fn submit(submitter: &BlobSubmitter<N>, height: u64) -> StepOutcome<SubmissionReceipt> {
        match submitter.submit_and_verify().await {
            Ok(receipt) => StepOutcome::Succeeded(receipt),
            Err(e) => {
                error!("🚧 Submission for header {} failed: {}", height, e);
                StepOutcome::Failed(e.to_string())
            }
        }
    }
}
