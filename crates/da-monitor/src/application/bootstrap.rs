//! One-shot submission at startup.

use da_types::NamespaceExt;
use tracing::{error, info};

use crate::application::submission::BlobSubmitter;
use crate::domain::{MonitorError, SubmissionReceipt};
use crate::ports::DaNode;

/// Submits and verifies a single blob when the monitor starts.
///
/// Unlike the per-header submission, any failure here is fatal.
pub struct BootstrapSubmission<N: DaNode> {
    submitter: BlobSubmitter<N>,
}

impl<N: DaNode> BootstrapSubmission<N> {
    pub fn new(submitter: BlobSubmitter<N>) -> Self {
        Self { submitter }
    }

    pub async fn run(&self) -> Result<SubmissionReceipt, MonitorError> {
        info!(
            namespace = %self.submitter.namespace().short_hex(),
            "Submitting bootstrap blob"
        );
        match self.submitter.submit_and_verify().await {
            Ok(receipt) => {
                info!("Bootstrap blob verified at height {}", receipt.height);
                Ok(receipt)
            }
            Err(e) => {
                error!("🚧 Bootstrap submission failed: {}", e);
                Err(e)
            }
        }
    }
}
