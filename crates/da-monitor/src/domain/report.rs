//! # Pipeline Reports
//!
//! Per-step outcomes of one pipeline run. A run has no single success flag;
//! each step is observed on its own.

use da_types::{BlockHash, Commitment, ExtendedDataSquare};

/// Outcome of one pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome<T> {
    /// Step ran and succeeded.
    Succeeded(T),
    /// Step ran and failed; the error was logged.
    Failed(String),
    /// Step is disabled for this deployment.
    Skipped,
}

impl<T> StepOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Succeeded(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }

    /// Whether the step was attempted at all.
    pub fn attempted(&self) -> bool {
        !matches!(self, StepOutcome::Skipped)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            StepOutcome::Succeeded(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            StepOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Shape of a fetched extended data square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdsSummary {
    pub width: usize,
    pub share_count: usize,
    pub codec: String,
}

impl From<&ExtendedDataSquare> for EdsSummary {
    fn from(eds: &ExtendedDataSquare) -> Self {
        Self {
            width: usize::from(eds.square_width()),
            share_count: eds.data_square().len(),
            codec: eds.codec().to_string(),
        }
    }
}

/// Proof that a submitted blob round-tripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Inclusion height reported by the node.
    pub height: u64,
    /// Commitment of the submitted blob.
    pub commitment: Commitment,
    /// Blobs found in the namespace at the inclusion height.
    pub retrieved: usize,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub height: u64,
    pub hash: BlockHash,
    /// Number of blobs found in the namespace.
    pub blobs: StepOutcome<usize>,
    pub eds: StepOutcome<EdsSummary>,
    pub submission: StepOutcome<SubmissionReceipt>,
}

impl PipelineReport {
    /// Number of steps that ran and failed.
    pub fn failures(&self) -> usize {
        [
            self.blobs.is_failure(),
            self.eds.is_failure(),
            self.submission.is_failure(),
        ]
        .into_iter()
        .filter(|failed| *failed)
        .count()
    }

    /// Number of steps that were attempted.
    pub fn attempted(&self) -> usize {
        [
            self.blobs.attempted(),
            self.eds.attempted(),
            self.submission.attempted(),
        ]
        .into_iter()
        .filter(|attempted| *attempted)
        .count()
    }
}
