//! Domain layer: error taxonomy, pipeline reports and blob production.

pub mod errors;
pub mod producer;
pub mod report;

pub use errors::{MonitorError, NodeError};
pub use producer::{BlobProducer, FixedBlobProducer, GreetingBlobProducer};
pub use report::{EdsSummary, PipelineReport, StepOutcome, SubmissionReceipt};
