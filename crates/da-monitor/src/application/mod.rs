//! # Application Layer
//!
//! Header event loop, action pipeline, bootstrap submission and the runtime
//! that runs them together.

pub mod bootstrap;
pub mod event_loop;
pub mod pipeline;
pub mod runtime;
pub mod submission;

pub use bootstrap::BootstrapSubmission;
pub use event_loop::HeaderEventLoop;
pub use pipeline::ActionPipeline;
pub use runtime::Monitor;
pub use submission::{verify_commitment, BlobSubmitter};
