//! Monitor runtime: runs the bootstrap submission and the header event loop
//! side by side until cancellation or the first fatal error.

use std::sync::Arc;

use da_types::NamespaceExt;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::application::bootstrap::BootstrapSubmission;
use crate::application::event_loop::HeaderEventLoop;
use crate::application::pipeline::ActionPipeline;
use crate::application::submission::BlobSubmitter;
use crate::config::MonitorConfig;
use crate::domain::{BlobProducer, GreetingBlobProducer, MonitorError, PipelineReport};
use crate::ports::DaNode;

/// Top-level monitor service.
pub struct Monitor<N: DaNode> {
    node: Arc<N>,
    config: MonitorConfig,
    producer: Arc<dyn BlobProducer>,
    reports: Option<mpsc::UnboundedSender<PipelineReport>>,
}

impl<N: DaNode> Monitor<N> {
    pub fn new(node: Arc<N>, config: MonitorConfig) -> Self {
        let producer = Arc::new(GreetingBlobProducer::new(config.padding_bytes));
        Self {
            node,
            config,
            producer,
            reports: None,
        }
    }

    pub fn with_producer(mut self, producer: Arc<dyn BlobProducer>) -> Self {
        self.producer = producer;
        self
    }

    /// Forward every pipeline report to `sink`.
    pub fn with_report_sink(mut self, sink: mpsc::UnboundedSender<PipelineReport>) -> Self {
        self.reports = Some(sink);
        self
    }

    /// Run until `cancel` fires (`Ok`) or a unit fails (that unit's error).
    ///
    /// A fatal error in one unit cancels the other.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), MonitorError> {
        self.config.validate()?;
        let cancel = cancel.child_token();

        let submitter = BlobSubmitter::new(
            Arc::clone(&self.node),
            self.config.namespace,
            Arc::clone(&self.producer),
            self.config.gas_price,
        );

        let mut pipeline = ActionPipeline::new(Arc::clone(&self.node), self.config.namespace);
        if self.config.submit_per_header {
            pipeline = pipeline.with_submitter(submitter.clone());
        }
        let mut event_loop = HeaderEventLoop::new(Arc::clone(&self.node), pipeline);
        if let Some(sink) = self.reports {
            event_loop = event_loop.with_report_sink(sink);
        }

        info!(
            namespace = %self.config.namespace.short_hex(),
            variant = ?self.config.variant,
            bootstrap = self.config.bootstrap,
            submit_per_header = self.config.submit_per_header,
            "Starting monitor"
        );

        let mut tasks = JoinSet::new();

        tasks.spawn({
            let cancel = cancel.clone();
            async move { event_loop.run(cancel).await }
        });

        if self.config.bootstrap {
            let bootstrap = BootstrapSubmission::new(submitter);
            let cancel = cancel.clone();
            tasks.spawn(async move {
                tokio::select! {
                    _ = cancel.cancelled() => Ok(()),
                    result = bootstrap.run() => result.map(|_| ()),
                }
            });
        }

        let mut outcome = Ok(());
        while let Some(joined) = tasks.join_next().await {
            let result = joined
                .map_err(|e| MonitorError::Task(e.to_string()))
                .and_then(|r| r);
            if let Err(e) = result {
                if outcome.is_ok() {
                    error!("Fatal monitor error: {}", e);
                    cancel.cancel();
                    outcome = Err(e);
                }
            }
        }
        outcome
    }
}
