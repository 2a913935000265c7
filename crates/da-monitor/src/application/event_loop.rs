//! Header event loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::pipeline::ActionPipeline;
use crate::domain::{MonitorError, PipelineReport};
use crate::ports::DaNode;

/// Subscribes once and runs the pipeline for every delivered header.
///
/// One run completes before the next header is taken off the queue, so
/// headers are processed strictly in delivery order.
pub struct HeaderEventLoop<N: DaNode> {
    node: Arc<N>,
    pipeline: ActionPipeline<N>,
    reports: Option<mpsc::UnboundedSender<PipelineReport>>,
    processed: u64,
    last_height: Option<u64>,
}

impl<N: DaNode> HeaderEventLoop<N> {
    pub fn new(node: Arc<N>, pipeline: ActionPipeline<N>) -> Self {
        Self {
            node,
            pipeline,
            reports: None,
            processed: 0,
            last_height: None,
        }
    }

    /// Forward every pipeline report to `sink`.
    pub fn with_report_sink(mut self, sink: mpsc::UnboundedSender<PipelineReport>) -> Self {
        self.reports = Some(sink);
        self
    }

    /// Headers processed so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Run until `cancel` fires or the subscription ends.
    ///
    /// Returns `Ok(())` on cancellation and
    /// [`MonitorError::SubscriptionClosed`] when the stream ends on its own.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), MonitorError> {
        let subscribe = self.node.subscribe_headers(cancel.child_token());
        let mut subscription = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Cancelled before the header subscription was established");
                return Ok(());
            }
            result = subscribe => result.map_err(MonitorError::Subscribe)?,
        };
        info!("📡 Subscribed to headers");

        loop {
            let header = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(processed = self.processed, "Header event loop cancelled");
                    return Ok(());
                }
                next = subscription.next() => match next {
                    Some(header) => header,
                    None => {
                        warn!(processed = self.processed, "Header subscription closed");
                        return Err(MonitorError::SubscriptionClosed);
                    }
                },
            };

            let height = header.height().value();
            if let Some(last) = self.last_height {
                if height < last {
                    warn!("Header height went backwards: {} after {}", height, last);
                }
            }
            self.last_height = Some(height);

            let report = self.pipeline.run(&header).await;
            self.processed += 1;
            debug!(
                height,
                failures = report.failures(),
                "Pipeline run finished"
            );

            if let Some(sink) = &self.reports {
                // Receiver gone just means nobody is watching.
                let _ = sink.send(report);
            }
        }
    }
}
