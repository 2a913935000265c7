//! End-to-end monitor scenarios against the scripted node.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Semaphore};
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;

use da_monitor::ports::{mock_header, MOCK_FIRST_SUBMIT_HEIGHT};
use da_monitor::{
    ActionPipeline, BlobSubmitter, BootstrapSubmission, GreetingBlobProducer, HeaderEventLoop,
    MockBehavior, MockDaNode, Monitor, MonitorConfig, MonitorError, NodeCall, PipelineReport,
    StepOutcome,
};
use da_types::{blob_namespace, commitment_hex, Commitment, GasPrice, Namespace, APP_VERSION};

fn namespace() -> Namespace {
    blob_namespace(&[0xC0, 0xDE]).unwrap()
}

fn submitter(node: &Arc<MockDaNode>) -> BlobSubmitter<MockDaNode> {
    BlobSubmitter::new(
        Arc::clone(node),
        namespace(),
        Arc::new(GreetingBlobProducer::new(0)),
        GasPrice::NODE_DEFAULT,
    )
}

fn submitting_loop(node: &Arc<MockDaNode>) -> HeaderEventLoop<MockDaNode> {
    let pipeline =
        ActionPipeline::new(Arc::clone(node), namespace()).with_submitter(submitter(node));
    HeaderEventLoop::new(Arc::clone(node), pipeline)
}

async fn drain(mut rx: mpsc::UnboundedReceiver<PipelineReport>) -> Vec<PipelineReport> {
    let mut reports = Vec::new();
    while let Some(report) = rx.recv().await {
        reports.push(report);
    }
    reports
}

#[tokio::test]
async fn three_headers_produce_three_ordered_runs() {
    let node = Arc::new(MockDaNode::with_headers(
        MockBehavior::default(),
        &[100, 101, 102],
    ));
    let (tx, rx) = mpsc::unbounded_channel();
    let mut event_loop = submitting_loop(&node).with_report_sink(tx);

    let result = event_loop.run(CancellationToken::new()).await;
    assert!(matches!(result, Err(MonitorError::SubscriptionClosed)));
    drop(event_loop);

    let reports = drain(rx).await;
    let heights: Vec<u64> = reports.iter().map(|r| r.height).collect();
    assert_eq!(heights, vec![100, 101, 102]);

    for report in &reports {
        assert_eq!(report.attempted(), 3);
        assert_eq!(report.failures(), 0);
    }
    for height in [100, 101, 102] {
        assert_eq!(
            node.calls_at(height),
            vec![
                NodeCall::GetAllBlobs { height },
                NodeCall::GetHeader { height },
                NodeCall::GetEds { height },
            ]
        );
    }
    assert_eq!(node.submission_count(), 3);
}

#[tokio::test]
async fn blob_fetch_failure_does_not_block_other_steps() {
    let node = Arc::new(MockDaNode::with_headers(
        MockBehavior {
            fail_blob_fetch_at: vec![100],
            ..Default::default()
        },
        &[100],
    ));
    let (tx, rx) = mpsc::unbounded_channel();
    let mut event_loop = submitting_loop(&node).with_report_sink(tx);
    let _ = event_loop.run(CancellationToken::new()).await;
    drop(event_loop);

    let reports = drain(rx).await;
    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert!(report.blobs.is_failure());
    assert!(report.eds.is_success());
    assert!(report.submission.is_success());
    assert_eq!(report.failures(), 1);
}

#[tokio::test]
async fn failing_submissions_keep_the_loop_running() {
    let node = Arc::new(MockDaNode::with_headers(
        MockBehavior {
            fail_submit: true,
            ..Default::default()
        },
        &[1, 2],
    ));
    let (tx, rx) = mpsc::unbounded_channel();
    let mut event_loop = submitting_loop(&node).with_report_sink(tx);
    let _ = event_loop.run(CancellationToken::new()).await;
    assert_eq!(event_loop.processed(), 2);
    drop(event_loop);

    let reports = drain(rx).await;
    assert!(reports.iter().all(|r| r.submission.is_failure()));
    assert!(reports.iter().all(|r| r.blobs.is_success()));
}

#[tokio::test]
async fn read_only_pipeline_skips_submission() {
    let node = Arc::new(MockDaNode::with_headers(MockBehavior::default(), &[7]));
    let (tx, rx) = mpsc::unbounded_channel();
    let mut event_loop = HeaderEventLoop::new(
        Arc::clone(&node),
        ActionPipeline::new(Arc::clone(&node), namespace()),
    )
    .with_report_sink(tx);
    let _ = event_loop.run(CancellationToken::new()).await;
    drop(event_loop);

    let reports = drain(rx).await;
    assert_eq!(reports[0].submission, StepOutcome::Skipped);
    assert_eq!(node.submission_count(), 0);
}

#[tokio::test]
async fn submitted_blob_round_trips() {
    let (node, _headers) = MockDaNode::new(MockBehavior::default(), 1);
    let node = Arc::new(node);

    let receipt = assert_ok!(submitter(&node).submit_and_verify().await);
    assert_eq!(receipt.height, MOCK_FIRST_SUBMIT_HEIGHT);

    let stored = node.submitted_at(receipt.height);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].commitment, receipt.commitment);
    assert_ok!(stored[0].validate(APP_VERSION));
}

#[tokio::test]
async fn bootstrap_commitment_mismatch_is_fatal() {
    let bogus = Commitment::new([0xEE; 32]);
    let (node, _headers) = MockDaNode::new(
        MockBehavior {
            corrupt_commitment: Some(bogus),
            ..Default::default()
        },
        4,
    );
    let node = Arc::new(node);

    let err = assert_err!(BootstrapSubmission::new(submitter(&node)).run().await);
    match &err {
        MonitorError::CommitmentMismatch {
            height, retrieved, ..
        } => {
            assert_eq!(*height, MOCK_FIRST_SUBMIT_HEIGHT);
            assert_eq!(*retrieved, commitment_hex(&bogus));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("mismatch"));

    let monitor = Monitor::new(Arc::clone(&node), MonitorConfig::for_testing());
    let result = tokio::time::timeout(Duration::from_secs(1), monitor.run(CancellationToken::new()))
        .await
        .expect("monitor kept running after a failed bootstrap");
    assert!(matches!(result, Err(MonitorError::CommitmentMismatch { .. })));
}

#[tokio::test]
async fn full_queue_holds_the_producer_until_the_loop_takes_a_header() {
    let gate = Arc::new(Semaphore::new(0));
    let (node, headers) = MockDaNode::new(
        MockBehavior {
            blob_fetch_gate: Some(Arc::clone(&gate)),
            ..Default::default()
        },
        1,
    );
    let node = Arc::new(node);
    let (tx, mut reports) = mpsc::unbounded_channel();
    let mut event_loop = HeaderEventLoop::new(
        Arc::clone(&node),
        ActionPipeline::new(Arc::clone(&node), namespace()),
    )
    .with_report_sink(tx);
    let cancel = CancellationToken::new();
    let task = tokio::spawn({
        let cancel = cancel.clone();
        async move { event_loop.run(cancel).await }
    });

    assert_ok!(headers.send(mock_header(1)).await);
    tokio::time::timeout(Duration::from_secs(1), async {
        while node.calls_at(1).is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("pipeline never started on header 1");

    // Header 1 is in the pipeline, header 2 takes the only slot.
    assert_ok!(headers.send(mock_header(2)).await);
    let third = mock_header(3);
    assert_err!(tokio::time::timeout(Duration::from_millis(50), headers.send(third.clone())).await);
    assert!(node.calls_at(2).is_empty());

    gate.add_permits(3);
    assert_ok!(headers.send(third).await);
    for expected in [1, 2, 3] {
        assert_eq!(reports.recv().await.map(|r| r.height), Some(expected));
    }

    cancel.cancel();
    assert_ok!(assert_ok!(task.await));
}

#[tokio::test]
async fn cancellation_while_waiting_stops_promptly() {
    let (node, headers) = MockDaNode::new(MockBehavior::default(), 4);
    let node = Arc::new(node);
    let (tx, mut reports) = mpsc::unbounded_channel();
    let mut event_loop = submitting_loop(&node).with_report_sink(tx);
    let cancel = CancellationToken::new();

    let task = tokio::spawn({
        let cancel = cancel.clone();
        async move { event_loop.run(cancel).await }
    });

    headers.send(mock_header(1)).await.unwrap();
    assert_eq!(reports.recv().await.map(|r| r.height), Some(1));

    cancel.cancel();
    let result = tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("loop ignored cancellation")
        .unwrap();
    assert_ok!(result);

    // Headers after cancellation are never processed.
    let _ = headers.send(mock_header(2)).await;
    assert!(reports.recv().await.is_none());
    assert!(node.calls_at(2).is_empty());
}

#[tokio::test]
async fn subscription_failure_is_fatal_to_the_monitor() {
    let node = Arc::new(MockDaNode::with_headers(
        MockBehavior {
            fail_subscribe: true,
            ..Default::default()
        },
        &[],
    ));
    let config = MonitorConfig {
        bootstrap: false,
        ..MonitorConfig::for_testing()
    };
    let result = Monitor::new(node, config).run(CancellationToken::new()).await;
    assert!(matches!(result, Err(MonitorError::Subscribe(_))));
}
