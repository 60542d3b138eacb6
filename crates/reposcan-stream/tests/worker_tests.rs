// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Worker-discipline tests: retry pacing, acknowledgement policy, and
//! cancellation behavior, exercised against scripted mocks under paused time.

use std::collections::HashMap;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use reposcan_config::model::WorkerConfig;
use reposcan_core::{ScanError, StandupPayload, SummarizeResult, UsageDetails};
use reposcan_stream::{process_entry, StreamEntry};
use reposcan_test_utils::{MockProcessor, RecordingSink};

const PAYLOAD_JSON: &str = r#"{
    "owner": "acme",
    "repo": "api",
    "branch": "main",
    "from": "2024-01-01T00:00:00Z",
    "to": "2024-01-02T00:00:00Z",
    "installation_id": 1,
    "format": "technical",
    "isTestStandup": false
}"#;

fn entry(id: &str) -> StreamEntry {
    StreamEntry {
        id: id.to_string(),
        fields: HashMap::from([(
            "queuePayload".to_string(),
            redis::Value::BulkString(PAYLOAD_JSON.as_bytes().to_vec()),
        )]),
    }
}

fn worker_cfg() -> WorkerConfig {
    WorkerConfig {
        count: 1,
        message_timeout_secs: 300,
        max_retries: 3,
        backoff_min_ms: 100,
        backoff_max_ms: 3000,
    }
}

fn canned_result() -> SummarizeResult {
    SummarizeResult {
        payload: StandupPayload {
            repo: "acme/api".into(),
            title: "Daily Standup".into(),
            ..Default::default()
        },
        details: UsageDetails::default(),
    }
}

fn transient_error() -> ScanError {
    ScanError::Model {
        message: "connection reset by peer".into(),
        source: None,
    }
}

fn non_transient_error() -> ScanError {
    ScanError::BadToolArgs(serde_json::from_str::<serde_json::Value>("{").unwrap_err())
}

#[tokio::test]
async fn success_publishes_once_and_acks_once() {
    let processor = MockProcessor::with_outcomes(vec![Ok(Some(canned_result()))]);
    let sink = RecordingSink::new();
    let cancel = CancellationToken::new();

    process_entry(&entry("1-0"), &processor, &sink, &worker_cfg(), &cancel).await;

    assert_eq!(processor.call_count().await, 1);
    let published = sink.published().await;
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].result.payload.repo, "acme/api");
    assert_eq!(published[0].msg.format, "technical");
    assert_eq!(sink.acked().await, ["1-0"]);
}

#[tokio::test]
async fn empty_window_acks_without_publishing() {
    let processor = MockProcessor::with_outcomes(vec![Ok(None)]);
    let sink = RecordingSink::new();
    let cancel = CancellationToken::new();

    process_entry(&entry("1-0"), &processor, &sink, &worker_cfg(), &cancel).await;

    assert!(sink.published().await.is_empty());
    assert_eq!(sink.acked().await, ["1-0"]);
}

#[tokio::test(start_paused = true)]
async fn transient_failures_retry_with_linear_sleeps() {
    let processor = MockProcessor::with_outcomes(vec![
        Err(transient_error()),
        Err(transient_error()),
        Ok(Some(canned_result())),
    ]);
    let sink = RecordingSink::new();
    let cancel = CancellationToken::new();

    process_entry(&entry("1-0"), &processor, &sink, &worker_cfg(), &cancel).await;

    let instants = processor.call_instants().await;
    assert_eq!(instants.len(), 3);
    // Sleeps are attempt * 1s: >=1s before the 2nd call, >=2s before the 3rd.
    assert!(instants[1] - instants[0] >= Duration::from_secs(1));
    assert!(instants[2] - instants[1] >= Duration::from_secs(2));

    assert_eq!(sink.published().await.len(), 1);
    assert_eq!(sink.acked().await, ["1-0"]);
}

#[tokio::test]
async fn non_transient_failure_is_not_retried_but_acked() {
    let processor = MockProcessor::with_outcomes(vec![Err(non_transient_error())]);
    let sink = RecordingSink::new();
    let cancel = CancellationToken::new();

    process_entry(&entry("1-0"), &processor, &sink, &worker_cfg(), &cancel).await;

    assert_eq!(processor.call_count().await, 1, "bad tool args must not retry");
    assert!(sink.published().await.is_empty());
    assert_eq!(sink.acked().await, ["1-0"]);
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_still_ack_exactly_once() {
    let processor = MockProcessor::with_outcomes(vec![
        Err(transient_error()),
        Err(transient_error()),
        Err(transient_error()),
    ]);
    let sink = RecordingSink::new();
    let cancel = CancellationToken::new();

    process_entry(&entry("1-0"), &processor, &sink, &worker_cfg(), &cancel).await;

    assert_eq!(processor.call_count().await, 3);
    assert!(sink.published().await.is_empty());
    assert_eq!(sink.acked().await, ["1-0"]);
}

#[tokio::test(start_paused = true)]
async fn cancellation_mid_flight_does_not_publish_or_ack() {
    let processor = MockProcessor::blocking_until_cancelled();
    let sink = RecordingSink::new();
    let cancel = CancellationToken::new();

    let handle = {
        let cancel = cancel.clone();
        let cfg = worker_cfg();
        tokio::spawn(async move {
            let processor = processor;
            let sink = sink;
            process_entry(&entry("1-0"), &processor, &sink, &cfg, &cancel).await;
            (sink.published().await.len(), sink.acked().await.len())
        })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    let (published, acked) = handle.await.unwrap();
    assert_eq!(published, 0, "cancelled work must not publish");
    assert_eq!(acked, 0, "cancelled work is left pending for redelivery");
}

#[tokio::test]
async fn malformed_payload_is_acked_without_processing() {
    let processor = MockProcessor::new();
    let sink = RecordingSink::new();
    let cancel = CancellationToken::new();

    let bad = StreamEntry {
        id: "1-0".into(),
        fields: HashMap::new(),
    };
    process_entry(&bad, &processor, &sink, &worker_cfg(), &cancel).await;

    assert_eq!(processor.call_count().await, 0);
    assert!(sink.published().await.is_empty());
    assert_eq!(sink.acked().await, ["1-0"], "poison entries must not loop");
}

#[tokio::test]
async fn failed_publication_is_terminal_and_acked() {
    let processor = MockProcessor::with_outcomes(vec![Ok(Some(canned_result()))]);
    let sink = RecordingSink::new();
    sink.fail_publishes().await;
    let cancel = CancellationToken::new();

    process_entry(&entry("1-0"), &processor, &sink, &worker_cfg(), &cancel).await;

    assert_eq!(processor.call_count().await, 1, "no re-summarize after publish failure");
    assert!(sink.published().await.is_empty());
    assert_eq!(sink.acked().await, ["1-0"]);
}

#[tokio::test(start_paused = true)]
async fn message_deadline_stops_work_and_acks() {
    let processor = MockProcessor::blocking_until_cancelled();
    let sink = RecordingSink::new();
    let cancel = CancellationToken::new();

    let cfg = WorkerConfig {
        message_timeout_secs: 1,
        ..worker_cfg()
    };
    process_entry(&entry("1-0"), &processor, &sink, &cfg, &cancel).await;

    // The deadline cancels in-flight work at its next suspension point; the
    // call observes the cancellation and returns, it is not dropped mid-air.
    assert_eq!(processor.completed_count().await, 1);
    assert!(sink.published().await.is_empty());
    assert_eq!(sink.acked().await, ["1-0"], "deadline expiry acks anyway");
}

#[tokio::test]
async fn same_message_twice_yields_two_identical_publications() {
    let processor = MockProcessor::with_outcomes(vec![
        Ok(Some(canned_result())),
        Ok(Some(canned_result())),
    ]);
    let sink = RecordingSink::new();
    let cancel = CancellationToken::new();

    process_entry(&entry("1-0"), &processor, &sink, &worker_cfg(), &cancel).await;
    process_entry(&entry("1-1"), &processor, &sink, &worker_cfg(), &cancel).await;

    let published = sink.published().await;
    assert_eq!(published.len(), 2);
    let first = serde_json::to_string(&published[0].result.payload).unwrap();
    let second = serde_json::to_string(&published[1].result.payload).unwrap();
    assert_eq!(first, second, "duplicate delivery is idempotent in content");
    assert_eq!(sink.acked().await, ["1-0", "1-1"]);
}
