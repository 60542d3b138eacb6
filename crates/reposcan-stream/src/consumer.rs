// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The stream consumer: one reader task feeding a bounded channel, and a
//! fixed pool of workers that each own retries, publication, and
//! acknowledgement for one message at a time.
//!
//! Closure order on root cancellation: the reader exits and drops the
//! channel sender; workers finish their in-flight messages, drain whatever
//! the channel still buffers, and exit; the supervisor joins all tasks.
//!
//! Acknowledgement is at-least-once: every message is acked after
//! processing, whether it succeeded, exhausted its retries, or ran out its
//! per-message deadline, so a poison message cannot loop forever. The one
//! exception is root cancellation, where the entry is left pending for
//! redelivery.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use redis::aio::MultiplexedConnection;
use redis::streams::{StreamReadOptions, StreamReadReply};
use redis::AsyncCommands;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use reposcan_config::model::{RedisConfig, WorkerConfig};
use reposcan_core::{JobProcessor, ScanError};

use crate::payload::extract_queue_payload;
use crate::sink::StreamSink;

/// One entry pulled from the jobs stream, as delivered to a worker.
#[derive(Debug, Clone)]
pub struct StreamEntry {
    pub id: String,
    pub fields: HashMap<String, redis::Value>,
}

/// Runs the consumer until the root token is cancelled, then drains the
/// worker pool and returns [`ScanError::Cancelled`].
pub async fn watch_streams(
    cancel: CancellationToken,
    reader_conn: MultiplexedConnection,
    stream: String,
    group: String,
    consumer: String,
    redis_cfg: RedisConfig,
    worker_cfg: WorkerConfig,
    processor: Arc<dyn JobProcessor>,
    sink: Arc<dyn StreamSink>,
) -> Result<(), ScanError> {
    // Capacity 2x the pool: enough to keep workers fed, small enough that a
    // saturated pool backpressures the reader instead of buffering unbounded.
    let (tx, rx) = mpsc::channel::<StreamEntry>(worker_cfg.count * 2);
    let rx = Arc::new(Mutex::new(rx));

    let mut tasks = Vec::with_capacity(worker_cfg.count + 1);

    tasks.push(tokio::spawn(run_reader(
        cancel.clone(),
        reader_conn,
        stream,
        group,
        consumer,
        redis_cfg,
        worker_cfg.clone(),
        tx,
    )));

    for index in 0..worker_cfg.count {
        tasks.push(tokio::spawn(run_worker(
            index,
            cancel.clone(),
            rx.clone(),
            processor.clone(),
            sink.clone(),
            worker_cfg.clone(),
        )));
    }

    info!(workers = worker_cfg.count, "stream consumer started");

    for task in tasks {
        if let Err(e) = task.await {
            error!(error = %e, "consumer task panicked");
        }
    }

    info!("stream consumer drained");
    Err(ScanError::Cancelled)
}

/// Doubles the reader backoff up to its ceiling.
pub(crate) fn next_backoff(current: Duration, max: Duration) -> Duration {
    (current * 2).min(max)
}

#[allow(clippy::too_many_arguments)]
async fn run_reader(
    cancel: CancellationToken,
    mut conn: MultiplexedConnection,
    stream: String,
    group: String,
    consumer: String,
    redis_cfg: RedisConfig,
    worker_cfg: WorkerConfig,
    tx: mpsc::Sender<StreamEntry>,
) {
    let mut backoff = worker_cfg.backoff_min();

    loop {
        if cancel.is_cancelled() {
            break;
        }

        let options = StreamReadOptions::default()
            .group(&group, &consumer)
            .count(redis_cfg.batch_size)
            .block(redis_cfg.block_timeout_ms as usize);

        let stream_keys = [stream.as_str()];
        let stream_ids = [">"];
        let read = tokio::select! {
            read = conn.xread_options::<_, _, Option<StreamReadReply>>(
                &stream_keys,
                &stream_ids,
                &options,
            ) => read,
            _ = cancel.cancelled() => break,
        };

        match read {
            // A nil reply is an idle stream, not an error: retry immediately.
            Ok(None) => {
                backoff = worker_cfg.backoff_min();
            }
            Ok(Some(reply)) => {
                backoff = worker_cfg.backoff_min();
                for key in reply.keys {
                    for entry in key.ids {
                        let entry = StreamEntry {
                            id: entry.id,
                            fields: entry.map,
                        };
                        // A full channel is the intended backpressure when
                        // all workers are busy.
                        tokio::select! {
                            sent = tx.send(entry) => {
                                if sent.is_err() {
                                    return;
                                }
                            }
                            _ = cancel.cancelled() => return,
                        }
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "error reading from stream");
                tokio::select! {
                    _ = tokio::time::sleep(backoff) => {}
                    _ = cancel.cancelled() => break,
                }
                backoff = next_backoff(backoff, worker_cfg.backoff_max());
            }
        }
    }
    // Dropping the sender closes the channel; workers drain and exit.
    debug!("reader exiting");
}

async fn run_worker(
    index: usize,
    cancel: CancellationToken,
    rx: Arc<Mutex<mpsc::Receiver<StreamEntry>>>,
    processor: Arc<dyn JobProcessor>,
    sink: Arc<dyn StreamSink>,
    worker_cfg: WorkerConfig,
) {
    loop {
        let entry = {
            let mut rx = rx.lock().await;
            rx.recv().await
        };
        let Some(entry) = entry else {
            break;
        };
        process_entry(&entry, processor.as_ref(), sink.as_ref(), &worker_cfg, &cancel).await;
    }
    debug!(worker = index, "worker exiting");
}

/// Processes one entry end to end: decode, retry loop under the message
/// deadline, publish on success, then acknowledge.
///
/// The message deadline is delivered as cancellation of a child token, not
/// as an abort of the processing future: expiry stops retries and fails the
/// message at its next cancellable suspension point (rate-limiter waits,
/// retry sleeps), but never truncates an in-flight call. The summarize step
/// in particular runs to completion under its own fresh deadline.
///
/// Public so the worker discipline can be exercised directly in tests
/// without a broker.
pub async fn process_entry(
    entry: &StreamEntry,
    processor: &dyn JobProcessor,
    sink: &dyn StreamSink,
    worker_cfg: &WorkerConfig,
    cancel: &CancellationToken,
) {
    debug!(id = entry.id.as_str(), "processing message");

    let message_cancel = cancel.child_token();
    let deadline = {
        let token = message_cancel.clone();
        let timeout = worker_cfg.message_timeout();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            token.cancel();
        })
    };

    let outcome = handle_message(entry, processor, sink, worker_cfg, &message_cancel).await;
    deadline.abort();

    match outcome {
        Ok(()) => {}
        Err(ScanError::Cancelled) if cancel.is_cancelled() => {
            // Root shutdown: leave the entry pending, the broker redelivers
            // it after the visibility window, preserving at-least-once.
            warn!(id = entry.id.as_str(), "processing cancelled, not acknowledging");
            return;
        }
        Err(ScanError::Cancelled) => {
            error!(
                id = entry.id.as_str(),
                timeout = ?worker_cfg.message_timeout(),
                "message deadline exceeded"
            );
        }
        Err(e) => {
            error!(id = entry.id.as_str(), error = %e, "message failed");
        }
    }

    if let Err(e) = sink.ack(&entry.id).await {
        error!(id = entry.id.as_str(), error = %e, "error acknowledging message");
    }
}

async fn handle_message(
    entry: &StreamEntry,
    processor: &dyn JobProcessor,
    sink: &dyn StreamSink,
    worker_cfg: &WorkerConfig,
    cancel: &CancellationToken,
) -> Result<(), ScanError> {
    let msg = extract_queue_payload(&entry.fields)?;

    let result = attempt_with_retries(&msg, processor, worker_cfg, cancel).await?;

    match result {
        Some(result) => {
            // A failed publication after a successful summarization is
            // terminal for this message lifetime; no re-publish.
            let published = sink.publish(&result, &msg).await?;
            info!(
                id = entry.id.as_str(),
                published = published.as_str(),
                repo = result.payload.repo.as_str(),
                "published summary"
            );
        }
        None => {
            debug!(id = entry.id.as_str(), "empty window, nothing to publish");
        }
    }
    Ok(())
}

async fn attempt_with_retries(
    msg: &reposcan_core::QueueMessage,
    processor: &dyn JobProcessor,
    worker_cfg: &WorkerConfig,
    cancel: &CancellationToken,
) -> Result<Option<reposcan_core::SummarizeResult>, ScanError> {
    let mut attempt: u32 = 1;
    loop {
        match processor.process(msg, cancel).await {
            Ok(result) => return Ok(result),
            Err(ScanError::Cancelled) => return Err(ScanError::Cancelled),
            Err(e) if e.is_transient() && attempt < worker_cfg.max_retries => {
                warn!(attempt, error = %e, "transient error, retrying");
                let pause = Duration::from_secs(u64::from(attempt));
                tokio::select! {
                    _ = tokio::time::sleep(pause) => {}
                    _ = cancel.cancelled() => return Err(ScanError::Cancelled),
                }
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_to_the_ceiling() {
        let min = Duration::from_millis(100);
        let max = Duration::from_secs(3);

        // After k consecutive errors the k-th sleep is min * 2^(k-1), capped.
        let mut backoff = min;
        let mut sleeps = Vec::new();
        for _ in 0..7 {
            sleeps.push(backoff);
            backoff = next_backoff(backoff, max);
        }

        assert_eq!(
            sleeps,
            [
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(400),
                Duration::from_millis(800),
                Duration::from_millis(1600),
                Duration::from_millis(3000),
                Duration::from_millis(3000),
            ]
        );
    }
}
