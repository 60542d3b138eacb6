// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock job processor with scripted outcomes and call-time recording.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use reposcan_core::{JobProcessor, QueueMessage, ScanError, SummarizeResult};

type ProcessOutcome = Result<Option<SummarizeResult>, ScanError>;

/// A processor that pops pre-configured outcomes from a FIFO queue and
/// records the instant of each invocation, so retry pacing can be asserted.
///
/// When the queue is empty it reports an empty window (`Ok(None)`).
pub struct MockProcessor {
    outcomes: Mutex<VecDeque<ProcessOutcome>>,
    calls: Mutex<Vec<Instant>>,
    completions: Mutex<usize>,
    /// When true, every call blocks on the caller's token and fails Cancelled.
    block_until_cancelled: bool,
}

impl MockProcessor {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            completions: Mutex::new(0),
            block_until_cancelled: false,
        }
    }

    /// Pre-loads the given outcomes, served in order.
    pub fn with_outcomes(outcomes: Vec<ProcessOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::from(outcomes)),
            calls: Mutex::new(Vec::new()),
            completions: Mutex::new(0),
            block_until_cancelled: false,
        }
    }

    /// A processor that simulates a worker parked on a rate-limiter token:
    /// every call blocks until cancellation, then fails with `Cancelled`.
    pub fn blocking_until_cancelled() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            completions: Mutex::new(0),
            block_until_cancelled: true,
        }
    }

    /// Instants at which `process` was invoked.
    pub async fn call_instants(&self) -> Vec<Instant> {
        self.calls.lock().await.clone()
    }

    /// Number of `process` invocations so far.
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Number of `process` calls that ran to completion. Stays behind
    /// `call_count` when a caller drops the future mid-flight.
    pub async fn completed_count(&self) -> usize {
        *self.completions.lock().await
    }
}

impl Default for MockProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobProcessor for MockProcessor {
    async fn process(
        &self,
        _msg: &QueueMessage,
        cancel: &CancellationToken,
    ) -> Result<Option<SummarizeResult>, ScanError> {
        self.calls.lock().await.push(Instant::now());

        if self.block_until_cancelled {
            cancel.cancelled().await;
            *self.completions.lock().await += 1;
            return Err(ScanError::Cancelled);
        }

        let outcome = match self.outcomes.lock().await.pop_front() {
            Some(outcome) => outcome,
            None => Ok(None),
        };
        *self.completions.lock().await += 1;
        outcome
    }
}
