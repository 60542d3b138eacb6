// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock summarizer with scripted outcomes for deterministic testing.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use reposcan_core::{
    ScanError, StandupPayload, SummarizeJob, Summarizer, UsageDetails, Variant,
};

type SummarizeOutcome = Result<(StandupPayload, UsageDetails), ScanError>;

/// A summarizer that pops pre-configured outcomes from a FIFO queue.
///
/// When the queue is empty, it echoes a minimal artifact for the job's repo.
/// Every observed `(job, variant)` pair is recorded.
pub struct MockSummarizer {
    outcomes: Mutex<VecDeque<SummarizeOutcome>>,
    calls: Mutex<Vec<(SummarizeJob, Variant)>>,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Pre-loads the given outcomes, served in order.
    pub fn with_outcomes(outcomes: Vec<SummarizeOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::from(outcomes)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Appends an outcome to the script.
    pub async fn push_outcome(&self, outcome: SummarizeOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// The `(job, variant)` pairs seen so far.
    pub async fn calls(&self) -> Vec<(SummarizeJob, Variant)> {
        self.calls.lock().await.clone()
    }
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(
        &self,
        job: &SummarizeJob,
        variant: Variant,
        _cancel: &CancellationToken,
    ) -> Result<(StandupPayload, UsageDetails), ScanError> {
        self.calls.lock().await.push((job.clone(), variant));
        match self.outcomes.lock().await.pop_front() {
            Some(outcome) => outcome,
            None => Ok((
                StandupPayload {
                    repo: job.repo.clone(),
                    title: "mock standup".into(),
                    ..Default::default()
                },
                UsageDetails::default(),
            )),
        }
    }
}
