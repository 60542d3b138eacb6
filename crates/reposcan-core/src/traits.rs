// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait seams between the stream layer and the two remote adapters.
//!
//! The stream consumer is written against these traits so the worker pool can
//! be exercised with scripted fakes; the binary wires the real adapters in.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ScanError;
use crate::types::{QueueMessage, StandupPayload, SummarizeJob, SummarizeResult, UsageDetails, Variant};

/// Turns a summarize job into a standup artifact plus a usage receipt.
///
/// Implementations own their own call deadline; `cancel` only gates work that
/// happens before the model call (rate-limiter admission), so a root shutdown
/// stops queued callers without truncating an in-flight completion.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        job: &SummarizeJob,
        variant: Variant,
        cancel: &CancellationToken,
    ) -> Result<(StandupPayload, UsageDetails), ScanError>;
}

/// Executes one queue message end to end, up to (but not including)
/// publication and acknowledgement, which the worker owns.
///
/// `Ok(None)` means the window contained no commits and there is nothing to
/// publish; the message is still acknowledged.
#[async_trait]
pub trait JobProcessor: Send + Sync {
    async fn process(
        &self,
        msg: &QueueMessage,
        cancel: &CancellationToken,
    ) -> Result<Option<SummarizeResult>, ScanError>;
}
