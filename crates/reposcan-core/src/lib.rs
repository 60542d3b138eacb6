// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the reposcan worker service.
//!
//! This crate provides the error type, the queue/results wire schema, and the
//! adapter trait seams used throughout the reposcan workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ScanError;
pub use traits::{JobProcessor, Summarizer};
pub use types::{
    Commit, CommitStats, Contributor, FilesChanged, QueueMessage, StandupPayload, SummarizeJob,
    SummarizeResult, SummaryLevel, TechnicalLevel, UsageDetails, Variant, Window,
};
