// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Summarizer adapter for the reposcan worker.
//!
//! Sends the normalized commit list to a tool-constrained chat-completions
//! endpoint, validates the structured reply, prunes variant-irrelevant
//! fields, and computes a usage/cost receipt.

pub mod pricing;
pub mod prompt;
pub mod schema;
pub mod summarizer;
pub mod types;

pub use summarizer::{prune_payload, OpenAiSummarizer};
