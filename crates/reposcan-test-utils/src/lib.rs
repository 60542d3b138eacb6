// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the reposcan workspace: scripted mock adapters and a
//! recording sink, enabling fast, CI-runnable tests without a broker or
//! either remote API.

pub mod mock_processor;
pub mod mock_summarizer;
pub mod recording_sink;

pub use mock_processor::MockProcessor;
pub use mock_summarizer::MockSummarizer;
pub use recording_sink::{PublishedEntry, RecordingSink};
