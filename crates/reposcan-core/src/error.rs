// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the reposcan worker service.

use thiserror::Error;

/// The primary error type used across the reposcan crates.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Configuration errors (invalid values, failed extraction).
    #[error("configuration error: {0}")]
    Config(String),

    /// A named secret was not present in the environment.
    #[error("secret not set: {name}")]
    SecretMissing { name: String },

    /// Broker (redis) connection or command failure.
    #[error("broker error: {message}")]
    Broker {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The `queuePayload` field was missing or could not be decoded.
    #[error("malformed queue payload: {0}")]
    PayloadMalformed(String),

    /// Version-control host authentication failure (app or installation).
    #[error("github auth error: {0}")]
    Auth(String),

    /// Version-control host transport or HTTP error.
    #[error("github upstream error{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// Language-model host transport or HTTP error.
    #[error("model error: {message}")]
    Model {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The model reply contained no usable tool call.
    #[error("model did not return tool call")]
    NoToolCall,

    /// The tool-call arguments were not valid JSON for the artifact shape.
    #[error("bad tool args: {0}")]
    BadToolArgs(#[source] serde_json::Error),

    /// The parsed artifact violated the non-empty `repo` invariant.
    #[error("empty payload")]
    EmptyPayload,

    /// Root or per-message cancellation was observed.
    #[error("cancelled")]
    Cancelled,
}

impl ScanError {
    /// Whether this error is worth retrying within a message's retry budget.
    ///
    /// Matches the operational contract: an error is transient iff its
    /// rendered message contains one of the known transient markers.
    pub fn is_transient(&self) -> bool {
        const MARKERS: [&str; 4] = ["rate limit", "timeout", "connection", "temporary"];
        let text = self.to_string();
        MARKERS.iter().any(|m| text.contains(m))
    }
}
