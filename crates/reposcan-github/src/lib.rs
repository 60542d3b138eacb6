// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Version-control adapter for the reposcan worker.
//!
//! Authenticates as an installed GitHub App, lists commits in a time window,
//! fetches per-commit file statistics under the shared rate limiter and
//! stats cache, and delegates the assembled job to the summarizer.

pub mod auth;
pub mod client;
pub mod types;

pub use auth::{AppTokenSource, InstallationTokenSource};
pub use client::GithubClient;
