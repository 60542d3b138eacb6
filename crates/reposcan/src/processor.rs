// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The production job processor: wires the version-control adapter and the
//! summarizer together for one message at a time.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use reposcan_cache::TtlCache;
use reposcan_config::AppConfig;
use reposcan_core::{
    CommitStats, JobProcessor, QueueMessage, ScanError, SummarizeResult, Summarizer,
};
use reposcan_github::GithubClient;
use reposcan_ratelimit::RemoteLimiter;

/// Builds a [`GithubClient`] per message (the installation differs per
/// message) around the process-wide limiter and cache, and delegates to the
/// summarizer.
pub struct ScanProcessor {
    config: AppConfig,
    limiter: Arc<RemoteLimiter>,
    cache: Arc<TtlCache<CommitStats>>,
    github_private_key: String,
    github_client_id: String,
    summarizer: Arc<dyn Summarizer>,
}

impl ScanProcessor {
    pub fn new(
        config: AppConfig,
        limiter: Arc<RemoteLimiter>,
        cache: Arc<TtlCache<CommitStats>>,
        github_private_key: String,
        github_client_id: String,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            config,
            limiter,
            cache,
            github_private_key,
            github_client_id,
            summarizer,
        }
    }
}

#[async_trait]
impl JobProcessor for ScanProcessor {
    async fn process(
        &self,
        msg: &QueueMessage,
        cancel: &CancellationToken,
    ) -> Result<Option<SummarizeResult>, ScanError> {
        let client = GithubClient::new(
            &self.config,
            self.limiter.clone(),
            self.cache.clone(),
            &self.github_private_key,
            self.github_client_id.clone(),
            msg.installation_id,
        )?;
        client.scan(msg, self.summarizer.as_ref(), cancel).await
    }
}
