// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Version-control adapter: lists commits in a window, fans out per-commit
//! stat fetches under bounded concurrency, and hands the normalized job to
//! the summarizer.
//!
//! One client is constructed per queue message (the installation differs per
//! message); the rate limiter and stats cache are process-wide and shared in.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use reposcan_cache::TtlCache;
use reposcan_config::AppConfig;
use reposcan_core::{
    Commit, CommitStats, QueueMessage, ScanError, SummarizeJob, SummarizeResult, Summarizer,
    Variant,
};
use reposcan_ratelimit::RemoteLimiter;

use crate::auth::{AppTokenSource, InstallationTokenSource};
use crate::types::{CommitWithFiles, RepoCommit};

/// Cached commit stats live for an hour; a SHA's stats never change, the TTL
/// only bounds staleness against force-pushed history rewrites.
const STATS_TTL: Duration = Duration::from_secs(3600);

/// Adapter over the version-control host for one installation.
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    tokens: InstallationTokenSource,
    limiter: Arc<RemoteLimiter>,
    cache: Arc<TtlCache<CommitStats>>,
    concurrency: usize,
}

impl GithubClient {
    /// Creates a client authenticated as the given installation.
    pub fn new(
        config: &AppConfig,
        limiter: Arc<RemoteLimiter>,
        cache: Arc<TtlCache<CommitStats>>,
        private_key: &str,
        client_id: String,
        installation_id: i64,
    ) -> Result<Self, ScanError> {
        let http = reqwest::Client::builder()
            .timeout(config.http.client_timeout())
            .user_agent("reposcan")
            .build()
            .map_err(|e| ScanError::Upstream {
                status: None,
                message: format!("building http client: {e}"),
            })?;

        let app = AppTokenSource::new(private_key, client_id)?;
        let tokens = InstallationTokenSource::new(
            app,
            installation_id,
            http.clone(),
            config.github.api_base.clone(),
        );

        Ok(Self {
            http,
            api_base: config.github.api_base.clone(),
            tokens,
            limiter,
            cache,
            concurrency: config.github.concurrency,
        })
    }

    /// Test constructor: points at a mock server and skips the signing path.
    #[cfg(test)]
    fn for_tests(
        api_base: String,
        limiter: Arc<RemoteLimiter>,
        cache: Arc<TtlCache<CommitStats>>,
        concurrency: usize,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base,
            tokens: InstallationTokenSource::with_static_token("ghs_test"),
            limiter,
            cache,
            concurrency,
        }
    }

    /// Runs one queue message through list → normalize → summarize.
    ///
    /// Returns `Ok(None)` when the window holds no commits (nothing to
    /// summarize or publish). Errors from the initial list call and from the
    /// summarizer are fatal to the job; per-commit stat failures only drop
    /// that commit.
    pub async fn scan(
        &self,
        msg: &QueueMessage,
        summarizer: &dyn Summarizer,
        cancel: &CancellationToken,
    ) -> Result<Option<SummarizeResult>, ScanError> {
        info!(
            owner = msg.owner.as_str(),
            repo = msg.repo.as_str(),
            branch = msg.branch.as_str(),
            "fetching commits"
        );

        let listed = self
            .list_commits(&msg.owner, &msg.repo, &msg.branch, msg.from, msg.to)
            .await?;

        if listed.is_empty() {
            info!(
                owner = msg.owner.as_str(),
                repo = msg.repo.as_str(),
                "no commits found in window"
            );
            return Ok(None);
        }

        let commits = self
            .collect_commits(&msg.owner, &msg.repo, listed, cancel)
            .await?;

        let variant = Variant::from_format(&msg.format);
        let job = SummarizeJob {
            repo: format!("{}/{}", msg.owner, msg.repo),
            project_name: msg.repo.clone(),
            handle: msg.owner.clone(),
            since: msg.from,
            until: msg.to,
            commits,
        };

        let (payload, details) = summarizer.summarize(&job, variant, cancel).await?;
        Ok(Some(SummarizeResult { payload, details }))
    }

    /// Calls the "list commits" endpoint for the window.
    ///
    /// No limiter wait here: one call per job is negligible next to the
    /// per-commit fan-out it feeds.
    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<RepoCommit>, ScanError> {
        let token = self.tokens.bearer().await?;
        let url = format!("{}/repos/{owner}/{repo}/commits", self.api_base);

        let mut query = vec![
            ("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("until", until.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("per_page", "100".to_string()),
        ];
        if !branch.is_empty() {
            query.push(("sha", branch.to_string()));
        }

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header("accept", "application/vnd.github+json")
            .query(&query)
            .send()
            .await
            .map_err(|e| ScanError::Upstream {
                status: None,
                message: format!("fetching commits: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScanError::Upstream {
                status: Some(status.as_u16()),
                message: format!("list commits for {owner}/{repo}: {body}"),
            });
        }

        response.json().await.map_err(|e| ScanError::Upstream {
            status: None,
            message: format!("decoding commit list: {e}"),
        })
    }

    /// Fans out per-commit stat fetches under the configured concurrency
    /// bound, preserving input order. Commits whose stat call failed are
    /// skipped with a warning; cancellation aborts the whole fan-out.
    async fn collect_commits(
        &self,
        owner: &str,
        repo: &str,
        listed: Vec<RepoCommit>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Commit>, ScanError> {
        let normalized: Vec<Result<Option<Commit>, ScanError>> = futures::stream::iter(
            listed
                .into_iter()
                .map(|entry| self.normalize_commit(owner, repo, entry, cancel)),
        )
        .buffered(self.concurrency)
        .collect()
        .await;

        let mut commits = Vec::with_capacity(normalized.len());
        for item in normalized {
            if let Some(commit) = item? {
                commits.push(commit);
            }
        }
        Ok(commits)
    }

    async fn normalize_commit(
        &self,
        owner: &str,
        repo: &str,
        entry: RepoCommit,
        cancel: &CancellationToken,
    ) -> Result<Option<Commit>, ScanError> {
        let author = entry.commit.author.unwrap_or_default();
        let committer = entry.commit.committer.unwrap_or_default();
        // A missing author identity falls back to the committer, per field.
        let author_name = if author.name.is_empty() {
            committer.name
        } else {
            author.name
        };
        let author_email = if author.email.is_empty() {
            committer.email
        } else {
            author.email
        };

        match self.commit_stats(owner, repo, &entry.sha, cancel).await {
            Ok(stats) => Ok(Some(Commit {
                sha: entry.sha,
                author_name,
                author_email,
                message: entry.commit.message,
                files: stats.files,
                additions: stats.additions,
                deletions: stats.deletions,
            })),
            Err(ScanError::Cancelled) => Err(ScanError::Cancelled),
            Err(e) => {
                warn!(sha = entry.sha.as_str(), error = %e, "commit stats error, skipping commit");
                Ok(None)
            }
        }
    }

    /// Fetches aggregated file stats for one commit, through the cache and
    /// the host's token bucket.
    ///
    /// The cache key deliberately omits the branch: two branches containing
    /// the same SHA share stats.
    pub async fn commit_stats(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        cancel: &CancellationToken,
    ) -> Result<CommitStats, ScanError> {
        let key = format!("commit:{owner}:{repo}:{sha}");
        if let Some(stats) = self.cache.get(&key) {
            return Ok(stats);
        }

        self.limiter.wait_github(cancel).await?;

        let token = self.tokens.bearer().await?;
        let url = format!("{}/repos/{owner}/{repo}/commits/{sha}", self.api_base);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header("accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| ScanError::Upstream {
                status: None,
                message: format!("fetching commit {sha}: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScanError::Upstream {
                status: Some(status.as_u16()),
                message: format!("get commit {sha}: {body}"),
            });
        }

        let detail: CommitWithFiles = response.json().await.map_err(|e| ScanError::Upstream {
            status: None,
            message: format!("decoding commit {sha}: {e}"),
        })?;

        let mut stats = CommitStats::default();
        for file in detail.files.unwrap_or_default().into_iter().flatten() {
            stats.files += 1;
            stats.additions += file.additions;
            stats.deletions += file.deletions;
        }

        self.cache.set(key, stats, STATS_TTL);
        Ok(stats)
    }
}
