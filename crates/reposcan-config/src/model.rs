// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the reposcan worker.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup. Durations are plain integers with an explicit
//! unit suffix in the field name; accessor methods return [`Duration`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level reposcan configuration.
///
/// Loaded from compiled defaults, an optional `reposcan.toml`, and `APP_*`
/// environment variable overrides. All sections default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    /// Process identity and lifecycle settings.
    pub app: ServiceConfig,

    /// Broker connection and stream tuning.
    pub redis: RedisConfig,

    /// Worker pool and retry discipline.
    pub worker: WorkerConfig,

    /// Version-control host settings.
    pub github: GithubConfig,

    /// Language-model host settings.
    pub openai: OpenAiConfig,

    /// Commit-stats cache settings.
    pub cache: CacheConfig,

    /// Outbound HTTP client settings.
    pub http: HttpConfig,

    /// Health endpoint settings.
    pub health: HealthConfig,
}

/// Process identity and lifecycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Deployment environment: "dev", "staging", or "prod".
    #[serde(default = "default_env")]
    pub env: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Grace period for draining on shutdown, in seconds.
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,

    /// Consumer-name prefix; the full consumer name is `{prefix}-{pid}`.
    #[serde(default = "default_consumer_prefix")]
    pub consumer_prefix: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            env: default_env(),
            log_level: default_log_level(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
            consumer_prefix: default_consumer_prefix(),
        }
    }
}

impl ServiceConfig {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

fn default_env() -> String {
    "prod".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_shutdown_grace_secs() -> u64 {
    15
}

fn default_consumer_prefix() -> String {
    "reposcan".to_string()
}

/// Broker connection and stream tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RedisConfig {
    /// Broker URL, e.g. `redis://localhost:6379`.
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Approximate cap for the `scan:results` stream (XADD MAXLEN ~).
    #[serde(default = "default_stream_max_len")]
    pub stream_max_len: u64,

    /// Block deadline for each consumer-group read, in milliseconds.
    #[serde(default = "default_block_timeout_ms")]
    pub block_timeout_ms: u64,

    /// Maximum entries per consumer-group read.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Connect/ping deadline, in seconds.
    #[serde(default = "default_conn_timeout_secs")]
    pub conn_timeout_secs: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            stream_max_len: default_stream_max_len(),
            block_timeout_ms: default_block_timeout_ms(),
            batch_size: default_batch_size(),
            conn_timeout_secs: default_conn_timeout_secs(),
        }
    }
}

impl RedisConfig {
    pub fn block_timeout(&self) -> Duration {
        Duration::from_millis(self.block_timeout_ms)
    }

    pub fn conn_timeout(&self) -> Duration {
        Duration::from_secs(self.conn_timeout_secs)
    }
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_stream_max_len() -> u64 {
    1000
}

fn default_block_timeout_ms() -> u64 {
    1000
}

fn default_batch_size() -> usize {
    10
}

fn default_conn_timeout_secs() -> u64 {
    3
}

/// Worker pool sizing and per-message retry discipline.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WorkerConfig {
    /// Number of concurrent workers pulling from the jobs channel.
    #[serde(default = "default_worker_count")]
    pub count: usize,

    /// Per-message processing deadline, in seconds.
    #[serde(default = "default_message_timeout_secs")]
    pub message_timeout_secs: u64,

    /// Maximum processing attempts per message.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial reader backoff after a read error, in milliseconds.
    #[serde(default = "default_backoff_min_ms")]
    pub backoff_min_ms: u64,

    /// Reader backoff ceiling, in milliseconds.
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            count: default_worker_count(),
            message_timeout_secs: default_message_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_min_ms: default_backoff_min_ms(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

impl WorkerConfig {
    pub fn message_timeout(&self) -> Duration {
        Duration::from_secs(self.message_timeout_secs)
    }

    pub fn backoff_min(&self) -> Duration {
        Duration::from_millis(self.backoff_min_ms)
    }

    pub fn backoff_max(&self) -> Duration {
        Duration::from_millis(self.backoff_max_ms)
    }
}

fn default_worker_count() -> usize {
    5
}

fn default_message_timeout_secs() -> u64 {
    300
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_min_ms() -> u64 {
    100
}

fn default_backoff_max_ms() -> u64 {
    3000
}

/// Version-control host configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GithubConfig {
    /// API base URL; override for tests.
    #[serde(default = "default_github_api_base")]
    pub api_base: String,

    /// Bound on concurrent per-commit detail fetches within one job.
    #[serde(default = "default_github_concurrency")]
    pub concurrency: usize,

    /// Token-bucket quota for the host, requests per minute.
    #[serde(default = "default_github_rate_limit_rpm")]
    pub rate_limit_rpm: u32,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_github_api_base(),
            concurrency: default_github_concurrency(),
            rate_limit_rpm: default_github_rate_limit_rpm(),
        }
    }
}

fn default_github_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_github_concurrency() -> usize {
    10
}

fn default_github_rate_limit_rpm() -> u32 {
    80
}

/// Language-model host configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API base URL; override for tests.
    #[serde(default = "default_openai_api_base")]
    pub api_base: String,

    /// Model identifier for summarize calls.
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Token-bucket quota for the host, requests per minute.
    #[serde(default = "default_openai_rate_limit_rpm")]
    pub rate_limit_rpm: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: default_openai_api_base(),
            model: default_openai_model(),
            rate_limit_rpm: default_openai_rate_limit_rpm(),
        }
    }
}

fn default_openai_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_openai_rate_limit_rpm() -> u32 {
    50
}

/// Commit-stats cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Maximum number of cached commit-stat entries.
    #[serde(default = "default_cache_size")]
    pub size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size: default_cache_size(),
        }
    }
}

fn default_cache_size() -> usize {
    1000
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Request timeout for outbound HTTP calls, in seconds.
    #[serde(default = "default_client_timeout_secs")]
    pub client_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            client_timeout_secs: default_client_timeout_secs(),
        }
    }
}

impl HttpConfig {
    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(self.client_timeout_secs)
    }
}

fn default_client_timeout_secs() -> u64 {
    30
}

/// Health endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HealthConfig {
    /// Bind host for the health listener.
    #[serde(default = "default_health_host")]
    pub host: String,

    /// Bind port for the health listener.
    #[serde(default = "default_health_port")]
    pub port: u16,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            host: default_health_host(),
            port: default_health_port(),
        }
    }
}

fn default_health_host() -> String {
    "0.0.0.0".to_string()
}

fn default_health_port() -> u16 {
    8080
}
