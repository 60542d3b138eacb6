// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Merge order (later overrides earlier): compiled defaults, a local
//! `reposcan.toml`, then `APP_*` environment variables. The env mapping keeps
//! the operational knob names flat (`APP_WORKER_COUNT`, `APP_CACHE_SIZE`, ...)
//! and routes each one into its config section explicitly.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::AppConfig;

/// Load configuration from defaults, `reposcan.toml`, and `APP_*` overrides.
pub fn load_config() -> Result<AppConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file("reposcan.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no env lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<AppConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Create the environment variable provider.
///
/// Uses an explicit `map()` table rather than `Env::split("_")`: the flat
/// operational names do not carry their section, and several keys contain
/// underscores that a naive split would cut in the wrong place
/// (`APP_REDIS_STREAM_MAX_LEN` must become `redis.stream_max_len`, not
/// `redis.stream.max.len`).
///
/// The three secrets share the `APP_` prefix but are not configuration; they
/// must be ignored here or `deny_unknown_fields` would reject them.
fn env_provider() -> Env {
    Env::prefixed("APP_")
        .ignore(&["github_private_key", "github_client_id", "openai_api_key"])
        .map(|key| map_env_key(key.as_str()).into())
}

/// Route a lowercased, prefix-stripped env key into its config section.
fn map_env_key(key: &str) -> String {
    let mapped = match key {
        "env" => "app.env",
        "log_level" => "app.log_level",
        "shutdown_grace_secs" => "app.shutdown_grace_secs",
        "consumer_prefix" => "app.consumer_prefix",

        "redis_url" => "redis.url",
        "redis_stream_max_len" => "redis.stream_max_len",
        "redis_block_timeout_ms" => "redis.block_timeout_ms",
        "redis_batch_size" => "redis.batch_size",
        "redis_conn_timeout_secs" => "redis.conn_timeout_secs",

        "worker_count" => "worker.count",
        "message_timeout_secs" => "worker.message_timeout_secs",
        "max_retries" => "worker.max_retries",
        "backoff_min_ms" => "worker.backoff_min_ms",
        "backoff_max_ms" => "worker.backoff_max_ms",

        "github_api_base" => "github.api_base",
        "github_concurrency" => "github.concurrency",
        "github_rate_limit" => "github.rate_limit_rpm",

        "openai_api_base" => "openai.api_base",
        "openai_model" => "openai.model",
        "openai_rate_limit" => "openai.rate_limit_rpm",

        "cache_size" => "cache.size",
        "http_client_timeout_secs" => "http.client_timeout_secs",

        "health_host" => "health.host",
        "health_port" => "health.port",

        other => return other.to_string(),
    };
    mapped.to_string()
}
