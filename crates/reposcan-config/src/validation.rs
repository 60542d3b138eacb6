// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: positive counts and quotas, ordered backoff bounds, and
//! enumerated level strings.

use crate::model::AppConfig;

const ENVS: [&str; 3] = ["dev", "staging", "prod"];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or all collected violation
/// messages (does not fail fast).
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !ENVS.contains(&config.app.env.as_str()) {
        errors.push(format!(
            "app.env must be one of {ENVS:?}, got `{}`",
            config.app.env
        ));
    }

    if !LOG_LEVELS.contains(&config.app.log_level.as_str()) {
        errors.push(format!(
            "app.log_level must be one of {LOG_LEVELS:?}, got `{}`",
            config.app.log_level
        ));
    }

    if config.app.consumer_prefix.trim().is_empty() {
        errors.push("app.consumer_prefix must not be empty".to_string());
    }

    if config.redis.url.trim().is_empty() {
        errors.push("redis.url must not be empty".to_string());
    }

    for (name, value) in [
        ("worker.count", config.worker.count as u64),
        ("worker.max_retries", config.worker.max_retries as u64),
        ("worker.message_timeout_secs", config.worker.message_timeout_secs),
        ("worker.backoff_min_ms", config.worker.backoff_min_ms),
        ("worker.backoff_max_ms", config.worker.backoff_max_ms),
        ("redis.stream_max_len", config.redis.stream_max_len),
        ("redis.block_timeout_ms", config.redis.block_timeout_ms),
        ("redis.batch_size", config.redis.batch_size as u64),
        ("redis.conn_timeout_secs", config.redis.conn_timeout_secs),
        ("github.concurrency", config.github.concurrency as u64),
        ("github.rate_limit_rpm", config.github.rate_limit_rpm as u64),
        ("openai.rate_limit_rpm", config.openai.rate_limit_rpm as u64),
        ("cache.size", config.cache.size as u64),
        ("http.client_timeout_secs", config.http.client_timeout_secs),
        ("app.shutdown_grace_secs", config.app.shutdown_grace_secs),
    ] {
        if value == 0 {
            errors.push(format!("{name} must be greater than zero"));
        }
    }

    if config.worker.backoff_min_ms > config.worker.backoff_max_ms {
        errors.push(format!(
            "worker.backoff_min_ms ({}) must not exceed worker.backoff_max_ms ({})",
            config.worker.backoff_min_ms, config.worker.backoff_max_ms
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
