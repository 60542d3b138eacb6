// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `reposcan serve` command implementation.
//!
//! Builds the process-wide singletons (limiter, cache, broker connections,
//! publisher), wires the job processor, starts the health endpoint, and runs
//! the stream consumer until a shutdown signal drains it.

use std::sync::Arc;

use tracing::{info, warn};

use reposcan_cache::TtlCache;
use reposcan_config::model::AppConfig;
use reposcan_config::{
    fetch_secret_by_name, validate_config, SECRET_GITHUB_CLIENT_ID, SECRET_GITHUB_PRIVATE_KEY,
    SECRET_OPENAI_API_KEY,
};
use reposcan_core::{JobProcessor, ScanError, Summarizer};
use reposcan_openai::OpenAiSummarizer;
use reposcan_ratelimit::RemoteLimiter;
use reposcan_stream::{
    broker, watch_streams, RedisSink, ResultPublisher, StreamSink, JOBS_GROUP, JOBS_STREAM,
};

use crate::health::{serve_health, HealthState};
use crate::processor::ScanProcessor;
use crate::shutdown;

/// Runs the `reposcan serve` command.
///
/// Startup errors (config, secrets, broker) are fatal and propagate; after
/// startup the consumer runs until SIGINT/SIGTERM, then drains cleanly.
pub async fn run_serve(config: AppConfig) -> Result<(), ScanError> {
    init_tracing(&config.app.log_level);

    info!(env = config.app.env.as_str(), "starting reposcan serve");

    if let Err(errors) = validate_config(&config) {
        return Err(ScanError::Config(errors.join("; ")));
    }

    let github_private_key = fetch_secret_by_name(SECRET_GITHUB_PRIVATE_KEY)?;
    let github_client_id = fetch_secret_by_name(SECRET_GITHUB_CLIENT_ID)?;
    let openai_api_key = fetch_secret_by_name(SECRET_OPENAI_API_KEY)?;

    let (reader_conn, shared_conn) = broker::connect(&config.redis).await?;

    // Process-wide singletons, shared into every worker.
    let limiter = Arc::new(RemoteLimiter::new(
        config.github.rate_limit_rpm,
        config.openai.rate_limit_rpm,
    ));
    let cache = Arc::new(TtlCache::new(config.cache.size));

    let summarizer: Arc<dyn Summarizer> = Arc::new(OpenAiSummarizer::new(
        &config,
        openai_api_key,
        limiter.clone(),
    )?);
    let processor: Arc<dyn JobProcessor> = Arc::new(ScanProcessor::new(
        config.clone(),
        limiter,
        cache,
        github_private_key,
        github_client_id,
        summarizer,
    ));

    let publisher = ResultPublisher::new(shared_conn.clone(), config.redis.stream_max_len as usize);
    let sink: Arc<dyn StreamSink> = Arc::new(RedisSink::new(
        shared_conn,
        JOBS_STREAM.to_string(),
        JOBS_GROUP.to_string(),
        publisher,
    ));

    let consumer_name = format!("{}-{}", config.app.consumer_prefix, std::process::id());
    let cancel = shutdown::install_signal_handler();

    let health_handle = tokio::spawn(serve_health(
        config.health.clone(),
        HealthState {
            service: "reposcan".to_string(),
            consumer: consumer_name.clone(),
        },
        cancel.clone(),
    ));

    info!(
        consumer = consumer_name.as_str(),
        workers = config.worker.count,
        "watching scan:jobs"
    );

    let watched = watch_streams(
        cancel.clone(),
        reader_conn,
        JOBS_STREAM.to_string(),
        JOBS_GROUP.to_string(),
        consumer_name,
        config.redis.clone(),
        config.worker.clone(),
        processor,
        sink,
    )
    .await;

    match watched {
        Err(ScanError::Cancelled) => info!("consumer drained after shutdown signal"),
        Err(e) => return Err(e),
        Ok(()) => {}
    }

    // Give the health server up to the grace period to finish its graceful
    // shutdown; the consumer has already drained.
    match tokio::time::timeout(config.app.shutdown_grace(), health_handle).await {
        Ok(Ok(Err(e))) => warn!(error = %e, "health server exited with error"),
        Ok(Err(e)) => warn!(error = %e, "health server task panicked"),
        Err(_) => warn!("health server did not stop within the grace period"),
        Ok(Ok(Ok(()))) => {}
    }

    info!("reposcan serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the configured log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{log_level},hyper=warn,reqwest=warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
