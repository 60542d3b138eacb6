// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Broker connection bootstrap.
//!
//! Opens two multiplexed connections: one dedicated to the blocking
//! consumer-group read, one shared by acks and publishes, so a blocked read
//! never delays an acknowledgement. Consumer groups are created idempotently;
//! the broker's BUSYGROUP reply means the group already exists and is not an
//! error.

use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::info;

use reposcan_config::model::RedisConfig;
use reposcan_core::ScanError;

/// The inbound jobs stream.
pub const JOBS_STREAM: &str = "scan:jobs";
/// Consumer group on the jobs stream.
pub const JOBS_GROUP: &str = "scanners";
/// The outbound results stream.
pub const RESULTS_STREAM: &str = "scan:results";
/// Consumer group created for downstream result workers.
pub const RESULTS_GROUP: &str = "workers";

fn broker_err(context: &str) -> impl Fn(redis::RedisError) -> ScanError + '_ {
    move |e| ScanError::Broker {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Connects to the broker and prepares both consumer groups.
///
/// Returns `(reader, shared)` connections. Fails fast if the broker does not
/// answer a PING within the configured connect timeout.
pub async fn connect(
    config: &RedisConfig,
) -> Result<(MultiplexedConnection, MultiplexedConnection), ScanError> {
    let client = redis::Client::open(config.url.as_str())
        .map_err(|e| ScanError::Broker {
            message: format!("invalid redis url: {e}"),
            source: Some(Box::new(e)),
        })?;

    let reader = open_connection(&client, config).await?;
    let mut shared = open_connection(&client, config).await?;

    let ping = async {
        let pong: String = redis::cmd("PING").query_async(&mut shared).await?;
        Ok::<_, redis::RedisError>(pong)
    };
    tokio::time::timeout(config.conn_timeout(), ping)
        .await
        .map_err(|_| ScanError::Broker {
            message: "redis ping timeout".into(),
            source: None,
        })?
        .map_err(broker_err("redis ping failed"))?;

    ensure_group(&mut shared, RESULTS_STREAM, RESULTS_GROUP).await?;
    ensure_group(&mut shared, JOBS_STREAM, JOBS_GROUP).await?;

    info!(url = config.url.as_str(), "connected to redis");
    Ok((reader, shared))
}

async fn open_connection(
    client: &redis::Client,
    config: &RedisConfig,
) -> Result<MultiplexedConnection, ScanError> {
    tokio::time::timeout(
        config.conn_timeout(),
        client.get_multiplexed_tokio_connection(),
    )
    .await
    .map_err(|_| ScanError::Broker {
        message: "redis connect timeout".into(),
        source: None,
    })?
    .map_err(broker_err("redis connect failed"))
}

/// Creates `group` on `stream` with MKSTREAM and the `$` starting ID.
pub async fn ensure_group(
    conn: &mut MultiplexedConnection,
    stream: &str,
    group: &str,
) -> Result<(), ScanError> {
    let created: Result<String, redis::RedisError> =
        conn.xgroup_create_mkstream(stream, group, "$").await;
    match created {
        Ok(_) => Ok(()),
        Err(e) if e.to_string().contains("BUSYGROUP") => Ok(()),
        Err(e) => Err(ScanError::Broker {
            message: format!("xgroup create {stream}/{group}: {e}"),
            source: Some(Box::new(e)),
        }),
    }
}
