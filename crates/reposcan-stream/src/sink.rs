// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The worker's view of the broker: publish one result, acknowledge one
//! entry. Kept behind a trait so the worker pool can run against a recorder
//! in tests (and so a dead-letter stream could be slotted in later).

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use reposcan_core::{QueueMessage, ScanError, SummarizeResult};

use crate::publisher::ResultPublisher;

/// Publish/ack surface owned by each worker.
#[async_trait]
pub trait StreamSink: Send + Sync {
    /// Appends a completed artifact to the results stream.
    async fn publish(
        &self,
        result: &SummarizeResult,
        msg: &QueueMessage,
    ) -> Result<String, ScanError>;

    /// Acknowledges one jobs-stream entry.
    async fn ack(&self, id: &str) -> Result<(), ScanError>;
}

/// The production sink: XACK on the jobs group plus the result publisher.
pub struct RedisSink {
    conn: MultiplexedConnection,
    stream: String,
    group: String,
    publisher: ResultPublisher,
}

impl RedisSink {
    pub fn new(
        conn: MultiplexedConnection,
        stream: String,
        group: String,
        publisher: ResultPublisher,
    ) -> Self {
        Self {
            conn,
            stream,
            group,
            publisher,
        }
    }
}

#[async_trait]
impl StreamSink for RedisSink {
    async fn publish(
        &self,
        result: &SummarizeResult,
        msg: &QueueMessage,
    ) -> Result<String, ScanError> {
        self.publisher.publish(result, msg).await
    }

    async fn ack(&self, id: &str) -> Result<(), ScanError> {
        let mut conn = self.conn.clone();
        let _count: i64 = conn
            .xack(&self.stream, &self.group, &[id])
            .await
            .map_err(|e| ScanError::Broker {
                message: format!("acknowledging {id}: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }
}
