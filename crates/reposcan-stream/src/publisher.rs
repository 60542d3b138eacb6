// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Result publication to the capped `scan:results` stream.

use chrono::SecondsFormat;
use redis::aio::MultiplexedConnection;
use redis::streams::StreamMaxlen;
use redis::AsyncCommands;
use tracing::debug;

use reposcan_core::{QueueMessage, ScanError, SummarizeResult};

use crate::broker::RESULTS_STREAM;

/// Appends standup artifacts to `scan:results`, trimming the stream
/// approximately to the configured cap on every write.
#[derive(Clone)]
pub struct ResultPublisher {
    conn: MultiplexedConnection,
    stream_max_len: usize,
}

impl ResultPublisher {
    pub fn new(conn: MultiplexedConnection, stream_max_len: usize) -> Self {
        Self {
            conn,
            stream_max_len,
        }
    }

    /// Publishes one artifact and returns the broker-assigned entry ID.
    ///
    /// Test standups carry `isTestStandup=true` and an enriched payload that
    /// includes the usage receipt; regular standups publish the artifact
    /// alone.
    pub async fn publish(
        &self,
        result: &SummarizeResult,
        msg: &QueueMessage,
    ) -> Result<String, ScanError> {
        let payload = if msg.is_test_standup {
            serde_json::to_string(result)
        } else {
            serde_json::to_string(&result.payload)
        }
        .map_err(|e| ScanError::Broker {
            message: format!("encoding result payload: {e}"),
            source: Some(Box::new(e)),
        })?;

        let mut items: Vec<(&str, String)> = vec![
            ("payload", payload),
            ("repo", result.payload.repo.clone()),
            (
                "from",
                msg.from.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            ("to", msg.to.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("format", msg.format.clone()),
        ];
        if msg.is_test_standup {
            items.push(("isTestStandup", "true".to_string()));
        }

        let mut conn = self.conn.clone();
        let id: String = conn
            .xadd_maxlen(
                RESULTS_STREAM,
                StreamMaxlen::Approx(self.stream_max_len),
                "*",
                &items,
            )
            .await
            .map_err(|e| ScanError::Broker {
                message: format!("publishing to {RESULTS_STREAM}: {e}"),
                source: Some(Box::new(e)),
            })?;

        debug!(id = id.as_str(), repo = result.payload.repo.as_str(), "result appended");
        Ok(id)
    }
}
