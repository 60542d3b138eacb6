// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A stream sink that records publishes and acks instead of talking to a
//! broker.

use async_trait::async_trait;
use tokio::sync::Mutex;

use reposcan_core::{QueueMessage, ScanError, SummarizeResult};
use reposcan_stream::StreamSink;

/// One recorded publication.
#[derive(Debug, Clone)]
pub struct PublishedEntry {
    pub result: SummarizeResult,
    pub msg: QueueMessage,
}

/// Records every publish and ack for later assertions.
#[derive(Default)]
pub struct RecordingSink {
    published: Mutex<Vec<PublishedEntry>>,
    acked: Mutex<Vec<String>>,
    fail_publish: Mutex<bool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next publishes fail with a broker error.
    pub async fn fail_publishes(&self) {
        *self.fail_publish.lock().await = true;
    }

    pub async fn published(&self) -> Vec<PublishedEntry> {
        self.published.lock().await.clone()
    }

    pub async fn acked(&self) -> Vec<String> {
        self.acked.lock().await.clone()
    }
}

#[async_trait]
impl StreamSink for RecordingSink {
    async fn publish(
        &self,
        result: &SummarizeResult,
        msg: &QueueMessage,
    ) -> Result<String, ScanError> {
        if *self.fail_publish.lock().await {
            return Err(ScanError::Broker {
                message: "recording sink publish failure".into(),
                source: None,
            });
        }
        let mut published = self.published.lock().await;
        published.push(PublishedEntry {
            result: result.clone(),
            msg: msg.clone(),
        });
        Ok(format!("0-{}", published.len()))
    }

    async fn ack(&self, id: &str) -> Result<(), ScanError> {
        self.acked.lock().await.push(id.to_string());
        Ok(())
    }
}
