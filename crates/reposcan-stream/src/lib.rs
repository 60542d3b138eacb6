// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stream layer for the reposcan worker: broker bootstrap, consumer-group
//! reading with a bounded worker pool, payload extraction, and result
//! publication.

pub mod broker;
pub mod consumer;
pub mod payload;
pub mod publisher;
pub mod sink;

pub use broker::{connect, ensure_group, JOBS_GROUP, JOBS_STREAM, RESULTS_GROUP, RESULTS_STREAM};
pub use consumer::{process_entry, watch_streams, StreamEntry};
pub use payload::extract_queue_payload;
pub use publisher::ResultPublisher;
pub use sink::{RedisSink, StreamSink};
