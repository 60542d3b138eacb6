// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue payload extraction.
//!
//! The `queuePayload` field arrives in one of three shapes depending on the
//! producer's client: a JSON string, raw bytes, or an already-decoded map.
//! All three are canonicalized to JSON bytes before decoding.

use std::collections::HashMap;

use redis::Value;

use reposcan_core::{QueueMessage, ScanError};

/// Decodes the `queuePayload` field of one stream entry.
pub fn extract_queue_payload(fields: &HashMap<String, Value>) -> Result<QueueMessage, ScanError> {
    let value = fields
        .get("queuePayload")
        .ok_or_else(|| ScanError::PayloadMalformed("missing queuePayload".into()))?;

    let bytes = canonical_json_bytes(value)?;
    let msg: QueueMessage = serde_json::from_slice(&bytes)
        .map_err(|e| ScanError::PayloadMalformed(format!("decoding queuePayload: {e}")))?;

    if msg.owner.is_empty() || msg.repo.is_empty() || msg.format.is_empty() {
        return Err(ScanError::PayloadMalformed(
            "owner, repo, and format must be non-empty".into(),
        ));
    }
    if msg.from > msg.to {
        return Err(ScanError::PayloadMalformed(format!(
            "window is negative: from {} > to {}",
            msg.from, msg.to
        )));
    }
    Ok(msg)
}

fn canonical_json_bytes(value: &Value) -> Result<Vec<u8>, ScanError> {
    match value {
        Value::BulkString(bytes) => Ok(bytes.clone()),
        Value::SimpleString(s) => Ok(s.clone().into_bytes()),
        Value::Map(_) | Value::Array(_) => {
            let json = redis_value_to_json(value)?;
            serde_json::to_vec(&json)
                .map_err(|e| ScanError::PayloadMalformed(format!("encoding map payload: {e}")))
        }
        other => Err(ScanError::PayloadMalformed(format!(
            "unexpected type for queuePayload: {other:?}"
        ))),
    }
}

/// Converts a decoded redis value tree into JSON. Map shapes keep the field
/// types the broker client decoded; an array is read as flattened
/// field-value pairs, the RESP2 rendering of a map.
fn redis_value_to_json(value: &Value) -> Result<serde_json::Value, ScanError> {
    let bad = |what: &str| ScanError::PayloadMalformed(format!("unsupported {what} in queuePayload map"));
    match value {
        Value::Nil => Ok(serde_json::Value::Null),
        Value::Int(i) => Ok(serde_json::Value::from(*i)),
        Value::Double(d) => serde_json::Number::from_f64(*d)
            .map(serde_json::Value::Number)
            .ok_or_else(|| bad("float")),
        Value::Boolean(b) => Ok(serde_json::Value::Bool(*b)),
        Value::SimpleString(s) => Ok(serde_json::Value::String(s.clone())),
        Value::BulkString(bytes) => Ok(serde_json::Value::String(
            String::from_utf8_lossy(bytes).into_owned(),
        )),
        Value::Map(pairs) => {
            let mut object = serde_json::Map::with_capacity(pairs.len());
            for (key, val) in pairs {
                object.insert(value_to_key(key)?, redis_value_to_json(val)?);
            }
            Ok(serde_json::Value::Object(object))
        }
        Value::Array(items) => {
            if items.len() % 2 != 0 {
                return Err(bad("odd-length array"));
            }
            let mut object = serde_json::Map::with_capacity(items.len() / 2);
            for chunk in items.chunks(2) {
                object.insert(value_to_key(&chunk[0])?, redis_value_to_json(&chunk[1])?);
            }
            Ok(serde_json::Value::Object(object))
        }
        _ => Err(bad("value kind")),
    }
}

fn value_to_key(value: &Value) -> Result<String, ScanError> {
    match value {
        Value::SimpleString(s) => Ok(s.clone()),
        Value::BulkString(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        other => Err(ScanError::PayloadMalformed(format!(
            "non-string map key in queuePayload: {other:?}"
        ))),
    }
}
