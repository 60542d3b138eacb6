// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool parameter schemas, one per verbosity variant.
//!
//! Every schema requires `repo`, `window`, `title`, and the single variant
//! block. Contributors are always permitted, never required.

use reposcan_core::Variant;
use serde_json::{json, Value};

/// Builds the `emit_structured_standup` parameter schema for a variant.
pub fn build_schema(variant: Variant) -> Value {
    let mut properties = json!({
        "repo": {"type": "string"},
        "window": {
            "type": "object",
            "properties": {
                "since": {"type": "string"},
                "until": {"type": "string"}
            },
            "required": ["since", "until"]
        },
        "contributors": {
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "email": {"type": "string"},
                    "commits": {"type": "integer"}
                },
                "required": ["name", "commits"]
            }
        },
        "title": {"type": "string"}
    });

    let (block_name, block_schema) = variant_block(variant);
    properties[block_name] = block_schema;

    json!({
        "type": "object",
        "properties": properties,
        "required": ["repo", "window", block_name, "title"]
    })
}

fn variant_block(variant: Variant) -> (&'static str, Value) {
    match variant {
        Variant::Technical => (
            "technical",
            json!({
                "type": "object",
                "properties": {
                    "header": {"type": "string"},
                    "whatWorkedOn": {"type": "array", "items": {"type": "string"}},
                    "filesChanged": {
                        "type": "object",
                        "properties": {
                            "files": {"type": "integer"},
                            "additions": {"type": "integer"},
                            "deletions": {"type": "integer"}
                        },
                        "required": ["files", "additions", "deletions"]
                    },
                    "commits": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["header", "filesChanged"]
            }),
        ),
        Variant::MildlyTechnical => ("mildlyTechnical", prose_block()),
        Variant::Layman => ("layman", prose_block()),
    }
}

fn prose_block() -> Value {
    json!({
        "type": "object",
        "properties": {
            "header": {"type": "string"},
            "whatWorkedOn": {"type": "array", "items": {"type": "string"}},
            "impact": {"type": "string"},
            "focus": {"type": "string"}
        },
        "required": ["header", "impact", "focus"]
    })
}
