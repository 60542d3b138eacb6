// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire-schema and domain types shared across the reposcan crates.
//!
//! The field names and JSON casing here are the queue/results contract; the
//! producer and downstream fan-out services decode these shapes byte-for-byte.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::warn;

/// A repository-scan job decoded from one `scan:jobs` stream entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueMessage {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub branch: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    #[serde(rename = "installation_id")]
    pub installation_id: i64,
    pub format: String,
    #[serde(rename = "isTestStandup", default)]
    pub is_test_standup: bool,
}

/// A normalized commit assembled from the list and detail endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub sha: String,
    pub author_name: String,
    pub author_email: String,
    pub message: String,
    pub files: u64,
    pub additions: u64,
    pub deletions: u64,
}

/// Aggregated per-commit file statistics, the cache value for
/// `commit:{owner}:{repo}:{sha}` entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitStats {
    pub files: u64,
    pub additions: u64,
    pub deletions: u64,
}

/// The structured input handed to the summarizer: one repository window and
/// its deduplicated commit list (which may be empty).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeJob {
    pub repo: String,
    pub project_name: String,
    pub handle: String,
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
    pub commits: Vec<Commit>,
}

/// A contributor line in the standup artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    pub commits: u64,
}

/// File-change totals inside the technical block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesChanged {
    pub files: u64,
    pub additions: u64,
    pub deletions: u64,
}

/// The engineer-facing variant block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicalLevel {
    pub header: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub what_worked_on: Vec<String>,
    pub files_changed: FilesChanged,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commits: Vec<String>,
}

/// The prose variant block shared by the mildly-technical and layman levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryLevel {
    pub header: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub what_worked_on: Vec<String>,
    pub impact: String,
    pub focus: String,
}

/// The reporting window echoed back by the model as display strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Window {
    pub since: String,
    pub until: String,
}

/// The standup artifact. Exactly one of the three variant blocks is populated
/// after pruning; the other two serialize as empty objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StandupPayload {
    pub repo: String,
    pub title: String,
    pub window: Window,
    pub technical: TechnicalLevel,
    pub mildly_technical: SummaryLevel,
    pub layman: SummaryLevel,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contributors: Vec<Contributor>,
}

/// Verbosity variant requested by a queue message.
///
/// Selects the system prompt, the tool schema's `required` set, and which
/// artifact block survives pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Technical,
    MildlyTechnical,
    Layman,
}

impl Variant {
    /// Maps a queue-message `format` string to a variant.
    ///
    /// Case-folded, dashes treated as underscores. Unknown values warn and
    /// default to [`Variant::Technical`].
    pub fn from_format(format: &str) -> Self {
        let folded = format.to_lowercase().replace('-', "_");
        folded.parse().unwrap_or_else(|_| {
            warn!(format, "unknown format, defaulting to technical");
            Variant::Technical
        })
    }
}

/// Token usage and estimated cost for one summarizer call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageDetails {
    pub model: String,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub total_tokens: i64,
    pub estimated_cost: f64,
}

/// A completed summarization: the artifact plus its usage receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummarizeResult {
    pub payload: StandupPayload,
    pub details: UsageDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_message_decodes_wire_names() {
        let json = r#"{
            "owner": "acme",
            "repo": "api",
            "branch": "main",
            "from": "2024-01-01T00:00:00Z",
            "to": "2024-01-02T00:00:00Z",
            "installation_id": 84821041,
            "format": "technical",
            "isTestStandup": true
        }"#;
        let msg: QueueMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.owner, "acme");
        assert_eq!(msg.installation_id, 84821041);
        assert!(msg.is_test_standup);
        assert!(msg.from < msg.to);
    }

    #[test]
    fn queue_message_defaults_optional_fields() {
        let json = r#"{
            "owner": "acme",
            "repo": "api",
            "from": "2024-01-01T00:00:00Z",
            "to": "2024-01-02T00:00:00Z",
            "installation_id": 1,
            "format": "layman"
        }"#;
        let msg: QueueMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.branch, "");
        assert!(!msg.is_test_standup);
    }

    #[test]
    fn variant_from_format_folds_case_and_dashes() {
        assert_eq!(Variant::from_format("technical"), Variant::Technical);
        assert_eq!(Variant::from_format("TECHNICAL"), Variant::Technical);
        assert_eq!(
            Variant::from_format("Mildly-Technical"),
            Variant::MildlyTechnical
        );
        assert_eq!(
            Variant::from_format("mildly_technical"),
            Variant::MildlyTechnical
        );
        assert_eq!(Variant::from_format("LAYMAN"), Variant::Layman);
    }

    #[test]
    fn variant_from_format_defaults_to_technical() {
        assert_eq!(Variant::from_format("verbose"), Variant::Technical);
        assert_eq!(Variant::from_format(""), Variant::Technical);
    }

    #[test]
    fn variant_display_matches_wire_strings() {
        assert_eq!(Variant::Technical.to_string(), "technical");
        assert_eq!(Variant::MildlyTechnical.to_string(), "mildly_technical");
        assert_eq!(Variant::Layman.to_string(), "layman");
    }

    #[test]
    fn standup_payload_serializes_empty_blocks_as_objects() {
        let payload = StandupPayload {
            repo: "acme/api".into(),
            title: "Standup".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&payload).unwrap();
        // Non-selected blocks stay present as empty objects for downstream
        // decoders; only empty lists are omitted.
        assert!(json["technical"].is_object());
        assert!(json["mildlyTechnical"].is_object());
        assert!(json["layman"].is_object());
        assert!(json.get("contributors").is_none());
        assert!(json["technical"].get("whatWorkedOn").is_none());
    }

    #[test]
    fn commit_uses_camel_case_on_the_wire() {
        let commit = Commit {
            sha: "abc".into(),
            author_name: "Ada".into(),
            author_email: "ada@acme.dev".into(),
            message: "fix: off-by-one".into(),
            files: 2,
            additions: 10,
            deletions: 1,
        };
        let json = serde_json::to_value(&commit).unwrap();
        assert_eq!(json["authorName"], "Ada");
        assert_eq!(json["authorEmail"], "ada@acme.dev");
        assert_eq!(json["additions"], 10);
    }

    #[test]
    fn usage_details_round_trip() {
        let details = UsageDetails {
            model: "gpt-4o".into(),
            prompt_tokens: 1200,
            completion_tokens: 300,
            total_tokens: 1500,
            estimated_cost: 0.006,
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["promptTokens"], 1200);
        assert_eq!(json["estimatedCost"], 0.006);
        let back: UsageDetails = serde_json::from_value(json).unwrap();
        assert_eq!(back, details);
    }

    #[test]
    fn contributor_omits_empty_email() {
        let contributor = Contributor {
            name: "Ada".into(),
            email: String::new(),
            commits: 3,
        };
        let json = serde_json::to_value(&contributor).unwrap();
        assert!(json.get("email").is_none());
    }
}
