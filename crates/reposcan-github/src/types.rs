// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! GitHub REST API response shapes, reduced to the fields this adapter reads.

use serde::Deserialize;

/// One entry from the "list commits" endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoCommit {
    pub sha: String,
    pub commit: CommitDetail,
}

/// The git-level commit object nested in both endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommitDetail {
    pub message: String,
    pub author: Option<GitIdentity>,
    pub committer: Option<GitIdentity>,
}

/// Author or committer identity; either field may be missing upstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

/// The "get commit" endpoint reply; only the file list matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitWithFiles {
    pub sha: String,
    #[serde(default)]
    pub files: Option<Vec<Option<CommitFile>>>,
}

/// Per-file change counts within one commit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommitFile {
    pub additions: u64,
    pub deletions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_commit_tolerates_missing_identities() {
        let json = r#"{
            "sha": "abc123",
            "commit": {"message": "fix: a thing"}
        }"#;
        let commit: RepoCommit = serde_json::from_str(json).unwrap();
        assert_eq!(commit.sha, "abc123");
        assert!(commit.commit.author.is_none());
        assert!(commit.commit.committer.is_none());
    }

    #[test]
    fn commit_files_tolerate_null_entries() {
        let json = r#"{
            "sha": "abc123",
            "files": [
                {"additions": 5, "deletions": 1},
                null,
                {"additions": 2, "deletions": 0}
            ]
        }"#;
        let commit: CommitWithFiles = serde_json::from_str(json).unwrap();
        let files = commit.files.unwrap();
        assert_eq!(files.len(), 3);
        assert!(files[1].is_none());
    }
}
