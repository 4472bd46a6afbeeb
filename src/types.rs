//! # Common Types
//!
//! This module contains the common types used throughout the application for
//! representing observed author identities, exported commits, and accumulated
//! line statistics.
//!
//! Serialized field names are part of the report format consumed by the
//! dashboard; renaming them is a breaking change for downstream tooling.

use serde::{Deserialize, Serialize};

/// One observed (email, name) author identity from the commit log.
///
/// The same email may be observed several times with different names; the
/// identity resolver collapses duplicates with a last-name-wins rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Author email as recorded on the commit
    pub email: String,
    /// Author name as recorded on the commit
    pub name: String,
}

impl Identity {
    /// Create an identity from borrowed or owned parts.
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }
}

/// Author or committer signature on an exported commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSignature {
    /// Display name as recorded in history
    pub name: String,
    /// Email after normalization through the contributor identity map
    pub email: String,
    /// RFC 2822 date string, passed through from the log source
    pub date: String,
}

/// One normalized commit record, emitted in the order the log yields them
/// (reverse-chronological, all branches).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Full commit hash
    pub commit: String,
    /// Abbreviated commit hash
    pub abbreviated_commit: String,
    /// Full tree hash
    pub tree: String,
    /// Abbreviated tree hash
    pub abbreviated_tree: String,
    /// Full parent hashes, space separated for merges
    pub parent: String,
    /// Abbreviated parent hashes
    pub abbreviated_parent: String,
    /// Ref names pointing at this commit
    pub refs: String,
    /// Commit encoding, empty for UTF-8
    pub encoding: String,
    /// Subject line
    pub subject: String,
    /// Sanitized subject line, suitable for a filename
    pub sanitized_subject_line: String,
    /// Commit body
    pub body: String,
    /// Attached commit notes
    pub commit_notes: String,
    /// Author signature with normalized email
    pub author: CommitSignature,
    /// Committer signature with normalized email
    pub committer: CommitSignature,
}

/// Accumulated line changes for one canonical contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorStats {
    /// Canonical contributor email
    pub email: String,
    /// Total lines added across all counted change entries
    pub lines_added: u64,
    /// Total lines deleted across all counted change entries
    pub lines_deleted: u64,
    /// Added minus deleted, derived when the report is emitted
    pub lines_net: i64,
}
