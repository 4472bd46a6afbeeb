//! Commit export: delimited `git log` records to normalized commit data.

use crate::analysis::git::{FIELD_SEPARATOR, RECORD_SEPARATOR};
use crate::analysis::identity::NormalizationMap;
use crate::types::{CommitRecord, CommitSignature};

/// Minimum field count for a record to be exported.
const COMMIT_FIELD_COUNT: usize = 18;

/// Parse raw delimited log text into commit records, rewriting author and
/// committer emails through the normalization map.
///
/// Records with fewer than the expected fields, typically a truncated
/// trailing chunk, are skipped without aborting the export. Input order is
/// preserved.
pub fn parse_commits(raw: &str, map: &NormalizationMap) -> Vec<CommitRecord> {
    raw.split(RECORD_SEPARATOR)
        .filter_map(|chunk| parse_record(chunk, map))
        .collect()
}

fn parse_record(chunk: &str, map: &NormalizationMap) -> Option<CommitRecord> {
    if chunk.trim().is_empty() {
        return None;
    }

    let fields: Vec<&str> = chunk.split(FIELD_SEPARATOR).map(str::trim).collect();
    if fields.len() < COMMIT_FIELD_COUNT {
        return None;
    }

    Some(CommitRecord {
        commit: fields[0].to_string(),
        abbreviated_commit: fields[1].to_string(),
        tree: fields[2].to_string(),
        abbreviated_tree: fields[3].to_string(),
        parent: fields[4].to_string(),
        abbreviated_parent: fields[5].to_string(),
        refs: fields[6].to_string(),
        encoding: fields[7].to_string(),
        subject: fields[8].to_string(),
        sanitized_subject_line: fields[9].to_string(),
        body: fields[10].to_string(),
        commit_notes: fields[11].to_string(),
        author: CommitSignature {
            name: fields[12].to_string(),
            email: map.normalize(fields[13]).to_string(),
            date: fields[14].to_string(),
        },
        committer: CommitSignature {
            name: fields[15].to_string(),
            email: map.normalize(fields[16]).to_string(),
            date: fields[17].to_string(),
        },
    })
}
