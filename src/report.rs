//! Report generation and JSON artifact writing.
//!
//! Reports are serialized in full and moved into place in one step, so a
//! failure anywhere in the pipeline never leaves a partial file at the
//! destination. Summaries go to stderr, never into the artifacts.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::analysis::export::parse_commits;
use crate::analysis::git::HistorySource;
use crate::analysis::identity::NormalizationMap;
use crate::analysis::stats::aggregate_line_stats;
use crate::error::ReportError;
use crate::types::{CommitRecord, ContributorStats};

/// Export every commit in history with normalized emails. A failing log
/// query is fatal for this report.
pub fn commit_report(
    source: &dyn HistorySource,
    map: &NormalizationMap,
) -> Result<Vec<CommitRecord>, ReportError> {
    let raw = source.list_commits()?;
    Ok(parse_commits(&raw, map))
}

/// Aggregate per-contributor line statistics. A failing numstat query is
/// fatal for this report.
pub fn line_stats_report(
    source: &dyn HistorySource,
    map: &NormalizationMap,
) -> Result<Vec<ContributorStats>, ReportError> {
    let raw = source.list_numeric_changes()?;
    Ok(aggregate_line_stats(&raw, map))
}

/// Serialize a report and move it into place atomically.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ReportError> {
    let json = serde_json::to_vec_pretty(value)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(&json)?;
    file.write_all(b"\n")?;
    file.persist(path).map_err(|err| ReportError::Io(err.error))?;
    Ok(())
}

/// Print the detected duplicate-identity mapping to stderr, one rewrite
/// per line. Silent when nothing was merged.
pub fn print_normalization_summary(map: &NormalizationMap) {
    if map.is_empty() {
        return;
    }
    eprintln!("Duplicate author emails detected:");
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort();
    for (original, canonical) in entries {
        eprintln!("  {original} -> {canonical}");
    }
    eprintln!();
}

/// Print the commit-report summary, with the activity span when the
/// boundary dates parse.
pub fn print_commit_summary(path: &Path, commits: &[CommitRecord]) {
    match activity_span(commits) {
        Some((first, last)) => eprintln!(
            "Wrote {} ({} commits, {} to {})",
            path.display(),
            commits.len(),
            first.format("%Y-%m-%d"),
            last.format("%Y-%m-%d"),
        ),
        None => eprintln!("Wrote {} ({} commits)", path.display(), commits.len()),
    }
}

/// Print the line-stats summary with per-contributor net lines.
pub fn print_line_stats_summary(path: &Path, stats: &[ContributorStats]) {
    eprintln!("Wrote {} ({} contributors)", path.display(), stats.len());
    for contributor in stats {
        eprintln!("  {}: {:+} net lines", contributor.email, contributor.lines_net);
    }
}

/// Earliest and latest author dates across the export, skipping any that
/// fail to parse.
fn activity_span(
    commits: &[CommitRecord],
) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    let mut dates = commits
        .iter()
        .filter_map(|commit| DateTime::parse_from_rfc2822(&commit.author.date).ok());

    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), date| {
        (lo.min(date), hi.max(date))
    }))
}
