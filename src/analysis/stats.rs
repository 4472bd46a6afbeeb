//! Per-contributor line statistics from `git log --numstat` output.
//!
//! The input stream interleaves author marker lines with tab-separated
//! `added\tdeleted\tfilename` entries. The scan keeps a current-author
//! state and accumulates totals per canonical email.

use std::collections::HashMap;

use crate::analysis::identity::NormalizationMap;
use crate::types::ContributorStats;

/// Change lines with this many added or deleted lines are treated as
/// generated or vendored artifacts and dropped whole.
const LINE_SANITY_LIMIT: u64 = 100_000;

#[derive(Default)]
struct LineTotals {
    added: u64,
    deleted: u64,
}

/// Scan the numstat stream and accumulate added/deleted totals per
/// canonical contributor.
///
/// A line containing `@` and no tab sets the current author and
/// materializes a zero entry on first sight, so a contributor whose
/// commits touch only excluded paths still appears in the report. Change
/// lines before any author line are ignored. A `-` count (binary file)
/// contributes zero; a non-integer count skips just that line. Entries
/// keep first-encounter order and are stably sorted by net lines
/// descending.
pub fn aggregate_line_stats(raw: &str, map: &NormalizationMap) -> Vec<ContributorStats> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, LineTotals> = HashMap::new();
    let mut current_author: Option<String> = None;

    for line in raw.lines() {
        let line = line.trim();

        if line.contains('@') && !line.contains('\t') {
            let author = map.normalize(line).to_string();
            if !totals.contains_key(&author) {
                order.push(author.clone());
                totals.insert(author.clone(), LineTotals::default());
            }
            current_author = Some(author);
            continue;
        }

        let Some(author) = current_author.as_deref() else {
            continue;
        };
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split('\t');
        let (Some(added), Some(deleted)) = (parts.next(), parts.next()) else {
            continue;
        };
        let (Some(added), Some(deleted)) = (parse_count(added), parse_count(deleted)) else {
            continue;
        };

        if added < LINE_SANITY_LIMIT && deleted < LINE_SANITY_LIMIT {
            if let Some(entry) = totals.get_mut(author) {
                entry.added += added;
                entry.deleted += deleted;
            }
        }
    }

    let mut stats: Vec<ContributorStats> = order
        .into_iter()
        .map(|email| {
            let totals = totals.remove(&email).unwrap_or_default();
            ContributorStats {
                email,
                lines_added: totals.added,
                lines_deleted: totals.deleted,
                lines_net: totals.added as i64 - totals.deleted as i64,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.lines_net.cmp(&a.lines_net));
    stats
}

/// Parse one numstat count. `-` marks a binary file and counts as zero.
fn parse_count(field: &str) -> Option<u64> {
    if field == "-" {
        return Some(0);
    }
    field.parse().ok()
}
