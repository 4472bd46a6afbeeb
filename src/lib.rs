//! # Git History Report Library
//!
//! `gitreport` analyzes the full commit history of a Git repository and
//! produces two reports: a structured export of every commit's metadata and
//! an aggregate of lines added/deleted per contributor.
//!
//! The hard part is contributor identity resolution. People commit under
//! several email addresses over the life of a project (work and personal
//! accounts, provider-generated noreply addresses), so observed
//! (email, name) pairs are clustered by name similarity and collapsed onto
//! one canonical email per contributor. Both reports rewrite emails through
//! the resulting map, which is rebuilt from history on every run.
//!
//! ## Features
//!
//! - Export commit metadata for all branches as JSON
//! - Aggregate per-contributor line statistics from non-merge commits
//! - Merge duplicate contributor emails automatically
//! - Exclude lockfiles and minified assets from line counts
//! - Atomic report writing, no partial files on failure
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use gitreport::analysis::{GitLogSource, NormalizationMap};
//! use gitreport::report;
//!
//! # fn main() -> Result<(), gitreport::ReportError> {
//! let source = GitLogSource::discover(Path::new("."))?;
//! let map = NormalizationMap::from_source(&source);
//!
//! let commits = report::commit_report(&source, &map)?;
//! report::write_json(Path::new("output.json"), &commits)?;
//!
//! let stats = report::line_stats_report(&source, &map)?;
//! report::write_json(Path::new("stats-lines.json"), &stats)?;
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod error;
pub mod report;
pub mod types;

// Re-export main types for convenience
pub use error::ReportError;
pub use types::{CommitRecord, CommitSignature, ContributorStats, Identity};
