pub mod export;
pub mod git;
pub mod identity;
pub mod stats;

pub use export::parse_commits;
pub use git::{GitLogSource, HistorySource};
pub use identity::{resolve_identities, NormalizationMap};
pub use stats::aggregate_line_stats;
