//! History source backed by the `git` command line.
//!
//! The exporter and aggregator contracts are defined over delimited
//! `git log` text, so the three history queries shell out to git rather
//! than walking the object database. libgit2 is only used to locate the
//! repository that contains a given path.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ReportError;
use crate::types::Identity;

/// Separator between records in the commit log query. Chosen so it cannot
/// occur in commit content.
pub const RECORD_SEPARATOR: &str = "|||GIT_COMMIT_SEPARATOR|||";

/// Separator between fields within one commit record.
pub const FIELD_SEPARATOR: &str = "|||FIELD|||";

/// Separator between email and name in the identity query.
const IDENTITY_SEPARATOR: &str = "|||";

/// Log format placeholders, one per exported commit field, in record order.
const COMMIT_FORMAT_FIELDS: [&str; 18] = [
    "%H", "%h", "%T", "%t", "%P", "%p", "%D", "%e", "%s", "%f", "%b", "%N",
    "%aN", "%aE", "%aD", "%cN", "%cE", "%cD",
];

/// Path patterns excluded from line statistics by default. Lockfiles and
/// minified assets inflate counts without representing authored work.
pub const DEFAULT_STAT_EXCLUDES: [&str; 4] = [
    "package-lock.json",
    "composer.lock",
    "*.min.js",
    "*.min.css",
];

/// Access to the raw history of one repository.
///
/// Implementations return text in the shapes the consumers parse:
/// delimited commit records for the exporter and interleaved
/// author-marker/numstat lines for the aggregator.
pub trait HistorySource {
    /// Every author identity ever seen, one entry per log line. Duplicate
    /// emails pass through; the resolver applies its last-name-wins rule.
    fn list_identities(&self) -> Result<Vec<Identity>, ReportError>;

    /// Raw field-delimited commit records for all branches, newest first.
    fn list_commits(&self) -> Result<String, ReportError>;

    /// Raw `--numstat` output for non-merge commits: author marker lines
    /// interleaved with tab-separated `added\tdeleted\tfilename` lines.
    fn list_numeric_changes(&self) -> Result<String, ReportError>;
}

/// History source that runs `git log` inside a discovered repository.
pub struct GitLogSource {
    repo_dir: PathBuf,
    stat_excludes: Vec<String>,
}

impl GitLogSource {
    /// Discover the repository containing `path` and prepare a source with
    /// the default line-stat exclusions. Any directory inside the work
    /// tree works, like git itself.
    pub fn discover(path: &Path) -> Result<Self, ReportError> {
        let repo = git2::Repository::discover(path)?;
        let repo_dir = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        Ok(Self {
            repo_dir,
            stat_excludes: DEFAULT_STAT_EXCLUDES
                .iter()
                .map(|pattern| pattern.to_string())
                .collect(),
        })
    }

    /// Directory the git commands run in.
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Add pathspec patterns to exclude from line statistics, on top of
    /// the defaults.
    pub fn add_stat_excludes<I>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.stat_excludes.extend(patterns);
    }

    fn run_git(&self, args: &[String]) -> Result<String, ReportError> {
        let output = Command::new("git")
            .current_dir(&self.repo_dir)
            .args(args)
            .output()?;

        if !output.status.success() {
            return Err(ReportError::Git {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl HistorySource for GitLogSource {
    fn list_identities(&self) -> Result<Vec<Identity>, ReportError> {
        let format = format!("--format=%aE{IDENTITY_SEPARATOR}%aN");
        let out = self.run_git(&["log".into(), "--all".into(), format])?;

        let mut identities = Vec::new();
        for line in out.lines() {
            if let Some((email, name)) = line.split_once(IDENTITY_SEPARATOR) {
                let email = email.trim();
                let name = name.trim();
                if !email.is_empty() && !name.is_empty() {
                    identities.push(Identity::new(email, name));
                }
            }
        }
        Ok(identities)
    }

    fn list_commits(&self) -> Result<String, ReportError> {
        let format = format!(
            "--pretty=format:{}{}",
            COMMIT_FORMAT_FIELDS.join(FIELD_SEPARATOR),
            RECORD_SEPARATOR
        );
        self.run_git(&["log".into(), "--all".into(), format])
    }

    fn list_numeric_changes(&self) -> Result<String, ReportError> {
        let mut args: Vec<String> = vec![
            "log".into(),
            "--all".into(),
            "--format=%aE".into(),
            "--numstat".into(),
            "--no-merges".into(),
            "--".into(),
            ".".into(),
        ];
        args.extend(
            self.stat_excludes
                .iter()
                .map(|pattern| format!(":(exclude){pattern}")),
        );
        self.run_git(&args)
    }
}
