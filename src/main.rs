//! Command-line entry point for gitreport.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use gitreport::analysis::{GitLogSource, NormalizationMap};
use gitreport::report;

#[derive(Parser, Debug)]
#[command(
    name = "gitreport",
    about = "Export commit history and per-contributor line statistics as JSON",
    version,
    long_about = "Analyzes the full history of a git repository and writes JSON \
                  reports for downstream dashboards. Contributors who committed \
                  under several email addresses are merged automatically by name \
                  similarity."
)]
struct Args {
    /// Path to the repository; any directory inside the work tree works.
    #[arg(short = 'C', long = "repo", default_value = ".", value_name = "PATH")]
    repo: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export every commit with normalized author and committer emails
    Commits {
        /// Output file
        #[arg(long, default_value = "output.json")]
        output: PathBuf,
    },
    /// Aggregate lines added/deleted per contributor
    Lines {
        /// Output file
        #[arg(long, default_value = "stats-lines.json")]
        output: PathBuf,

        /// Extra pathspec patterns to exclude from the counts
        #[arg(long = "exclude", value_name = "PATTERN")]
        excludes: Vec<String>,
    },
    /// Generate both reports off a single identity resolution
    All {
        /// Commit export output file
        #[arg(long, default_value = "output.json")]
        commits_output: PathBuf,

        /// Line statistics output file
        #[arg(long, default_value = "stats-lines.json")]
        lines_output: PathBuf,

        /// Extra pathspec patterns to exclude from the counts
        #[arg(long = "exclude", value_name = "PATTERN")]
        excludes: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut source = GitLogSource::discover(&args.repo)
        .with_context(|| format!("no git repository found at {}", args.repo.display()))?;

    match args.command {
        Command::Commits { output } => {
            let map = build_identity_map(&source);
            export_commits(&source, &map, &output)?;
        }
        Command::Lines { output, excludes } => {
            source.add_stat_excludes(excludes);
            let map = build_identity_map(&source);
            export_line_stats(&source, &map, &output)?;
        }
        Command::All {
            commits_output,
            lines_output,
            excludes,
        } => {
            source.add_stat_excludes(excludes);
            let map = build_identity_map(&source);
            export_commits(&source, &map, &commits_output)?;
            export_line_stats(&source, &map, &lines_output)?;
        }
    }

    Ok(())
}

/// Build the contributor identity map, reporting merged emails on stderr.
fn build_identity_map(source: &GitLogSource) -> NormalizationMap {
    let spinner = spinner("Resolving contributor identities...");
    let map = NormalizationMap::from_source(source);
    spinner.finish_and_clear();
    report::print_normalization_summary(&map);
    map
}

fn export_commits(
    source: &GitLogSource,
    map: &NormalizationMap,
    output: &Path,
) -> anyhow::Result<()> {
    let spinner = spinner("Exporting commit history...");
    let result = report::commit_report(source, map);
    spinner.finish_and_clear();

    let commits = result.context("commit export failed")?;
    report::write_json(output, &commits)
        .with_context(|| format!("could not write {}", output.display()))?;
    report::print_commit_summary(output, &commits);
    Ok(())
}

fn export_line_stats(
    source: &GitLogSource,
    map: &NormalizationMap,
    output: &Path,
) -> anyhow::Result<()> {
    let spinner = spinner("Aggregating line statistics...");
    let result = report::line_stats_report(source, map);
    spinner.finish_and_clear();

    let stats = result.context("line statistics failed")?;
    report::write_json(output, &stats)
        .with_context(|| format!("could not write {}", output.display()))?;
    report::print_line_stats_summary(output, &stats);
    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg}").unwrap());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(message.to_string());
    pb
}
