use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod aggregator;
mod config;
mod git;
mod github;

use aggregator::{ChangelogGenerator, ChangelogWriter, ReleaseAggregator, ReleaseNotes};
use config::Config;
use git::CommitRange;
use github::GitHubClient;

#[derive(Parser)]
#[command(name = "changelog-updater")]
#[command(about = "Update CHANGELOG.md with the pull requests merged since the previous release branch")]
struct Cli {
    /// Previous release branch to compare to, e.g. branch-0.8
    #[arg(long)]
    prev_branch: String,

    /// Current release (candidate) branch to compare to, e.g. branch-0.9
    #[arg(long, default_value = "master")]
    curr_branch: String,

    /// Version being released
    #[arg(long)]
    release_version: String,

    /// GitHub token (can also be set via GITHUB_TOKEN env var)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// TOML file overriding repository, bot account and changelog settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Changelog file to update (defaults to the configured path)
    #[arg(long)]
    changelog: Option<PathBuf>,

    /// Handlebars template used instead of the built-in one
    #[arg(long)]
    template: Option<PathBuf>,

    /// Print the new entry instead of writing it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is reserved for --dry-run output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse()).await
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.github.token = cli.token;
    if let Some(path) = cli.changelog {
        config.changelog.path = path;
    }

    let generator = ChangelogGenerator::new(cli.template.as_deref())?;

    let range = CommitRange::new(&config.git.remote, &cli.prev_branch, &cli.curr_branch);
    info!("Collecting commits in {}", range.revision());
    let subjects = range.subjects()?;

    let today = chrono::Local::now().date_naive();
    update_changelog(
        &config,
        &generator,
        &subjects,
        &cli.release_version,
        today,
        cli.dry_run,
    )
    .await
}

/// Nothing is written unless every referenced PR was fetched and categorized.
async fn update_changelog(
    config: &Config,
    generator: &ChangelogGenerator,
    subjects: &[String],
    version: &str,
    date: NaiveDate,
    dry_run: bool,
) -> Result<()> {
    let client = GitHubClient::new(&config.github).await?;
    let aggregator = ReleaseAggregator::new(client, &config.github, &config.changelog.label_prefix);
    let categorized = aggregator.aggregate(subjects).await?;

    let entry = generator.generate(&ReleaseNotes {
        project: &config.changelog.project_name,
        version,
        date,
        categorized: &categorized,
    })?;

    let writer = ChangelogWriter::new(&config.changelog.path, &config.changelog.header);
    if dry_run {
        info!("Dry run, leaving {} untouched", writer.path().display());
        println!("{}", entry);
    } else {
        writer.prepend(&entry)?;
    }

    Ok(())
}
