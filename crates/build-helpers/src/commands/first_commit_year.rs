//! First-commit-year command: report the year of the root commit.

use anyhow::Context;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use build_helpers_core::commit_year;
use build_helpers_core::config::Config;
use build_helpers_core::exec::ShellExecutor;

/// Arguments for the `first-commit-year` subcommand.
#[derive(Args, Debug, Default)]
pub struct FirstCommitYearArgs {
    /// Fail instead of printing 0 when the year cannot be determined
    #[arg(long)]
    pub strict: bool,
}

#[derive(Serialize)]
struct YearReport {
    year: u32,
}

/// Ask git for the first commit year and print it.
///
/// Prints `0` when the year is unknown and the policy is tolerant.
#[instrument(name = "cmd_first_commit_year", skip_all, fields(json_output))]
pub fn cmd_first_commit_year(
    args: FirstCommitYearArgs,
    global_json: bool,
    config: &Config,
    cwd: &camino::Utf8Path,
) -> anyhow::Result<()> {
    let policy = super::fault_tolerance(args.strict, config);
    debug!(json_output = global_json, ?policy, "executing first-commit-year command");

    let executor = ShellExecutor::new().in_dir(cwd);
    let year = commit_year::first_commit_year(&executor, policy)
        .context("failed to determine first commit year")?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&YearReport { year })?);
    } else if year == 0 {
        println!("{}", year.yellow());
    } else {
        println!("{year}");
    }

    Ok(())
}
