//! Command implementations

pub mod banner;

pub mod bundle_config;

pub mod doctor;

pub mod first_commit_year;

pub mod info;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use serde::Serialize;
use tracing::{debug, instrument};

use build_helpers_core::banner::BannerRequest;
use build_helpers_core::commit_year::{self, FaultTolerance};
use build_helpers_core::config::Config;
use build_helpers_core::exec::ShellExecutor;

/// Banner flags shared by `banner` and `bundle-config`.
#[derive(Args, Debug, Default, Clone)]
pub struct BannerOptions {
    /// Package metadata file (default: package.json)
    #[arg(long, value_name = "FILE")]
    pub package: Option<String>,

    /// Prefix the package name with its npmjs.com URL
    #[arg(long)]
    pub npm: bool,

    /// Use this first commit year instead of asking git
    #[arg(long, value_name = "YEAR", conflicts_with = "no_history")]
    pub first_commit_year: Option<u32>,

    /// Skip git history and show only the current year
    #[arg(long)]
    pub no_history: bool,

    /// Fail if the first commit year cannot be determined
    #[arg(long)]
    pub strict: bool,
}

/// A rendered banner plus the inputs that shaped it.
#[derive(Debug, Serialize)]
pub struct RenderedBanner {
    /// The banner text.
    pub banner: String,
    /// First commit year used for the copyright range (`0` = none).
    pub first_commit_year: u32,
    /// Package file the metadata came from.
    pub package: Utf8PathBuf,
}

/// Pick the failure policy: `--strict` wins, then config, then tolerant.
pub fn fault_tolerance(strict: bool, config: &Config) -> FaultTolerance {
    if strict {
        FaultTolerance::Strict
    } else {
        config.fault_tolerance()
    }
}

/// Resolve the package file path against `cwd`.
pub fn package_path(flag: Option<&str>, config: &Config, cwd: &Utf8Path) -> Utf8PathBuf {
    let path = flag.map_or_else(|| config.package_file(), Utf8PathBuf::from);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

/// Work out the first commit year from flags, config, or git history.
///
/// `--no-history` gives `0`; an explicit year (flag, then config) is used
/// as-is; otherwise git is asked under the chosen failure policy.
#[instrument(skip_all)]
pub fn resolve_year(
    options: &BannerOptions,
    config: &Config,
    cwd: &Utf8Path,
) -> anyhow::Result<u32> {
    if options.no_history {
        debug!("history lookup disabled");
        return Ok(0);
    }

    if let Some(year) = options.first_commit_year.or_else(|| config.first_commit_year()) {
        debug!(year, "using pinned first commit year");
        return Ok(year);
    }

    let policy = fault_tolerance(options.strict, config);
    let executor = ShellExecutor::new().in_dir(cwd);
    commit_year::first_commit_year(&executor, policy)
        .context("failed to determine first commit year")
}

/// Read the package file and render its banner.
#[instrument(skip_all)]
pub fn render_banner(
    options: &BannerOptions,
    config: &Config,
    cwd: &Utf8Path,
) -> anyhow::Result<RenderedBanner> {
    let package = package_path(options.package.as_deref(), config, cwd);
    let package_json = std::fs::read_to_string(&package)
        .with_context(|| format!("failed to read {package}"))?;

    let first_commit_year = resolve_year(options, config, cwd)?;
    let is_npm = options.npm || config.is_npm();

    let banner = BannerRequest::new(chrono::Utc::now(), &package_json)
        .with_first_commit_year(first_commit_year)
        .npm(is_npm)
        .generate()
        .with_context(|| format!("invalid package metadata in {package}"))?;

    Ok(RenderedBanner {
        banner,
        first_commit_year,
        package,
    })
}
