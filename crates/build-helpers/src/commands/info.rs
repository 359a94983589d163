//! Info command: show package, config, and resolved banner settings.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use build_helpers_core::config::{self, Config};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
}

impl ConfigInfo {
    fn from_config(config: &Config, cwd: &camino::Utf8Path) -> Self {
        Self {
            config_file: config::find_project_config(cwd).map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
        }
    }
}

/// Banner settings after config is applied (before any CLI flags).
#[derive(Serialize)]
struct BannerSettings {
    package_file: String,
    npm: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_commit_year: Option<u32>,
    fault_tolerant: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_file: Option<String>,
}

impl BannerSettings {
    fn from_config(config: &Config, cwd: &camino::Utf8Path) -> Self {
        Self {
            package_file: super::package_path(None, config, cwd).to_string(),
            npm: config.is_npm(),
            first_commit_year: config.first_commit_year(),
            fault_tolerant: config.fault_tolerance().is_tolerant(),
            output_file: config.output_file().map(str::to_string),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
    banner: BannerSettings,
}

/// Print package information.
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `cwd` - Current working directory for config discovery
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    cwd: &camino::Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, cwd),
        banner: BannerSettings::from_config(config, cwd),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    println!(
        "{} {}",
        full_info.package.name.bold(),
        full_info.package.version.green()
    );
    if !full_info.package.description.is_empty() {
        println!("{}", full_info.package.description);
    }
    if !full_info.package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), full_info.package.license);
    }

    println!();
    println!("{}", "Configuration".bold().underline());
    if let Some(ref path) = full_info.config.config_file {
        println!("{}: {}", "Config file".dimmed(), path.cyan());
    } else {
        println!("{}: {}", "Config file".dimmed(), "none loaded".yellow());
    }
    println!("{}: {}", "Log level".dimmed(), full_info.config.log_level);
    if let Some(ref dir) = full_info.config.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }

    println!();
    println!("{}", "Banner".bold().underline());
    let banner = &full_info.banner;
    println!("{}: {}", "Package file".dimmed(), banner.package_file.cyan());
    println!("{}: {}", "npm link".dimmed(), banner.npm);
    match banner.first_commit_year {
        Some(year) => println!("{}: {} (pinned)", "First commit year".dimmed(), year),
        None => println!("{}: {}", "First commit year".dimmed(), "from git".cyan()),
    }
    let policy = if banner.fault_tolerant {
        "tolerant".green().to_string()
    } else {
        "strict".yellow().to_string()
    };
    println!("{}: {}", "History failures".dimmed(), policy);
    if let Some(ref file) = banner.output_file {
        println!("{}: {}", "Bundle output".dimmed(), file.cyan());
    }

    Ok(())
}
