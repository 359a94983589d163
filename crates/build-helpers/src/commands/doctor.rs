//! Doctor command: diagnose configuration and environment.

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::Confirm;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use build_helpers_core::banner::PackageMetadata;
use build_helpers_core::config::{self, Config};
use build_helpers_core::git;

/// Arguments for the `doctor` subcommand.
#[derive(Args, Debug, Default)]
pub struct DoctorArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct DoctorReport {
    directories: DirectoryPaths,
    config: ConfigStatus,
    environment: EnvironmentInfo,
    checks: Vec<Check>,
}

#[derive(Serialize)]
struct DirectoryPaths {
    config: Option<String>,
    cache: Option<String>,
    data: Option<String>,
    data_local: Option<String>,
}

#[derive(Serialize)]
struct ConfigStatus {
    /// Path to loaded config file, if any
    file: Option<String>,
    /// Whether a config file was found
    found: bool,
}

#[derive(Serialize)]
struct EnvironmentInfo {
    /// Current working directory
    cwd: Option<String>,
    /// Relevant environment variables
    env_vars: Vec<EnvVar>,
}

#[derive(Serialize)]
struct EnvVar {
    name: &'static str,
    value: Option<String>,
    description: &'static str,
}

/// Outcome of a single diagnostic probe.
#[derive(Debug, Serialize)]
struct Check {
    name: &'static str,
    passed: bool,
    message: String,
}

impl Check {
    fn pass(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            message: message.into(),
        }
    }

    fn fail(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            message: message.into(),
        }
    }
}

fn env_var(name: &'static str, description: &'static str) -> EnvVar {
    EnvVar {
        name,
        value: std::env::var(name).ok(),
        description,
    }
}

impl DoctorReport {
    fn gather(config: &Config, cwd: &camino::Utf8Path) -> Self {
        let config_file = config::find_project_config(cwd);

        Self {
            directories: DirectoryPaths {
                config: config::user_config_dir().map(|p| p.to_string()),
                cache: config::user_cache_dir().map(|p| p.to_string()),
                data: config::user_data_dir().map(|p| p.to_string()),
                data_local: config::user_data_local_dir().map(|p| p.to_string()),
            },
            config: ConfigStatus {
                found: config_file.is_some(),
                file: config_file.map(|p| p.to_string()),
            },
            environment: EnvironmentInfo {
                cwd: Some(cwd.to_string()),
                env_vars: vec![
                    env_var("XDG_CONFIG_HOME", "Override config directory"),
                    env_var("XDG_CACHE_HOME", "Override cache directory"),
                    env_var("XDG_DATA_HOME", "Override data directory"),
                    env_var("RUST_LOG", "Log filter directive"),
                    env_var("BUILD_HELPERS_LOG_PATH", "Explicit log file path"),
                    env_var("BUILD_HELPERS_LOG_DIR", "Log directory"),
                ],
            },
            checks: run_checks(config, cwd),
        }
    }

    fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }
}

/// Probe the things the first commit year and banner depend on.
fn run_checks(config: &Config, cwd: &camino::Utf8Path) -> Vec<Check> {
    let mut checks = Vec::new();

    let git_found = match git::git_binary() {
        Some(path) => {
            checks.push(Check::pass("git", format!("found at {}", path.display())));
            true
        }
        None => {
            checks.push(Check::fail("git", "git not found on PATH"));
            false
        }
    };

    if git_found {
        match git::is_inside_repo() {
            Ok(true) => {
                checks.push(Check::pass("repository", "inside a git work tree"));
                checks.push(match git::is_shallow() {
                    Ok(false) => Check::pass("history", "full history available"),
                    Ok(true) => Check::fail(
                        "history",
                        "shallow clone; first commit year reflects the clone depth",
                    ),
                    Err(e) => Check::fail("history", e.to_string()),
                });
            }
            Ok(false) => checks.push(Check::fail(
                "repository",
                "not a git repository; first commit year will be 0",
            )),
            Err(e) => checks.push(Check::fail("repository", e.to_string())),
        }
    }

    let package = super::package_path(None, config, cwd);
    match std::fs::read_to_string(&package) {
        Ok(contents) => match PackageMetadata::from_json(&contents) {
            Ok(meta) => {
                checks.push(Check::pass(
                    "package",
                    format!("{package}: {} {}", meta.name, meta.version),
                ));
                checks.push(if meta.semver().is_some() {
                    Check::pass("version", format!("{} is valid semver", meta.version))
                } else {
                    Check::fail("version", format!("{} is not valid semver", meta.version))
                });
            }
            Err(e) => checks.push(Check::fail("package", format!("{package}: {e}"))),
        },
        Err(e) => checks.push(Check::fail("package", format!("{package}: {e}"))),
    }

    checks
}

/// Run diagnostics and report configuration status.
///
/// Failed checks are reported, not returned as errors.
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `cwd` - Current working directory
#[instrument(name = "cmd_doctor", skip_all, fields(json_output))]
pub fn cmd_doctor(
    _args: DoctorArgs,
    global_json: bool,
    config: &Config,
    cwd: &camino::Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing doctor command");

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Gathering diagnostics...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let report = DoctorReport::gather(config, cwd);
    spinner.finish_and_clear();

    debug!(passed = report.all_passed(), "diagnostics gathered");

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Checks".bold().underline());
    for check in &report.checks {
        if check.passed {
            println!("  {} {}: {}", "✓".green(), check.name, check.message.dimmed());
        } else {
            println!("  {} {}: {}", "✗".red(), check.name, check.message.yellow());
        }
    }
    println!();

    println!("{}", "Configuration".bold().underline());
    if report.config.found {
        println!(
            "  {} Config file: {}",
            "✓".green(),
            report.config.file.as_deref().unwrap_or("").cyan()
        );
    } else {
        println!("  {} No config file found", "○".yellow());
        offer_config_creation()?;
    }
    println!();

    println!("{}", "Directories".bold().underline());
    print_dir("  Config", report.directories.config.as_deref());
    print_dir("  Cache", report.directories.cache.as_deref());
    print_dir("  Data", report.directories.data.as_deref());
    print_dir("  Data (local)", report.directories.data_local.as_deref());
    println!();

    println!("{}", "Environment".bold().underline());
    println!("  {}: {}", "Working directory".dimmed(), cwd.cyan());

    let set_vars: Vec<_> = report
        .environment
        .env_vars
        .iter()
        .filter(|v| v.value.is_some())
        .collect();

    if set_vars.is_empty() {
        println!("  {} No XDG/logging overrides set", "○".dimmed());
    } else {
        for var in set_vars {
            println!(
                "  {}: {} ({})",
                var.name.dimmed(),
                var.value.as_deref().unwrap_or("").cyan(),
                var.description
            );
        }
    }

    Ok(())
}

fn print_dir(label: &str, path: Option<&str>) {
    print!("{}: ", label.dimmed());
    match path {
        Some(p) => println!("{}", p.cyan()),
        None => println!("{}", "(unavailable)".yellow()),
    }
}

/// Offer to create a default config file when none exists.
fn offer_config_creation() -> anyhow::Result<()> {
    let Some(config_dir) = config::user_config_dir() else {
        return Ok(());
    };

    let config_path = config_dir.join("config.yaml");

    // Don't prompt if running non-interactively
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Ok(());
    }

    let create = Confirm::new("Create a default config file?")
        .with_default(false)
        .with_help_message(&format!("Will create {config_path}"))
        .prompt();

    // Declined or interrupted: nothing to do.
    if let Ok(true) = create {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_saphyr::to_string(&Config::default())?;
        std::fs::write(&config_path, yaml)?;

        println!("  {} Created {}", "✓".green(), config_path.cyan());
    }

    Ok(())
}
