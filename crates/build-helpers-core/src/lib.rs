//! Core library for build-helpers.
//!
//! Helpers for the tail end of a JavaScript library build: the license
//! banner at the top of the bundle, the copyright start year taken from git
//! history, and the bundler config that ties them together.
//!
//! # Modules
//!
//! - [`banner`] - Banner generation from `package.json` metadata
//! - [`bundle`] - Bundler configuration object
//! - [`commit_year`] - First commit year discovery
//! - [`config`] - Configuration loading and management
//! - [`error`] - Configuration error types and result aliases
//! - [`exec`] - Command execution seam and the shell-backed executor
//! - [`git`] - Git environment probes for diagnostics
//!
//! # Quick Start
//!
//! ```no_run
//! use build_helpers_core::banner::generate_banner;
//! use build_helpers_core::bundle::build_config;
//! use build_helpers_core::commit_year::{FaultTolerance, first_commit_year};
//! use build_helpers_core::exec::ShellExecutor;
//!
//! let package_json = std::fs::read_to_string("package.json").unwrap();
//! let year = first_commit_year(&ShellExecutor::new(), FaultTolerance::Tolerant).unwrap();
//! let banner = generate_banner(chrono::Utc::now(), &package_json, year, true).unwrap();
//! let config = build_config("my-lib.js", &banner).unwrap();
//!
//! println!("{}", serde_json::to_string_pretty(&config).unwrap());
//! ```
#![deny(unsafe_code)]

pub mod banner;

pub mod bundle;

pub mod commit_year;

pub mod config;

pub mod error;

pub mod exec;

pub mod git;

pub use banner::{BannerError, BannerRequest, PackageMetadata, generate_banner};

pub use bundle::{BundleConfig, BundleError, build_config};

pub use commit_year::{CommitYearError, FaultTolerance, first_commit_year};

pub use config::{Config, ConfigLoader, LogLevel};

pub use error::{ConfigError, ConfigResult};

pub use exec::{CommandExecutor, ExecError, ShellExecutor};

// Re-export chrono so callers can build `now` without a direct dependency.
pub use chrono;
