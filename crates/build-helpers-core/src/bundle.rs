//! Bundler configuration for a simple ES-module library.
//!
//! [`build_config`] produces the object a Rollup-style bundler expects:
//! one entry point, one output file, ES module format, and an optional
//! banner prepended to the output.

use serde::Serialize;
use thiserror::Error;

/// Entry point every generated config builds from.
pub const DEFAULT_INPUT: &str = "src/index.js";

/// Errors from building a bundle config.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BundleError {
    /// An argument was rejected.
    #[error("{argument} {reason}")]
    InvalidArgument {
        /// Which argument.
        argument: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },
}

/// Result alias for bundle config operations.
pub type BundleResult<T> = Result<T, BundleError>;

/// Output module format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ES module output.
    #[default]
    Es,
}

/// Where and how the bundle is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputOptions {
    /// Text placed at the top of the output file. Omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    /// Output file path.
    pub file: String,
    /// Module format.
    pub format: OutputFormat,
}

/// A complete bundler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleConfig {
    /// Entry point.
    pub input: String,
    /// Output settings.
    pub output: OutputOptions,
}

/// Build a config that bundles [`DEFAULT_INPUT`] into `output_file`.
///
/// An empty `banner` is left out of the config entirely.
///
/// # Errors
///
/// Returns [`BundleError::InvalidArgument`] if `output_file` is empty.
pub fn build_config(output_file: &str, banner: &str) -> BundleResult<BundleConfig> {
    if output_file.is_empty() {
        return Err(BundleError::InvalidArgument {
            argument: "output file",
            reason: "is an empty string",
        });
    }

    Ok(BundleConfig {
        input: DEFAULT_INPUT.to_string(),
        output: OutputOptions {
            banner: (!banner.is_empty()).then(|| banner.to_string()),
            file: output_file.to_string(),
            format: OutputFormat::Es,
        },
    })
}
