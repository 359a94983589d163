//! Bundle-config command: resolve year, render banner, emit bundler config.

use anyhow::Context;
use clap::Args;
use tracing::{debug, instrument};

use build_helpers_core::bundle;
use build_helpers_core::config::Config;

use super::BannerOptions;

/// Arguments for the `bundle-config` subcommand.
#[derive(Args, Debug, Default)]
pub struct BundleConfigArgs {
    /// File the bundler writes (default: `bundle.output_file` from config)
    #[arg(value_name = "OUTPUT_FILE")]
    pub output_file: Option<String>,

    /// Leave the banner out of the config
    #[arg(long, conflicts_with_all = ["package", "npm", "first_commit_year", "no_history", "strict"])]
    pub no_banner: bool,

    /// Banner options.
    #[command(flatten)]
    pub options: BannerOptions,
}

/// Print the bundler config as JSON.
///
/// The config is always JSON, so the global `--json` flag changes nothing here.
#[instrument(name = "cmd_bundle_config", skip_all)]
pub fn cmd_bundle_config(
    args: BundleConfigArgs,
    config: &Config,
    cwd: &camino::Utf8Path,
) -> anyhow::Result<()> {
    let output_file = args
        .output_file
        .as_deref()
        .or_else(|| config.output_file())
        .context("no output file given (pass OUTPUT_FILE or set bundle.output_file)")?;
    debug!(%output_file, no_banner = args.no_banner, "executing bundle-config command");

    let banner = if args.no_banner {
        String::new()
    } else {
        super::render_banner(&args.options, config, cwd)?.banner
    };

    let bundle_config = bundle::build_config(output_file, &banner)?;
    println!("{}", serde_json::to_string_pretty(&bundle_config)?);

    Ok(())
}
