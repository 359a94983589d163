//! Banner command: render the license banner for the package.

use clap::Args;
use tracing::{debug, instrument};

use build_helpers_core::config::Config;

use super::BannerOptions;

/// Arguments for the `banner` subcommand.
#[derive(Args, Debug, Default)]
pub struct BannerArgs {
    /// Banner options.
    #[command(flatten)]
    pub options: BannerOptions,
}

/// Print the banner for the package in `cwd`.
///
/// Plain output is the banner exactly as it should be prepended to a bundle.
#[instrument(name = "cmd_banner", skip_all, fields(json_output))]
pub fn cmd_banner(
    args: BannerArgs,
    global_json: bool,
    config: &Config,
    cwd: &camino::Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing banner command");

    let rendered = super::render_banner(&args.options, config, cwd)?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        println!("{}", rendered.banner);
    }

    Ok(())
}
