//! tola-canonical - canonical URLs for static site builds.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tola_canonical::cli::{self, Cli, Commands, apply::Destination};
use tola_canonical::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let builder = cli::common::load_builder(&cli)?;

    match &cli.command {
        Commands::Apply {
            registry,
            output,
            in_place,
            ..
        } => {
            let destination = Destination::resolve(registry, output.as_deref(), *in_place)?;
            cli::apply::run_apply(&builder, registry, &destination).map(|_| ())
        }
        Commands::Url { paths, .. } => cli::url::run_url(&builder, paths),
    }
}
