//! Common utilities shared across CLI commands.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::canonical::CanonicalUrlBuilder;
use crate::config::{CanonicalOptions, DEFAULT_CONFIG_FILE};
use crate::debug;

use super::Cli;

/// Load config file, apply CLI overrides, and validate.
///
/// An explicit `--config` must exist; the default `canonical.toml` may not.
pub fn load_builder(cli: &Cli) -> Result<CanonicalUrlBuilder> {
    let (path, required) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let mut options = CanonicalOptions::load(&path, required)
        .with_context(|| format!("failed to load `{}`", path.display()))?;
    options.apply_args(cli.options());
    debug!("config"; "{:?}", options);

    Ok(CanonicalUrlBuilder::new(options)?)
}
