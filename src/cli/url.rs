//! `url` command: print canonical URLs for relative paths.

use anyhow::Result;
use std::io::{self, Write};

use crate::canonical::CanonicalUrlBuilder;

/// Write one URL per path, in argument order.
///
/// Paths are not filtered by `pattern`; the caller asked for them explicitly.
pub fn print_urls(builder: &CanonicalUrlBuilder, paths: &[String], mut out: impl Write) -> Result<()> {
    for path in paths {
        writeln!(out, "{}", builder.url_for(path)?)?;
    }
    Ok(())
}

/// [`print_urls`] to stdout.
pub fn run_url(builder: &CanonicalUrlBuilder, paths: &[String]) -> Result<()> {
    print_urls(builder, paths, io::stdout().lock())
}
