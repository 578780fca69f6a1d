//! Canonical URL assignment for build files.
//!
//! # Module Structure
//!
//! ```text
//! canonical/
//! ├── select   # Selector: multi-pattern glob over registry paths
//! ├── url      # build_url: path → absolute canonical URL
//! └── mod.rs   # CanonicalUrlBuilder (this file)
//! ```
//!
//! Options are checked once in [`CanonicalUrlBuilder::new`]; the hostname is
//! only required when [`CanonicalUrlBuilder::apply`] runs, so a builder can
//! exist before the deployment host is known.

pub mod select;
pub mod url;

pub use select::Selector;
pub use url::build_url;

use rayon::prelude::*;
use thiserror::Error;

use crate::config::{CanonicalOptions, ConfigError};
use crate::page::FileRegistry;
use crate::pipeline::{BuildContext, Plugin};
use crate::{debug, log};

/// Failure while applying canonical URLs to a registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    #[error("canonical url builder requires the `hostname` option to be set")]
    MissingHostname,
}

/// Outcome of one [`CanonicalUrlBuilder::apply`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Files selected by the pattern.
    pub matched: usize,
    /// Selected files that received a new canonical URL.
    pub written: usize,
    /// Selected files whose existing canonical URL was left alone.
    pub kept: usize,
}

/// Assigns `canonical` to every selected file that lacks one.
#[derive(Debug, Clone)]
pub struct CanonicalUrlBuilder {
    options: CanonicalOptions,
    selector: Selector,
}

impl CanonicalUrlBuilder {
    /// Validate `options` and compile the file pattern.
    pub fn new(options: CanonicalOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let selector = Selector::new(options.pattern.as_slice());
        Ok(Self { options, selector })
    }

    pub fn options(&self) -> &CanonicalOptions {
        &self.options
    }

    /// Canonical URL for a single relative path.
    pub fn url_for(&self, path: &str) -> Result<String, ApplyError> {
        let hostname = self.hostname()?;
        Ok(build_url(path, hostname, &self.options))
    }

    /// Fill in `canonical` for every selected file that has none.
    ///
    /// Fails before touching any record when no hostname is configured.
    /// Existing values are never replaced, so repeated runs are no-ops.
    pub fn apply(&self, files: &mut FileRegistry) -> Result<ApplyReport, ApplyError> {
        let hostname = self.hostname()?;
        let options = &self.options;
        let selector = &self.selector;

        let (matched, written) = files
            .par_iter_mut()
            .filter(|(path, _)| selector.is_match(path))
            .map(|(path, meta)| {
                if meta.has_canonical() {
                    return (1, 0);
                }
                let url = build_url(path, hostname, options);
                debug!("canonical"; "{} -> {}", path, url);
                meta.canonical = Some(url);
                (1, 1)
            })
            .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

        let report = ApplyReport {
            matched,
            written,
            kept: matched - written,
        };
        log!(
            "canonical";
            "{} matched, {} written, {} kept",
            file_count(report.matched),
            report.written,
            report.kept
        );
        Ok(report)
    }

    fn hostname(&self) -> Result<&str, ApplyError> {
        self.options.hostname().ok_or(ApplyError::MissingHostname)
    }
}

/// `1 file`, `3 files`.
fn file_count(n: usize) -> String {
    format!("{n} file{}", if n == 1 { "" } else { "s" })
}

impl Plugin for CanonicalUrlBuilder {
    fn name(&self) -> &'static str {
        "canonical"
    }

    fn run(&self, files: &mut FileRegistry, _ctx: &BuildContext) -> anyhow::Result<()> {
        self.apply(files)?;
        Ok(())
    }
}
