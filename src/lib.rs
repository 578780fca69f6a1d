//! Canonical URLs for static site builds.
//!
//! Given the relative paths of a build and a handful of options, assign each
//! selected page one absolute canonical URL in its metadata.
//!
//! ```ignore
//! let builder = CanonicalUrlBuilder::new(CanonicalOptions {
//!     omit_index: true,
//!     ..CanonicalOptions::with_hostname("https://example.com")
//! })?;
//! builder.apply(&mut files)?;
//! // files["docs/index.html"].canonical == Some("https://example.com/docs")
//! ```

pub mod canonical;
pub mod cli;
pub mod config;
pub mod logger;
pub mod page;
pub mod pipeline;

pub use canonical::{ApplyError, ApplyReport, CanonicalUrlBuilder};
pub use config::{CanonicalOptions, ConfigError, Patterns};
pub use page::{FileMeta, FileRegistry};
pub use pipeline::{BuildContext, Plugin};
