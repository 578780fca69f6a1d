//! Canonical URL options and `canonical.toml` loading.
//!
//! # Fields
//!
//! | Key                     | Type                 | Default        |
//! |-------------------------|----------------------|----------------|
//! | `hostname`              | `String`             | unset          |
//! | `pattern`               | `String \| [String]` | `"**/*.html"`  |
//! | `omit_index`            | `bool`               | `false`        |
//! | `omit_trailing_slashes` | `bool`               | `true`         |
//! | `omit_extensions`       | `[String]`           | unset          |
//!
//! `hostname` may stay unset here; only [`apply`] requires it.
//!
//! [`apply`]: crate::canonical::CanonicalUrlBuilder::apply

mod error;

pub use error::ConfigError;

use crate::{cli::CanonicalArgs, debug, log};
use serde::{Deserialize, Serialize, Serializer};
use std::{fs, path::Path};

/// Glob used when no `pattern` is configured.
pub const DEFAULT_PATTERN: &str = "**/*.html";

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "canonical.toml";

// ============================================================================
// Patterns
// ============================================================================

/// Ordered glob list; a single string in TOML is a one-element list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "PatternsRepr")]
pub struct Patterns(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum PatternsRepr {
    One(String),
    Many(Vec<String>),
}

impl From<PatternsRepr> for Patterns {
    fn from(repr: PatternsRepr) -> Self {
        match repr {
            PatternsRepr::One(pattern) => Self(vec![pattern]),
            PatternsRepr::Many(patterns) => Self(patterns),
        }
    }
}

impl Patterns {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(patterns.into_iter().map(Into::into).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self(vec![DEFAULT_PATTERN.to_string()])
    }
}

impl Serialize for Patterns {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0.as_slice() {
            [single] => single.serialize(serializer),
            many => many.serialize(serializer),
        }
    }
}

// ============================================================================
// CanonicalOptions
// ============================================================================

/// Options for building canonical URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalOptions {
    /// Absolute base URL, scheme included (e.g. `https://example.com/blog`).
    pub hostname: Option<String>,
    /// Globs selecting which registry paths receive a canonical URL.
    pub pattern: Patterns,
    /// Drop a trailing `index.html` from the path.
    #[serde(alias = "omitIndex")]
    pub omit_index: bool,
    /// Strip every trailing `/` from the final URL.
    #[serde(alias = "omitTrailingSlashes")]
    pub omit_trailing_slashes: bool,
    /// Extensions to strip; each entry must start with `.`.
    #[serde(alias = "omitExtensions", skip_serializing_if = "Option::is_none")]
    pub omit_extensions: Option<Vec<String>>,
}

impl Default for CanonicalOptions {
    fn default() -> Self {
        Self {
            hostname: None,
            pattern: Patterns::default(),
            omit_index: false,
            omit_trailing_slashes: true,
            omit_extensions: None,
        }
    }
}

impl CanonicalOptions {
    /// Options with only `hostname` set.
    pub fn with_hostname(hostname: impl Into<String>) -> Self {
        Self {
            hostname: Some(hostname.into()),
            ..Self::default()
        }
    }

    /// Configured hostname, treating an empty string as unset.
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref().filter(|host| !host.is_empty())
    }

    /// Extensions to strip, empty when none are configured.
    pub fn omit_extensions(&self) -> &[String] {
        self.omit_extensions.as_deref().unwrap_or_default()
    }

    /// Check the extension list, reporting every entry without a leading dot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let malformed: Vec<String> = self
            .omit_extensions()
            .iter()
            .filter(|ext| !ext.starts_with('.'))
            .cloned()
            .collect();

        if malformed.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MalformedExtensions(malformed))
        }
    }

    // ========================================================================
    // loading
    // ========================================================================

    /// Load options from `path`.
    ///
    /// A missing file yields defaults unless `required` is set; this lets the
    /// CLI run from flags alone when the default config name is absent.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        if !required && !path.exists() {
            debug!("config"; "{} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_path(path)
    }

    /// Load options from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (options, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(options)
    }

    /// Parse TOML content, collecting any unknown fields.
    pub fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let options = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((options, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply CLI overrides on top of file values.
    pub fn apply_args(&mut self, args: &CanonicalArgs) {
        if let Some(ref hostname) = args.hostname {
            self.hostname = Some(hostname.clone());
        }
        if !args.pattern.is_empty() {
            self.pattern = Patterns::new(args.pattern.iter().cloned());
        }
        if !args.omit_extension.is_empty() {
            self.omit_extensions = Some(args.omit_extension.clone());
        }
        Self::update_option(&mut self.omit_index, args.omit_index.as_ref());
        Self::update_option(
            &mut self.omit_trailing_slashes,
            args.omit_trailing_slashes.as_ref(),
        );
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }
}

// ============================================================================
// tests
// ============================================================================
