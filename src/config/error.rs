//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// ConfigError
// ============================================================================

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    /// Every `omit_extensions` entry lacking a leading dot, in config order.
    #[error("extensions \"{}\" do not start with a dot", .0.join(", "))]
    MalformedExtensions(Vec<String>),
}
