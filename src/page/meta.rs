//! Per-file metadata record owned by the host build.

use serde::{Deserialize, Serialize};

use super::JsonMap;

/// Metadata attached to one file of the build.
///
/// Only `canonical` is interpreted here. Every other field lands in `extra`
/// and is written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMeta {
    /// Absolute canonical URL of the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    /// Additional host-defined fields.
    #[serde(flatten, default)]
    pub extra: JsonMap,
}

impl FileMeta {
    /// Record with a preset canonical URL.
    pub fn with_canonical(url: impl Into<String>) -> Self {
        Self {
            canonical: Some(url.into()),
            extra: JsonMap::new(),
        }
    }

    /// Whether a canonical URL is already present. Empty counts as absent.
    #[inline]
    pub fn has_canonical(&self) -> bool {
        self.canonical.as_deref().is_some_and(|url| !url.is_empty())
    }
}
