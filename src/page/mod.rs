//! File registry: relative path → metadata, as handed over by the host build.

mod meta;

pub use meta::FileMeta;

use rayon::prelude::*;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
};
use std::{
    fmt, fs,
    io::{Read, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

/// A JSON object map for storing arbitrary metadata fields.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Registry I/O errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("registry is not a JSON object of file records")]
    Json(#[from] serde_json::Error),
}

/// Files of one build keyed by their path relative to the source root.
///
/// Keys are kept exactly as the host stored them, separators included, and
/// in the order the host listed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileRegistry(Vec<(String, FileMeta)>);

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; a replaced record keeps its position.
    pub fn insert(&mut self, path: impl Into<String>, meta: FileMeta) -> Option<FileMeta> {
        let path = path.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == path) {
            Some((_, slot)) => Some(std::mem::replace(slot, meta)),
            None => {
                self.0.push((path, meta));
                None
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&FileMeta> {
        self.0
            .iter()
            .find(|(existing, _)| existing == path)
            .map(|(_, meta)| meta)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Relative paths in registry order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(path, _)| path.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileMeta)> {
        self.0.iter().map(|(path, meta)| (path.as_str(), meta))
    }

    /// Parallel mutable iteration; each record is visited by one worker.
    pub fn par_iter_mut(
        &mut self,
    ) -> impl IndexedParallelIterator<Item = (&str, &mut FileMeta)> {
        self.0
            .par_iter_mut()
            .map(|(path, meta)| (path.as_str(), meta))
    }

    // ========================================================================
    // JSON I/O
    // ========================================================================

    pub fn from_reader(reader: impl Read) -> Result<Self, RegistryError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let file = fs::File::open(path).map_err(|err| RegistryError::Io(path.to_path_buf(), err))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Pretty-printed JSON followed by a newline.
    pub fn to_writer(&self, mut writer: impl Write) -> Result<(), RegistryError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer).map_err(serde_json::Error::io)?;
        Ok(())
    }

    pub fn write_path(&self, path: &Path) -> Result<(), RegistryError> {
        let mut buf = Vec::new();
        self.to_writer(&mut buf)?;
        fs::write(path, buf).map_err(|err| RegistryError::Io(path.to_path_buf(), err))
    }
}

impl<K: Into<String>> FromIterator<(K, FileMeta)> for FileRegistry {
    fn from_iter<I: IntoIterator<Item = (K, FileMeta)>>(iter: I) -> Self {
        let mut files = Self::new();
        for (path, meta) in iter {
            files.insert(path, meta);
        }
        files
    }
}

// ============================================================================
// serde: a JSON object in host order
// ============================================================================

impl Serialize for FileRegistry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(path, meta)| (path, meta)))
    }
}

impl<'de> Deserialize<'de> for FileRegistry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RegistryVisitor)
    }
}

struct RegistryVisitor;

impl<'de> Visitor<'de> for RegistryVisitor {
    type Value = FileRegistry;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of file paths to records")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut files = FileRegistry(Vec::with_capacity(map.size_hint().unwrap_or(0)));
        while let Some((path, meta)) = map.next_entry::<String, FileMeta>()? {
            files.insert(path, meta);
        }
        Ok(files)
    }
}
