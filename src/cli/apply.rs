//! `apply` command: fill in canonical URLs for a registry file.

use anyhow::{Context, Result};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::canonical::CanonicalUrlBuilder;
use crate::page::FileRegistry;
use crate::pipeline::{BuildContext, Pipeline};

/// Where the updated registry goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// Resolve `--output` / `--in-place` against the input path.
    pub fn resolve(registry: &Path, output: Option<&Path>, in_place: bool) -> Result<Self> {
        match (output, in_place) {
            (Some(path), _) => Ok(Self::File(path.to_path_buf())),
            (None, true) if is_stdin(registry) => {
                anyhow::bail!("--in-place needs a registry file, not stdin")
            }
            (None, true) => Ok(Self::File(registry.to_path_buf())),
            (None, false) => Ok(Self::Stdout),
        }
    }
}

/// Run the builder over the registry at `registry` and write the result.
pub fn run_apply(
    builder: &CanonicalUrlBuilder,
    registry: &Path,
    destination: &Destination,
) -> Result<FileRegistry> {
    let mut files = read_registry(registry)?;

    let root = registry
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let ctx = BuildContext::new(root);
    Pipeline::new(&mut files, &ctx).pipe(builder)?;

    write_registry(&files, destination)?;
    Ok(files)
}

fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}

fn read_registry(path: &Path) -> Result<FileRegistry> {
    if is_stdin(path) {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read registry from stdin")?;
        return FileRegistry::from_reader(buf.as_bytes()).context("invalid registry on stdin");
    }
    FileRegistry::from_path(path)
        .with_context(|| format!("failed to load registry `{}`", path.display()))
}

fn write_registry(files: &FileRegistry, destination: &Destination) -> Result<()> {
    match destination {
        Destination::Stdout => files
            .to_writer(io::stdout().lock())
            .context("failed to write registry to stdout"),
        Destination::File(path) => files
            .write_path(path)
            .with_context(|| format!("failed to write registry `{}`", path.display())),
    }
}
