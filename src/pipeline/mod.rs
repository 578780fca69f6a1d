//! Build plugin seam.
//!
//! The host build owns the [`FileRegistry`] and lends it to each plugin in
//! turn. A plugin must not keep the registry beyond its `run` call.
//!
//! ```ignore
//! let ctx = BuildContext::new(root);
//! Pipeline::new(&mut files, &ctx)
//!     .pipe(&CanonicalUrlBuilder::new(options)?)?
//!     .finish();
//! ```

use std::path::{Path, PathBuf};

use crate::page::{FileRegistry, JsonMap};

/// Build-wide data passed through to plugins untouched.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    /// Source root the registry paths are relative to.
    pub root: PathBuf,
    /// Free-form host metadata.
    pub metadata: JsonMap,
}

impl BuildContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            metadata: JsonMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// A build step over the file registry.
pub trait Plugin {
    /// Short name used in log prefixes.
    fn name(&self) -> &'static str;

    /// Run once per build. Errors halt the build.
    fn run(&self, files: &mut FileRegistry, ctx: &BuildContext) -> anyhow::Result<()>;
}

/// Runs plugins in order over a borrowed registry.
pub struct Pipeline<'a> {
    files: &'a mut FileRegistry,
    ctx: &'a BuildContext,
}

impl<'a> Pipeline<'a> {
    pub fn new(files: &'a mut FileRegistry, ctx: &'a BuildContext) -> Self {
        Self { files, ctx }
    }

    /// Run `plugin`, stopping the chain on its error.
    pub fn pipe(self, plugin: &dyn Plugin) -> anyhow::Result<Self> {
        crate::debug!(plugin.name(); "running");
        plugin.run(self.files, self.ctx)?;
        Ok(self)
    }

    /// Release the registry borrow.
    pub fn finish(self) -> &'a mut FileRegistry {
        self.files
    }
}
