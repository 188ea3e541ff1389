//! Resolve hook backed by an import map.

use crate::contract::{OnResolve, Resolution, ResolveArgs};
use crate::error::PluginError;
use std::path::Path;
use svecl_importmap::{is_relative_or_absolute, ImportMap};

/// Resolves bare specifiers through an import map.
///
/// Relative and absolute specifiers are left to the bundler.
pub struct ResolveHook {
    import_map: ImportMap,
}

impl ResolveHook {
    pub const NAME: &'static str = "import-map";

    pub fn new(import_map: ImportMap) -> Self {
        Self { import_map }
    }

    /// Load the import map at `path`.
    ///
    /// A missing or malformed map fails here, before any build starts.
    pub fn from_file(path: &Path) -> Result<Self, PluginError> {
        Ok(Self::new(ImportMap::from_file(path)?))
    }

    pub fn import_map(&self) -> &ImportMap {
        &self.import_map
    }
}

impl OnResolve for ResolveHook {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn filter(&self) -> &str {
        ".*"
    }

    fn on_resolve(&self, args: &ResolveArgs) -> Result<Resolution, PluginError> {
        if is_relative_or_absolute(&args.path) {
            return Ok(Resolution::PassThrough);
        }

        let path = self.import_map.resolve(&args.path)?;
        tracing::debug!(
            specifier = %args.path,
            importer = %args.importer,
            path = %path.display(),
            "resolved"
        );
        Ok(Resolution::file(path))
    }
}
