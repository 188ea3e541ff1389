//! Hook error types.

use std::path::PathBuf;
use svecl_importmap::ImportMapError;
use svecl_svelte::SvelteError;

/// Errors raised while setting up or running a hook
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// Import map loading or specifier resolution failed
    #[error(transparent)]
    ImportMap(#[from] ImportMapError),

    /// Compiler startup or compilation failed
    #[error(transparent)]
    Compiler(#[from] SvelteError),

    /// A file passed to a load hook could not be read
    #[error("Unable to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A hook registered an invalid filter pattern
    #[error("Invalid filter {filter:?}: {source}")]
    Filter {
        filter: String,
        #[source]
        source: regex::Error,
    },
}

/// A hook failure tied to the specifier or file that caused it.
///
/// Only that import edge or file fails; the build carries on with the rest.
#[derive(Debug, thiserror::Error)]
#[error("[{plugin}] {subject}: {source}")]
pub struct BuildError {
    /// Name of the hook that failed
    pub plugin: String,
    /// Specifier or file path being processed
    pub subject: String,
    #[source]
    pub source: PluginError,
}
