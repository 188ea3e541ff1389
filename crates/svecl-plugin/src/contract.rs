//! Types exchanged between the bundler and its hooks.
//!
//! A bundler calls a resolve hook for every import specifier it meets and a
//! load hook for every file whose path matches the hook's filter. Both kinds
//! of hook are registered on a [`crate::PluginBuild`].

use crate::error::PluginError;
use std::fmt;
use std::path::PathBuf;

/// Namespace a resolved path belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// A file on disk
    #[default]
    File,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::File => "file",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An import the bundler wants resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveArgs {
    /// The specifier exactly as written in the import
    pub path: String,
    /// File containing the import, empty for entry points
    pub importer: String,
}

impl ResolveArgs {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// Answer of a resolve hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The hook declines; the bundler falls back to its own resolution
    PassThrough,
    /// The specifier maps to `path`
    Resolved { path: PathBuf, namespace: Namespace },
}

impl Resolution {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Resolution::Resolved {
            path: path.into(),
            namespace: Namespace::File,
        }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Resolution::PassThrough => None,
            Resolution::Resolved { path, .. } => Some(path),
        }
    }
}

/// A file the bundler wants loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadArgs {
    pub path: PathBuf,
}

impl LoadArgs {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// How the bundler should interpret loaded contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Loader {
    #[default]
    Js,
}

/// Position of a diagnostic within a source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticLocation {
    pub file: String,
    /// 1-based
    pub line: usize,
    /// 0-based
    pub column: usize,
    /// Text of the offending source line
    pub line_text: String,
    /// Number of characters the diagnostic spans
    pub length: usize,
}

/// An error or warning reported back to the bundler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostic {
    pub text: String,
    pub location: Option<DiagnosticLocation>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{}:{}:{}: {}", loc.file, loc.line, loc.column, self.text),
            None => f.write_str(&self.text),
        }
    }
}

/// Result of a load hook.
///
/// `contents` is `None` when the file could not be turned into code; the
/// reason is in `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOutput {
    pub contents: Option<String>,
    pub loader: Loader,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

/// Hook consulted for import specifiers.
///
/// Hooks are called concurrently from the bundler's worker threads.
pub trait OnResolve: Send + Sync {
    /// Name used in error reports
    fn name(&self) -> &str;

    /// Regex a specifier must match for the hook to be called
    fn filter(&self) -> &str;

    fn on_resolve(&self, args: &ResolveArgs) -> Result<Resolution, PluginError>;
}

/// Hook that produces the contents of matching files.
///
/// Hooks are called concurrently from the bundler's worker threads.
pub trait OnLoad: Send + Sync {
    /// Name used in error reports
    fn name(&self) -> &str;

    /// Regex a file path must match for the hook to be called
    fn filter(&self) -> &str;

    fn on_load(&self, args: &LoadArgs) -> Result<LoadOutput, PluginError>;
}
