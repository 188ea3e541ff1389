//! Script assets.
//!
//! The bootstrap scripts and the default compiler are embedded at compile
//! time, so the binary works without any files next to it. The compiler
//! script can be swapped for one read from a directory on disk.

use crate::error::SvelteError;
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

/// Scripts evaluated, in order, before the compiler script.
pub const BOOTSTRAP_SCRIPTS: [&str; 4] = ["env.js", "base64.js", "url-polyfill.js", "main.js"];

/// File name of the compiler script, built in or in an external directory.
pub const COMPILER_SCRIPT: &str = "compiler.js";

const RESOURCE_PATH: &str = "resources/";

static BUILTIN_ASSETS: &[(&str, &str)] = &[
    ("resources/env.js", include_str!("../resources/env.js")),
    ("resources/base64.js", include_str!("../resources/base64.js")),
    ("resources/url-polyfill.js", include_str!("../resources/url-polyfill.js")),
    ("resources/main.js", include_str!("../resources/main.js")),
    ("resources/compiler.js", include_str!("../resources/compiler.js")),
];

/// Look up an embedded asset by its logical path (`resources/<name>`).
pub fn builtin_asset(path: &str) -> Option<&'static str> {
    BUILTIN_ASSETS
        .iter()
        .find(|(name, _)| *name == path)
        .map(|(_, content)| *content)
}

/// Where script assets are read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CompilerSource {
    /// The embedded asset table
    #[default]
    Builtin,

    /// A directory containing a Svelte distribution's `compiler.js`
    Directory(PathBuf),
}

impl CompilerSource {
    /// `Directory` when a path is given, `Builtin` otherwise.
    pub fn from_dir(dir: Option<PathBuf>) -> Self {
        dir.map_or(Self::Builtin, Self::Directory)
    }

    /// Read a script by file name.
    ///
    /// A missing or unreadable script is a bootstrap failure.
    pub fn read(&self, name: &str) -> Result<Cow<'static, str>, SvelteError> {
        match self {
            Self::Builtin => builtin_asset(&format!("{}{}", RESOURCE_PATH, name))
                .map(Cow::Borrowed)
                .ok_or_else(|| SvelteError::Bootstrap {
                    script: name.to_string(),
                    reason: "not part of the built-in assets".to_string(),
                }),
            Self::Directory(dir) => {
                let path = dir.join(name);
                std::fs::read_to_string(&path)
                    .map(Cow::Owned)
                    .map_err(|e| SvelteError::Bootstrap {
                        script: path.display().to_string(),
                        reason: e.to_string(),
                    })
            }
        }
    }
}

impl fmt::Display for CompilerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => f.write_str("built-in"),
            Self::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_bootstrap_script_is_embedded() {
        for script in BOOTSTRAP_SCRIPTS {
            let content = CompilerSource::Builtin.read(script).unwrap();
            assert!(!content.is_empty(), "{} is empty", script);
        }
        assert!(CompilerSource::Builtin.read(COMPILER_SCRIPT).is_ok());
    }

    #[test]
    fn test_entry_point_loads_last() {
        assert_eq!(BOOTSTRAP_SCRIPTS.last(), Some(&"main.js"));
        assert!(builtin_asset("resources/main.js").unwrap().contains("function compile"));
    }

    #[test]
    fn test_unknown_builtin_asset() {
        assert!(builtin_asset("resources/nope.js").is_none());
        let err = CompilerSource::Builtin.read("nope.js").unwrap_err();
        assert!(matches!(err, SvelteError::Bootstrap { ref script, .. } if script == "nope.js"));
    }

    #[test]
    fn test_directory_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(COMPILER_SCRIPT), "var svelte = {};").unwrap();

        let source = CompilerSource::from_dir(Some(dir.path().to_path_buf()));
        assert_eq!(source.read(COMPILER_SCRIPT).unwrap(), "var svelte = {};");
        assert!(matches!(source.read("missing.js"), Err(SvelteError::Bootstrap { .. })));
    }

    #[test]
    fn test_from_dir_defaults_to_builtin() {
        assert_eq!(CompilerSource::from_dir(None), CompilerSource::Builtin);
        assert_eq!(CompilerSource::Builtin.to_string(), "built-in");
    }
}
