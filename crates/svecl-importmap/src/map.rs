//! Import map documents
//!
//! Parses `{"imports": {...}, "scopes": {...}}` documents and resolves bare
//! specifiers against them by exact or longest-prefix match.

use crate::path::{clean_path, from_slash, has_extension};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading an import map or resolving through it
#[derive(Debug, Error)]
pub enum ImportMapError {
    /// The import map document does not exist
    #[error("Import map not found: {0}")]
    FileNotFound(PathBuf),

    /// The document exists but could not be read, or its directory could not
    /// be made absolute
    #[error("Unable to read import map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not a valid import map
    #[error("Malformed import map: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document uses a part of the import map format we reject
    #[error("{0} are not supported")]
    UnsupportedFeature(&'static str),

    /// No entry of the map matches the specifier
    #[error("Unable to resolve specifier '{0}'")]
    Unresolved(String),
}

type SpecifierMap = BTreeMap<String, String>;

/// On-disk shape of an import map
#[derive(Debug, Default, Deserialize)]
struct ImportMapDocument {
    #[serde(default)]
    imports: Option<SpecifierMap>,
    #[serde(default)]
    scopes: Option<BTreeMap<String, SpecifierMap>>,
}

/// A loaded import map.
///
/// Targets are rewritten to native paths anchored at the document's directory
/// when the map is loaded; the map is immutable afterwards and can be shared
/// freely between threads.
#[derive(Debug, Clone)]
pub struct ImportMap {
    /// Specifier (or `/`-terminated prefix) → anchored target
    imports: BTreeMap<String, PathBuf>,

    /// Absolute directory the targets were anchored at
    base_dir: PathBuf,
}

impl ImportMap {
    /// Load an import map from a JSON file.
    ///
    /// Relative targets are resolved against the absolute directory that
    /// contains `path`.
    pub fn from_file(path: &Path) -> Result<Self, ImportMapError> {
        let content = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ImportMapError::FileNotFound(path.to_path_buf()),
            _ => ImportMapError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let base_dir = std::path::absolute(dir).map_err(|e| ImportMapError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let map = Self::from_json(&content, &base_dir)?;
        tracing::debug!(
            path = %path.display(),
            entries = map.imports.len(),
            "loaded import map"
        );
        Ok(map)
    }

    /// Parse an import map from JSON, anchoring relative targets at `base_dir`.
    ///
    /// Absolute targets are kept as they are. Any non-empty `scopes` section
    /// is rejected.
    pub fn from_json(content: &[u8], base_dir: &Path) -> Result<Self, ImportMapError> {
        let document: ImportMapDocument = serde_json::from_slice(content)?;

        if document.scopes.as_ref().is_some_and(|scopes| !scopes.is_empty()) {
            return Err(ImportMapError::UnsupportedFeature("Scopes"));
        }

        let imports = document
            .imports
            .unwrap_or_default()
            .into_iter()
            .map(|(specifier, target)| {
                let anchored = base_dir.join(from_slash(&target));
                (specifier, anchored)
            })
            .collect();

        Ok(Self {
            imports,
            base_dir: base_dir.to_path_buf(),
        })
    }

    /// Resolve a bare specifier.
    ///
    /// An exact key wins; otherwise the longest `/`-terminated key that
    /// prefixes the specifier is replaced by its target. The result is
    /// cleaned, and `index.js` is appended when it has no extension.
    pub fn resolve(&self, specifier: &str) -> Result<PathBuf, ImportMapError> {
        let joined = match self.imports.get(specifier) {
            Some(target) => target.clone(),
            None => {
                let (key, target) = self
                    .longest_prefix(specifier)
                    .ok_or_else(|| ImportMapError::Unresolved(specifier.to_string()))?;
                let mut joined = target.clone().into_os_string();
                joined.push(from_slash(&specifier[key.len()..]));
                PathBuf::from(joined)
            }
        };

        let mut resolved = clean_path(&joined);
        if !has_extension(&resolved) {
            // Node-style directory imports
            resolved.push("index.js");
        }

        tracing::trace!(specifier, resolved = %resolved.display(), "resolved specifier");
        Ok(resolved)
    }

    /// Longest `/`-terminated key that prefixes `specifier`.
    ///
    /// Equal lengths keep the lexicographically smallest key.
    fn longest_prefix(&self, specifier: &str) -> Option<(&String, &PathBuf)> {
        self.imports
            .iter()
            .filter(|(key, _)| key.ends_with('/') && specifier.starts_with(key.as_str()))
            .max_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
    }

    /// Number of entries in `imports`
    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Directory relative targets were anchored at
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> PathBuf {
        std::env::temp_dir().join("svecl-project")
    }

    fn load(json: &str) -> ImportMap {
        ImportMap::from_json(json.as_bytes(), &base()).unwrap()
    }

    #[test]
    fn test_exact_match() {
        let map = load(r#"{"imports": {"lodash": "./vendor/lodash.js"}}"#);
        let resolved = map.resolve("lodash").unwrap();
        assert_eq!(resolved, base().join("vendor").join("lodash.js"));
    }

    #[test]
    fn test_exact_match_wins_over_prefix() {
        let map = load(
            r#"{"imports": {
                "app/": "./src/",
                "app/main.js": "./entry.js"
            }}"#,
        );
        assert_eq!(map.resolve("app/main.js").unwrap(), base().join("entry.js"));
        assert_eq!(
            map.resolve("app/other.js").unwrap(),
            base().join("src").join("other.js")
        );
    }

    #[test]
    fn test_longest_prefix_wins() {
        let map = load(
            r#"{"imports": {
                "@lib/": "./lib/",
                "@lib/ui/": "./widgets/",
                "@lib/u": "./never.js"
            }}"#,
        );
        let resolved = map.resolve("@lib/ui/button.js").unwrap();
        assert_eq!(resolved, base().join("widgets").join("button.js"));

        let resolved = map.resolve("@lib/core.js").unwrap();
        assert_eq!(resolved, base().join("lib").join("core.js"));
    }

    #[test]
    fn test_prefix_requires_trailing_slash() {
        let map = load(r#"{"imports": {"@lib": "./lib.js"}}"#);
        let err = map.resolve("@lib/x.js").unwrap_err();
        assert!(matches!(err, ImportMapError::Unresolved(ref s) if s == "@lib/x.js"));
    }

    #[test]
    fn test_unresolved_names_specifier() {
        let map = load(r#"{"imports": {"@lib/": "./lib/"}}"#);
        let err = map.resolve("@other").unwrap_err();
        assert_eq!(err.to_string(), "Unable to resolve specifier '@other'");
    }

    #[test]
    fn test_directory_import_gets_index() {
        let map = load(r#"{"imports": {"@lib/": "./lib/"}}"#);
        assert_eq!(
            map.resolve("@lib/x").unwrap(),
            base().join("lib").join("x").join("index.js")
        );
        assert_eq!(map.resolve("@lib/x.js").unwrap(), base().join("lib").join("x.js"));
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_target_is_not_rebased() {
        let map = load(r#"{"imports": {"@lib/": "/abs/lib/"}}"#);
        assert_eq!(map.resolve("@lib/x").unwrap(), PathBuf::from("/abs/lib/x/index.js"));
        assert_eq!(map.resolve("@lib/x.js").unwrap(), PathBuf::from("/abs/lib/x.js"));
    }

    #[cfg(unix)]
    #[test]
    fn test_dotfile_counts_as_extension() {
        let map = load(r#"{"imports": {"@lib/": "/abs/lib/"}}"#);
        assert_eq!(map.resolve("@lib/.env").unwrap(), PathBuf::from("/abs/lib/.env"));
        assert_eq!(
            map.resolve("@lib/config.d/main").unwrap(),
            PathBuf::from("/abs/lib/config.d/main/index.js")
        );
    }

    #[test]
    fn test_result_is_cleaned() {
        let map = load(r#"{"imports": {"shared/": "./packages/app/../shared/"}}"#);
        assert_eq!(
            map.resolve("shared/./util/../fmt.js").unwrap(),
            base().join("packages").join("shared").join("fmt.js")
        );
    }

    #[test]
    fn test_scopes_rejected() {
        let err = ImportMap::from_json(
            br#"{"imports": {"a": "./a.js"}, "scopes": {"/x/": {"a": "./b.js"}}}"#,
            &base(),
        )
        .unwrap_err();
        assert!(matches!(err, ImportMapError::UnsupportedFeature(_)));
        assert_eq!(err.to_string(), "Scopes are not supported");
    }

    #[test]
    fn test_scopes_rejected_without_imports() {
        let err = ImportMap::from_json(br#"{"scopes": {"/x/": {}}}"#, &base()).unwrap_err();
        assert!(matches!(err, ImportMapError::UnsupportedFeature(_)));
    }

    #[test]
    fn test_empty_scopes_allowed() {
        let map = ImportMap::from_json(br#"{"imports": {}, "scopes": {}}"#, &base()).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_malformed_document() {
        let err = ImportMap::from_json(br#"{"imports": ["a"]}"#, &base()).unwrap_err();
        assert!(matches!(err, ImportMapError::Parse(_)));

        let err = ImportMap::from_json(b"not json", &base()).unwrap_err();
        assert!(matches!(err, ImportMapError::Parse(_)));
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let map = ImportMap::from_json(b"{}", &base()).unwrap();
        assert_eq!(map.len(), 0);
        assert_eq!(map.base_dir(), base().as_path());
    }
}
