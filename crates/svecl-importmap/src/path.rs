//! Lexical path helpers
//!
//! Nothing in here touches the filesystem: import map targets may point at
//! files that do not exist yet when a build starts.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

/// Check whether a specifier is relative (`./`, `../`) or an absolute path.
///
/// Such specifiers bypass the import map and are left to the bundler.
pub fn is_relative_or_absolute(specifier: &str) -> bool {
    specifier.starts_with("./")
        || specifier.starts_with("../")
        || Path::new(specifier).is_absolute()
}

/// Check whether the last path element has an extension.
///
/// Everything from the last `.` of the final element counts, so dotfiles
/// such as `.env` have one.
pub fn has_extension(path: &Path) -> bool {
    path.components()
        .next_back()
        .is_some_and(|last| last.as_os_str().to_string_lossy().contains('.'))
}

/// Convert a `/`-separated path into the platform's native form.
pub fn from_slash(path: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace('/', MAIN_SEPARATOR_STR)
    }
}

/// Normalize a path lexically.
///
/// Collapses `.` and `..` segments and repeated or trailing separators.
/// A `..` directly below the root is dropped, so the result never climbs
/// above it; leading `..` segments of a relative path are kept. An empty
/// result becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }

    parts.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_specifiers() {
        assert!(is_relative_or_absolute("./a"));
        assert!(is_relative_or_absolute("../a/b.js"));
        assert!(!is_relative_or_absolute(".a"));
        assert!(!is_relative_or_absolute("lodash"));
        assert!(!is_relative_or_absolute("@scope/pkg"));
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_specifier() {
        assert!(is_relative_or_absolute("/usr/lib/x.js"));
    }

    #[test]
    fn test_clean_collapses_dots() {
        let cleaned = clean_path(Path::new("a/./b/../c//d/"));
        assert_eq!(cleaned, PathBuf::from("a").join("c").join("d"));
    }

    #[test]
    fn test_clean_keeps_leading_parent_dirs() {
        let cleaned = clean_path(Path::new("../../x/../y"));
        assert_eq!(cleaned, PathBuf::from("..").join("..").join("y"));
    }

    #[test]
    fn test_clean_empty_is_current_dir() {
        assert_eq!(clean_path(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(clean_path(Path::new("")), PathBuf::from("."));
    }

    #[cfg(unix)]
    #[test]
    fn test_clean_never_climbs_above_root() {
        assert_eq!(clean_path(Path::new("/../../etc/./hosts")), PathBuf::from("/etc/hosts"));
        assert_eq!(clean_path(Path::new("/..")), PathBuf::from("/"));
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("lib/x.js")));
        assert!(has_extension(Path::new("lib/.env")));
        assert!(has_extension(Path::new("lib/archive.tar.gz")));
        assert!(!has_extension(Path::new("lib/x")));
        assert!(!has_extension(Path::new("lib.d/x")));
        assert!(!has_extension(Path::new("")));
    }

    #[cfg(unix)]
    #[test]
    fn test_from_slash_is_identity_on_unix() {
        assert_eq!(from_slash("a/b/c"), "a/b/c");
    }
}
