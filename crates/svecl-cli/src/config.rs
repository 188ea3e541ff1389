//! Runtime configuration.
//!
//! Values come from command-line flags first, then from the environment,
//! then from defaults.

use anyhow::Context;
use std::path::PathBuf;
use svecl_svelte::CompilerSource;

pub const ENV_NUM_THREADS: &str = "SVECL_NUM_THREADS";
pub const ENV_SVELTE_DIR: &str = "SVECL_SVELTE_DIR";
pub const ENV_IMPORT_MAP: &str = "SVECL_IMPORT_MAP";
pub const ENV_LOG: &str = "SVECL_LOG";

/// Settings shared by every subcommand
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Compiler pool size, 0 for one per CPU core
    pub threads: usize,
    /// Directory holding an external `compiler.js`
    pub svelte_dir: Option<PathBuf>,
    pub import_map: Option<PathBuf>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub threads: Option<usize>,
    pub svelte_dir: Option<PathBuf>,
    pub import_map: Option<PathBuf>,
}

impl Config {
    /// Read the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an environment lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let threads = match get(ENV_NUM_THREADS) {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number, got {:?}", ENV_NUM_THREADS, v))?,
            None => 0,
        };

        Ok(Self {
            threads,
            svelte_dir: get(ENV_SVELTE_DIR).map(PathBuf::from),
            import_map: get(ENV_IMPORT_MAP).map(PathBuf::from),
        })
    }

    /// Apply command-line values on top.
    pub fn with_overrides(self, overrides: Overrides) -> Self {
        Self {
            threads: overrides.threads.unwrap_or(self.threads),
            svelte_dir: overrides.svelte_dir.or(self.svelte_dir),
            import_map: overrides.import_map.or(self.import_map),
        }
    }

    pub fn pool_size(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }

    pub fn compiler_source(&self) -> CompilerSource {
        CompilerSource::from_dir(self.svelte_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.pool_size(), num_cpus::get());
        assert_eq!(config.compiler_source(), CompilerSource::Builtin);
    }

    #[test]
    fn test_environment() {
        let config = Config::from_lookup(lookup(&[
            (ENV_NUM_THREADS, "3"),
            (ENV_SVELTE_DIR, "/opt/svelte"),
            (ENV_IMPORT_MAP, "importmap.json"),
        ]))
        .unwrap();
        assert_eq!(config.pool_size(), 3);
        assert_eq!(
            config.compiler_source(),
            CompilerSource::Directory(PathBuf::from("/opt/svelte"))
        );
        assert_eq!(config.import_map, Some(PathBuf::from("importmap.json")));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let vars = [(ENV_NUM_THREADS, " "), (ENV_IMPORT_MAP, "")];
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_thread_count() {
        let err = Config::from_lookup(lookup(&[(ENV_NUM_THREADS, "many")])).unwrap_err();
        assert!(err.to_string().contains(ENV_NUM_THREADS));
    }

    #[test]
    fn test_flags_override_environment() {
        let vars = [(ENV_NUM_THREADS, "3"), (ENV_IMPORT_MAP, "env.json")];
        let config = Config::from_lookup(lookup(&vars))
            .unwrap()
            .with_overrides(Overrides {
                threads: Some(1),
                svelte_dir: None,
                import_map: Some(PathBuf::from("flag.json")),
            });
        assert_eq!(config.threads, 1);
        assert_eq!(config.svelte_dir, None);
        assert_eq!(config.import_map, Some(PathBuf::from("flag.json")));
    }
}
