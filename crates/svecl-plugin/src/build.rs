//! Hook registry driven by the bundler.

use crate::contract::{LoadArgs, LoadOutput, OnLoad, OnResolve, Resolution, ResolveArgs};
use crate::error::{BuildError, PluginError};
use regex::Regex;
use std::sync::Arc;

/// Registered resolve and load hooks.
///
/// Resolve hooks are tried in registration order, and the first one that does
/// not pass through wins. A load request goes to the first hook whose filter
/// matches the file path.
#[derive(Default)]
pub struct PluginBuild {
    resolvers: Vec<(Regex, Arc<dyn OnResolve>)>,
    loaders: Vec<(Regex, Arc<dyn OnLoad>)>,
}

fn compile_filter(filter: &str) -> Result<Regex, PluginError> {
    Regex::new(filter).map_err(|e| PluginError::Filter {
        filter: filter.to_string(),
        source: e,
    })
}

impl PluginBuild {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_resolve(&mut self, hook: Arc<dyn OnResolve>) -> Result<(), PluginError> {
        let filter = compile_filter(hook.filter())?;
        tracing::debug!(plugin = hook.name(), filter = hook.filter(), "registered resolve hook");
        self.resolvers.push((filter, hook));
        Ok(())
    }

    pub fn on_load(&mut self, hook: Arc<dyn OnLoad>) -> Result<(), PluginError> {
        let filter = compile_filter(hook.filter())?;
        tracing::debug!(plugin = hook.name(), filter = hook.filter(), "registered load hook");
        self.loaders.push((filter, hook));
        Ok(())
    }

    /// Resolve one import.
    ///
    /// `PassThrough` means no hook claimed the specifier.
    pub fn resolve(&self, args: &ResolveArgs) -> Result<Resolution, BuildError> {
        for (filter, hook) in &self.resolvers {
            if !filter.is_match(&args.path) {
                continue;
            }
            let resolution = hook.on_resolve(args).map_err(|e| BuildError {
                plugin: hook.name().to_string(),
                subject: args.path.clone(),
                source: e,
            })?;
            if resolution != Resolution::PassThrough {
                return Ok(resolution);
            }
        }
        Ok(Resolution::PassThrough)
    }

    /// Load one file.
    ///
    /// `None` means no hook handles the path.
    pub fn load(&self, args: &LoadArgs) -> Result<Option<LoadOutput>, BuildError> {
        let path = args.path.to_string_lossy();
        let Some((_, hook)) = self.loaders.iter().find(|(filter, _)| filter.is_match(&path)) else {
            return Ok(None);
        };

        hook.on_load(args).map(Some).map_err(|e| BuildError {
            plugin: hook.name().to_string(),
            subject: path.into_owned(),
            source: e,
        })
    }

    pub fn resolve_hooks(&self) -> usize {
        self.resolvers.len()
    }

    pub fn load_hooks(&self) -> usize {
        self.loaders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{Loader, Namespace};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        name: &'static str,
        filter: &'static str,
        answer: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(
            name: &'static str,
            filter: &'static str,
            answer: Option<&'static str>,
        ) -> Arc<Self> {
            Arc::new(Self {
                name,
                filter,
                answer,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl OnResolve for Fixed {
        fn name(&self) -> &str {
            self.name
        }
        fn filter(&self) -> &str {
            self.filter
        }
        fn on_resolve(&self, _args: &ResolveArgs) -> Result<Resolution, PluginError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer.map_or(Resolution::PassThrough, Resolution::file))
        }
    }

    impl OnLoad for Fixed {
        fn name(&self) -> &str {
            self.name
        }
        fn filter(&self) -> &str {
            self.filter
        }
        fn on_load(&self, args: &LoadArgs) -> Result<LoadOutput, PluginError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.answer.is_none() {
                return Err(PluginError::Read {
                    path: args.path.clone(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
            Ok(LoadOutput {
                contents: self.answer.map(str::to_string),
                ..LoadOutput::default()
            })
        }
    }

    #[test]
    fn test_first_claiming_resolver_wins() {
        let declines = Fixed::new("declines", ".*", None);
        let claims = Fixed::new("claims", ".*", Some("/first.js"));
        let later = Fixed::new("later", ".*", Some("/second.js"));

        let mut build = PluginBuild::new();
        build.on_resolve(declines.clone()).unwrap();
        build.on_resolve(claims.clone()).unwrap();
        build.on_resolve(later.clone()).unwrap();

        let resolution = build.resolve(&ResolveArgs::new("pkg")).unwrap();
        assert_eq!(
            resolution,
            Resolution::Resolved {
                path: PathBuf::from("/first.js"),
                namespace: Namespace::File,
            }
        );
        assert_eq!(declines.calls.load(Ordering::SeqCst), 1);
        assert_eq!(later.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_filter_skips_resolver() {
        let scoped = Fixed::new("scoped", "^@app/", Some("/app.js"));
        let mut build = PluginBuild::new();
        build.on_resolve(scoped.clone()).unwrap();

        assert_eq!(build.resolve(&ResolveArgs::new("react")).unwrap(), Resolution::PassThrough);
        assert_eq!(scoped.calls.load(Ordering::SeqCst), 0);
        assert!(build.resolve(&ResolveArgs::new("@app/x")).unwrap().path().is_some());
    }

    #[test]
    fn test_invalid_filter_rejected() {
        let mut build = PluginBuild::new();
        let err = build.on_resolve(Fixed::new("bad", "(", None)).unwrap_err();
        assert!(matches!(err, PluginError::Filter { ref filter, .. } if filter == "("));
        assert_eq!(build.resolve_hooks(), 0);
    }

    #[test]
    fn test_load_dispatch() {
        let mut build = PluginBuild::new();
        build.on_load(Fixed::new("svelte", r"\.svelte$", Some("code"))).unwrap();
        build.on_load(Fixed::new("fallback", ".*", None)).unwrap();
        assert_eq!(build.load_hooks(), 2);

        let output = build.load(&LoadArgs::new("/src/App.svelte")).unwrap().unwrap();
        assert_eq!(output.contents.as_deref(), Some("code"));
        assert_eq!(output.loader, Loader::Js);

        let err = build.load(&LoadArgs::new("/src/main.js")).unwrap_err();
        assert_eq!(err.plugin, "fallback");
        assert_eq!(err.subject, "/src/main.js");
    }

    #[test]
    fn test_load_without_matching_hook() {
        let mut build = PluginBuild::new();
        build.on_load(Fixed::new("svelte", r"\.svelte$", Some("code"))).unwrap();
        assert_eq!(build.load(&LoadArgs::new("/src/main.js")).unwrap(), None);
    }
}
