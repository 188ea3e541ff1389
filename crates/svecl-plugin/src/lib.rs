//! svecl bundler hooks
//!
//! Adapters that plug import-map resolution and Svelte compilation into a
//! bundler's build:
//! - [`ResolveHook`] maps bare specifiers to files through an import map
//! - [`LoadHook`] compiles `.svelte` files on a shared compiler pool
//! - [`PluginBuild`] holds registered hooks and dispatches bundler requests

pub mod build;
pub mod contract;
pub mod error;
pub mod load;
pub mod resolve;

pub use build::PluginBuild;
pub use contract::{
    Diagnostic, DiagnosticLocation, LoadArgs, LoadOutput, Loader, Namespace, OnLoad, OnResolve,
    Resolution, ResolveArgs,
};
pub use error::{BuildError, PluginError};
pub use load::{convert_messages, find_line_text, LoadHook};
pub use resolve::ResolveHook;
