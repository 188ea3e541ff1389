//! svecl import maps
//!
//! This crate resolves bare module specifiers through an
//! [import map](https://github.com/WICG/import-maps) document:
//! - Loading `imports` and anchoring targets at the document's directory
//! - Rejecting `scopes`, which are not supported
//! - Exact and longest-prefix specifier resolution
//! - Lexical path cleanup and Node-style `index.js` directory imports

pub mod map;
pub mod path;

pub use map::{ImportMap, ImportMapError};
pub use path::{clean_path, from_slash, has_extension, is_relative_or_absolute};
