//! svecl Svelte compilation
//!
//! Compiles single-file components by running a JavaScript component
//! compiler inside embedded script engines:
//! - `assets`: embedded bootstrap scripts and compiler source selection
//! - `engine`: one interpreter context with the scripts loaded
//! - `compiler`: `compile`/`version` calls and the result schema
//! - `pool`: a fixed set of compilers on worker threads with blocking checkout

pub mod assets;
pub mod compiler;
pub mod engine;
pub mod error;
pub mod pool;

pub use assets::{CompilerSource, BOOTSTRAP_SCRIPTS, COMPILER_SCRIPT};
pub use compiler::{CompileResult, ComponentCompiler, Location, Message, MessageKind};
pub use engine::ScriptEngine;
pub use error::{EvaluationError, SvelteError};
pub use pool::{CompilerPool, PooledCompiler};
