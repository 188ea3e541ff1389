//! Component compiler on top of a script engine.

use crate::assets::CompilerSource;
use crate::engine::ScriptEngine;
use crate::error::SvelteError;
use serde::{Deserialize, Serialize};

/// Invocation of the compiler entry point defined by `main.js`.
const COMPILE_CALL: &str = "JSON.stringify(compile(source, { filename }));";

const VERSION_CALL: &str = "svelte.VERSION";

/// Severity of a compiler message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Error,
    Warning,
}

/// Position in a component source.
///
/// `line` is 1-based, `column` is 0-based, `character` is the offset from the
/// start of the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub character: usize,
}

/// Error or warning reported by the compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub filename: String,
    /// Source excerpt, one `"<line>: <text>"` entry per line plus a caret line
    #[serde(default)]
    pub frame: String,
    #[serde(default)]
    pub start: Location,
    #[serde(default)]
    pub end: Location,
}

/// Output of one compilation.
///
/// `code` is `None` when the component failed to compile; `messages` then
/// holds the error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResult {
    #[serde(default)]
    pub code: Option<String>,
    pub messages: Vec<Message>,
}

impl CompileResult {
    /// Messages of one kind, in the order the compiler reported them
    pub fn messages_of(&self, kind: MessageKind) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.kind == kind)
    }

    pub fn has_errors(&self) -> bool {
        self.messages_of(MessageKind::Error).next().is_some()
    }
}

/// A script engine with the component compiler loaded.
///
/// Every `compile` call rebinds the `source` and `filename` globals, so an
/// instance must not be shared between callers.
pub struct ComponentCompiler {
    engine: ScriptEngine,
}

impl ComponentCompiler {
    /// Start an engine and load the compiler from `source`.
    pub fn new(source: &CompilerSource) -> Result<Self, SvelteError> {
        Ok(Self {
            engine: ScriptEngine::initialize(source)?,
        })
    }

    /// Compile a component.
    ///
    /// Parse and validation failures come back as error messages in the
    /// result; anything else the compiler throws is an `Evaluation` error.
    pub fn compile(&mut self, source: &str, filename: &str) -> Result<CompileResult, SvelteError> {
        self.engine.set_global("source", source)?;
        self.engine.set_global("filename", filename)?;

        let payload = self
            .engine
            .evaluate_string(COMPILE_CALL, "compile_call")?
            .ok_or_else(|| {
                SvelteError::Conversion("compile() did not return an object".to_string())
            })?;

        serde_json::from_str(&payload).map_err(|e| SvelteError::Conversion(e.to_string()))
    }

    /// Version of the loaded compiler.
    ///
    /// A compiler without a readable version was not loaded correctly;
    /// callers treat this error as fatal.
    pub fn version(&mut self) -> Result<String, SvelteError> {
        self.engine
            .evaluate_string(VERSION_CALL, "version_call")?
            .ok_or_else(|| SvelteError::Conversion(format!("{} is not a string", VERSION_CALL)))
    }
}
