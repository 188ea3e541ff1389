//! Load hook compiling Svelte components.

use crate::contract::{Diagnostic, DiagnosticLocation, LoadArgs, LoadOutput, Loader, OnLoad};
use crate::error::PluginError;
use std::path::Path;
use std::sync::Arc;
use svecl_svelte::{CompilerPool, CompilerSource, Message, MessageKind};

/// Compiles `.svelte` files to JavaScript on a shared compiler pool.
pub struct LoadHook {
    pool: Arc<CompilerPool>,
}

impl LoadHook {
    pub const NAME: &'static str = "svelte";

    pub fn new(pool: Arc<CompilerPool>) -> Self {
        Self { pool }
    }

    /// Start a pool of `size` compilers (0 for one per CPU core).
    pub fn start(size: usize, source: CompilerSource) -> Result<Self, PluginError> {
        Ok(Self::new(Arc::new(CompilerPool::new(size, source)?)))
    }

    pub fn pool(&self) -> &CompilerPool {
        &self.pool
    }
}

impl OnLoad for LoadHook {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn filter(&self) -> &str {
        r"\.svelte$"
    }

    fn on_load(&self, args: &LoadArgs) -> Result<LoadOutput, PluginError> {
        let bytes = std::fs::read(&args.path).map_err(|e| PluginError::Read {
            path: args.path.clone(),
            source: e,
        })?;
        let source = String::from_utf8_lossy(&bytes);

        let filename = file_name(&args.path);
        let result = self.pool.acquire().compile(&source, &filename)?;

        let errors = convert_messages(&result.messages, MessageKind::Error);
        let warnings = convert_messages(&result.messages, MessageKind::Warning);
        tracing::debug!(
            path = %args.path.display(),
            errors = errors.len(),
            warnings = warnings.len(),
            "compiled component"
        );

        Ok(LoadOutput {
            contents: result.code,
            loader: Loader::Js,
            errors,
            warnings,
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Convert the compiler messages of one kind into bundler diagnostics.
pub fn convert_messages(messages: &[Message], kind: MessageKind) -> Vec<Diagnostic> {
    messages
        .iter()
        .filter(|m| m.kind == kind)
        .map(|m| Diagnostic {
            text: m.message.clone(),
            location: Some(DiagnosticLocation {
                file: m.filename.clone(),
                line: m.start.line,
                column: m.start.column,
                line_text: find_line_text(&m.frame, m.start.line).to_string(),
                length: m.end.character.saturating_sub(m.start.character),
            }),
        })
        .collect()
}

/// Text of `line` within a code frame.
///
/// Frame lines look like `"<n>: <text>"`, with `<n>` right-aligned. Returns
/// the whole frame when no line carries that number.
pub fn find_line_text(frame: &str, line: usize) -> &str {
    let prefix = format!("{}: ", line);
    frame
        .lines()
        .find_map(|l| l.trim_start().strip_prefix(prefix.as_str()))
        .unwrap_or(frame)
}
