//! Compiler error types.

use std::fmt;

/// A script that threw while being evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationError {
    /// Name the script was evaluated under (file name or call label)
    pub label: String,
    /// Thrown message, e.g. `TypeError: x is not a function`
    pub message: String,
    /// Interpreter stack trace, when the thrown value carries one
    pub stack: Option<String>,
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (in {})", self.message, self.label)?;
        if let Some(stack) = &self.stack {
            write!(f, "\n{}", stack)?;
        }
        Ok(())
    }
}

impl std::error::Error for EvaluationError {}

/// Errors that can occur while starting compilers or compiling components.
#[derive(Debug, thiserror::Error)]
pub enum SvelteError {
    /// A bootstrap or compiler script could not be read or evaluated.
    /// Fatal for the engine that was being set up.
    #[error("Failed to load {script}: {reason}")]
    Bootstrap { script: String, reason: String },

    /// Script evaluation threw
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// The compiler returned something that is not a compile result
    #[error("Unexpected compiler output: {0}")]
    Conversion(String),

    /// The worker thread owning a pooled compiler has died
    #[error("Compiler worker {0} is no longer running")]
    WorkerLost(usize),
}
