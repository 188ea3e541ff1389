//! Embedded script engine.
//!
//! One `ScriptEngine` owns one interpreter context. The context is neither
//! `Send` nor reentrant: an engine stays on the thread that created it and
//! runs one evaluation at a time.
//!
//! Errors constructed by script code get a `stack` property listing the
//! calling functions, innermost first.

use crate::assets::{CompilerSource, BOOTSTRAP_SCRIPTS, COMPILER_SCRIPT};
use crate::error::{EvaluationError, SvelteError};
use boa_engine::{
    js_string, Context, JsError, JsResult, JsString, JsValue, NativeFunction, Source,
};
use std::path::Path;

const STACK_TRACE_SCRIPT: &str = include_str!("../resources/stack-trace.js");
const STACK_TRACE_LABEL: &str = "stack-trace.js";

/// A single interpreter context with the compiler loaded into it
pub struct ScriptEngine {
    context: Context,
}

impl ScriptEngine {
    /// Create an engine with only the interpreter's own globals and stack
    /// trace recording.
    pub fn new() -> Result<Self, SvelteError> {
        let mut engine = Self {
            context: Context::default(),
        };

        engine
            .context
            .register_global_builtin_callable(
                js_string!("__captureStackTrace"),
                0,
                NativeFunction::from_fn_ptr(capture_stack_trace),
            )
            .map_err(|e| engine.describe(e, STACK_TRACE_LABEL))?;
        engine.load_script(STACK_TRACE_LABEL, STACK_TRACE_SCRIPT)?;

        Ok(engine)
    }

    /// Create an engine and load the bootstrap scripts followed by the
    /// compiler script from `source`.
    ///
    /// The first script that fails to load aborts initialization.
    pub fn initialize(source: &CompilerSource) -> Result<Self, SvelteError> {
        let mut engine = Self::new()?;

        for script in BOOTSTRAP_SCRIPTS {
            let code = CompilerSource::Builtin.read(script)?;
            engine.load_script(script, &code)?;
        }

        let code = source.read(COMPILER_SCRIPT)?;
        engine.load_script(COMPILER_SCRIPT, &code)?;

        tracing::debug!(compiler = %source, "script engine initialized");
        Ok(engine)
    }

    fn load_script(&mut self, name: &str, code: &str) -> Result<(), SvelteError> {
        self.evaluate(code, name)
            .map(drop)
            .map_err(|e| SvelteError::Bootstrap {
                script: name.to_string(),
                reason: e.to_string(),
            })
    }

    /// Bind a string to a global name.
    pub fn set_global(&mut self, name: &str, value: &str) -> Result<(), EvaluationError> {
        let global = self.context.global_object();
        let result = global.set(
            JsString::from(name),
            JsString::from(value),
            false,
            &mut self.context,
        );
        result.map(drop).map_err(|e| self.describe(e, name))
    }

    /// Evaluate a script in the global scope and return its completion value.
    ///
    /// `label` names the script in error messages and stack traces.
    pub fn evaluate(&mut self, code: &str, label: &str) -> Result<JsValue, EvaluationError> {
        let source = Source::from_bytes(code).with_path(Path::new(label));
        let result = self.context.eval(source);
        result.map_err(|e| self.describe(e, label))
    }

    /// Evaluate a script and return its value if it is a string.
    pub fn evaluate_string(
        &mut self,
        code: &str,
        label: &str,
    ) -> Result<Option<String>, EvaluationError> {
        let value = self.evaluate(code, label)?;
        Ok(value.as_string().map(JsString::to_std_string_escaped))
    }

    fn describe(&mut self, err: JsError, label: &str) -> EvaluationError {
        let stack = err
            .as_opaque()
            .and_then(JsValue::as_object)
            .and_then(|thrown| thrown.get(js_string!("stack"), &mut self.context).ok())
            .and_then(|stack| stack.as_string().map(JsString::to_std_string_escaped))
            .filter(|stack| !stack.is_empty());

        let message = match err.try_native(&mut self.context) {
            Ok(native) => native.to_string(),
            Err(_) => err.to_string(),
        };

        EvaluationError {
            label: label.to_string(),
            message,
            stack,
        }
    }
}

/// Names of the script functions on the call stack, one `    at <name>` line
/// each. The caller of this native function is not included.
fn capture_stack_trace(
    _this: &JsValue,
    _args: &[JsValue],
    context: &mut Context,
) -> JsResult<JsValue> {
    let mut frames: Vec<String> = context
        .stack_trace()
        .map(|frame| frame.code_block().name().to_std_string_escaped())
        .collect();
    // outermost entry is the interpreter's root frame
    frames.pop();

    let trace = frames
        .iter()
        .map(|name| match name.as_str() {
            "" => "    at <anonymous>".to_string(),
            name => format!("    at {}", name),
        })
        .collect::<Vec<_>>()
        .join("\n");
    Ok(JsString::from(trace).into())
}
