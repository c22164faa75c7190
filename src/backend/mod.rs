//! The shipped evaluation backend: a registry of named functions plus infix
//! semantics for raw sub-expressions and operator chains.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ast::Arg;
use crate::error::EvalError;
use crate::evaluator::{self, Backend};
use crate::functions::Function;
use crate::value::{Env, Value};

mod ops;
pub mod rawexpr;

/// Resolves function calls against a registry of named [`Function`]s and
/// evaluates raw tokens / operator chains with the infix semantics of
/// [`rawexpr`].
pub struct RegistryBackend {
    functions: HashMap<String, Arc<dyn Function>>,
    /// Lines captured from `print`/`println`, mirroring what went to stdout.
    output: Mutex<Vec<String>>,
}

impl RegistryBackend {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
            output: Mutex::new(Vec::new()),
        }
    }

    /// A backend with the whole built-in library registered.
    pub fn with_builtins() -> Self {
        let mut backend = Self::new();
        crate::functions::register_all(&mut backend);
        backend
    }

    pub fn register<F: Function + 'static>(&mut self, name: &str, func: F) {
        self.functions.insert(name.to_string(), Arc::new(func));
    }

    /// Append one line to the captured output buffer.
    pub fn capture_output(&self, line: String) {
        self.output_lock().push(line);
    }

    /// Drain and return everything captured so far.
    pub fn take_output(&self) -> Vec<String> {
        std::mem::take(&mut *self.output_lock())
    }

    fn output_lock(&self) -> MutexGuard<'_, Vec<String>> {
        // A poisoned buffer only means a printing function panicked mid-push;
        // the lines themselves are still usable.
        match self.output.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Fold an operator chain left to right, without precedence: operators in
    /// front of the first value (or directly after another operator) are
    /// unary, the rest binary. Each call element is dispatched before the
    /// fold consumes its value.
    fn eval_chain(&self, chain: &[Arg], env: &Env) -> Result<Value, EvalError> {
        let mut acc: Option<Value> = None;
        let mut binary: Option<&str> = None;
        let mut unary: Vec<&str> = Vec::new();

        for item in chain {
            match item {
                Arg::Operator(op) => {
                    if acc.is_none() || binary.is_some() {
                        unary.push(op.as_str());
                    } else {
                        binary = Some(op.as_str());
                    }
                }
                other => {
                    let mut value = evaluator::resolve_arg(self, other, env)?;
                    for op in unary.drain(..).rev() {
                        value = ops::apply_unary(op, value)?;
                    }
                    acc = Some(match (acc.take(), binary.take()) {
                        (Some(left), Some(op)) => ops::apply_binary(op, left, value)?,
                        (Some(_), None) => {
                            return Err(EvalError::Invalid(
                                "two values without an operator in a chain".to_string(),
                            ))
                        }
                        (None, _) => value,
                    });
                }
            }
        }

        if binary.is_some() || !unary.is_empty() {
            return Err(EvalError::Invalid(
                "operator chain ends with an operator".to_string(),
            ));
        }
        acc.ok_or_else(|| EvalError::Invalid("empty operator chain".to_string()))
    }
}

impl Default for RegistryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for RegistryBackend {
    fn dispatch(&self, name: &str, args: &[Arg], env: &Env) -> Result<Value, EvalError> {
        let func = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
        let resolved = evaluator::resolve_args(self, args, env)?;
        func.call(self, resolved)
    }

    fn resolve_raw(&self, token: &str, env: &Env) -> Result<Value, EvalError> {
        rawexpr::eval(token, env)
    }

    fn resolve_chain(&self, chain: &[Arg], env: &Env) -> Result<Value, EvalError> {
        self.eval_chain(chain, env)
    }
}
