use crate::ast::{Arg, ParseResult};
use crate::error::{EvalError, ParseError};
use crate::parser;
use crate::value::{Env, Value};

// ---------------------------------------------------------------------------
// Backend contract
// ---------------------------------------------------------------------------

/// The pluggable half of evaluation: function dispatch plus the resolution of
/// everything that is not a constant or a nested call.
///
/// How raw tokens and operator chains are resolved is entirely the backend's
/// concern: the defaults below treat a raw token as a plain variable name,
/// while a richer backend may hand the text to an embedded comparison/boolean
/// evaluator instead (see [`crate::backend::RegistryBackend`]).
pub trait Backend {
    /// Invoke the function `name` with the given (unresolved) arguments.
    /// Used both for the root call and for every nested call.
    fn dispatch(&self, name: &str, args: &[Arg], env: &Env) -> Result<Value, EvalError>;

    /// Resolve a bare token. Default: look it up as a variable.
    fn resolve_raw(&self, token: &str, env: &Env) -> Result<Value, EvalError> {
        env.get(token)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable(token.to_string()))
    }

    /// Resolve an operator chain. Default: unsupported.
    fn resolve_chain(&self, chain: &[Arg], env: &Env) -> Result<Value, EvalError> {
        let _ = (chain, env);
        Err(EvalError::Invalid(
            "this backend does not support operator chains".to_string(),
        ))
    }
}

/// Resolve an argument list against an environment: constants pass through,
/// nested calls recurse through [`Backend::dispatch`], everything else is
/// forwarded to the backend. Errors propagate; there is no partial result.
pub fn resolve_args<B: Backend + ?Sized>(
    backend: &B,
    args: &[Arg],
    env: &Env,
) -> Result<Vec<Value>, EvalError> {
    args.iter()
        .map(|arg| resolve_arg(backend, arg, env))
        .collect()
}

pub(crate) fn resolve_arg<B: Backend + ?Sized>(
    backend: &B,
    arg: &Arg,
    env: &Env,
) -> Result<Value, EvalError> {
    match arg {
        Arg::Constant(text) => Ok(Value::String(text.clone())),
        Arg::Call(nested) => resolve_result(backend, nested, env),
        Arg::Raw(token) => backend.resolve_raw(token, env),
        Arg::OperatorChain(chain) => backend.resolve_chain(chain, env),
        Arg::Operator(op) => Err(EvalError::Invalid(format!(
            "stray operator '{}' outside a chain",
            op
        ))),
    }
}

fn resolve_result<B: Backend + ?Sized>(
    backend: &B,
    result: &ParseResult,
    env: &Env,
) -> Result<Value, EvalError> {
    match result {
        ParseResult::Func { name, args } => backend.dispatch(name, args, env),
        ParseResult::Raw(text) => backend.resolve_raw(text, env),
        ParseResult::OperatorFunc(arg) => resolve_arg(backend, arg, env),
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

/// A parsed expression bound to a backend, ready to run against any number of
/// environments. Evaluation never mutates the parsed tree, so one executor
/// can serve concurrent evaluations with independent environments.
pub struct Executor<B> {
    expression: String,
    parsed: ParseResult,
    backend: B,
}

impl<B: Backend> Executor<B> {
    pub fn new(expression: &str, backend: B) -> Result<Self, ParseError> {
        Ok(Self {
            expression: expression.trim().to_string(),
            parsed: parser::parse(expression)?,
            backend,
        })
    }

    /// The original expression text.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The root function name, when the expression is a call.
    pub fn function_name(&self) -> Option<&str> {
        match &self.parsed {
            ParseResult::Func { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Evaluate against `env`. A non-call expression is forwarded whole to
    /// the backend; a call is dispatched by name.
    pub fn execute(&self, env: &Env) -> Result<Value, EvalError> {
        resolve_result(&self.backend, &self.parsed, env)
    }
}
