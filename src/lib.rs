//! callex — parser and evaluator for function-call expressions.
//!
//! The language is call syntax with nested calls, single-quoted string
//! literals, bare variable references, and operators that may appear fused
//! into a call's name:
//!
//! ```text
//! println(a+b)
//! ifs(a>b, c, a1>b1, c1)
//! print(toJson(date_format(date, '%Y-%m-%d')))
//! print(contains(a,'x') && !contains(b,'y'))
//! ```
//!
//! [`parser::parse`] turns an expression into an immutable [`ast::ParseResult`];
//! an [`evaluator::Executor`] walks it against an [`value::Env`], delegating
//! function dispatch and raw-token resolution to a [`evaluator::Backend`].
//! [`backend::RegistryBackend`] is the shipped backend: a registry of named
//! functions plus infix semantics for raw sub-expressions.
//!
//! ```
//! use callex::{evaluate, Env, Value};
//!
//! let mut env = Env::new();
//! env.insert("a".to_string(), Value::Number(1.0));
//! env.insert("b".to_string(), Value::Number(2.0));
//!
//! let result = evaluate("output(a+b)", &env).unwrap();
//! assert_eq!(result, Value::Number(3.0));
//! ```

pub mod ast;
pub mod backend;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod value;

pub use ast::{Arg, ParseResult};
pub use backend::RegistryBackend;
pub use error::{Error, EvalError, ParseError};
pub use evaluator::{Backend, Executor};
pub use functions::Function;
pub use parser::parse;
pub use value::{Env, Value};

/// Parse and evaluate `expression` against `env` with the built-in function
/// library.
pub fn evaluate(expression: &str, env: &Env) -> Result<Value, Error> {
    let executor = Executor::new(expression, RegistryBackend::with_builtins())?;
    Ok(executor.execute(env)?)
}
