use thiserror::Error;

/// Malformed expression text. Parse errors abort the whole parse; no partial
/// AST is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expression can not be empty")]
    Empty,
    /// End of text reached with an unclosed quote or parenthesis.
    #[error("end char miss '{0}'")]
    Unterminated(char),
    /// Two independent values in one comma group, or an operator prefix
    /// attached to something that is not a call.
    #[error("ambiguous argument segment: '{0}'")]
    AmbiguousSegment(String),
}

/// Evaluation failure. Errors from nested calls propagate up through every
/// enclosing resolution; there is no partial evaluation and no retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("unknown function: '{0}'")]
    UnknownFunction(String),
    /// The backend found the function but could not invoke it (arity
    /// mismatch, incompatible argument, runtime failure).
    #[error("{function}: {message}")]
    Dispatch { function: String, message: String },
    #[error("undefined variable: '{0}'")]
    UndefinedVariable(String),
    /// A raw sub-expression or operator chain the backend could not resolve.
    #[error("invalid expression: {0}")]
    Invalid(String),
}

impl EvalError {
    pub fn dispatch(function: &str, message: impl Into<String>) -> Self {
        Self::Dispatch {
            function: function.to_string(),
            message: message.into(),
        }
    }
}

/// Either phase's failure, for callers that parse and evaluate in one step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}
