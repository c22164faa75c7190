/// The parsed form of one expression.
///
/// `funcA(funcB())` parses to a `Func` whose single argument holds the
/// `Func` result of `funcB()`, nesting arbitrarily deep. Text that contains
/// no top-level call at all (`a>b`, a lone variable name, a parenthesized
/// sub-expression) stays `Raw` and is resolved by the evaluation backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult {
    /// A true function call: `name(args...)`. `args` may be empty.
    Func { name: String, args: Vec<Arg> },
    /// No top-level call; carries the original text verbatim.
    Raw(String),
    /// A call whose own name started with operator characters; wraps the
    /// single argument holding the operator chain.
    OperatorFunc(Box<Arg>),
}

impl ParseResult {
    pub fn func(name: impl Into<String>, args: Vec<Arg>) -> Self {
        Self::Func { name: name.into(), args }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    pub fn operator_func(arg: Arg) -> Self {
        Self::OperatorFunc(Box::new(arg))
    }

    pub fn is_func(&self) -> bool {
        matches!(self, Self::Func { .. })
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}

/// One argument slot inside a call, or one element of an operator chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// A quoted string literal, quotes already stripped.
    Constant(String),
    /// A nested parse result. Usually `Func`; a parenthesized sub-expression
    /// like `(2-1)` nests as `Raw`.
    Call(ParseResult),
    /// A bare token: variable reference or sub-expression forwarded to the
    /// backend verbatim (trimmed).
    Raw(String),
    /// An operator chain: `Operator` and `Call` elements in source order,
    /// e.g. `!contains(a,'x')` or `contains(..) && contains(..)`.
    OperatorChain(Vec<Arg>),
    /// A single operator token (`&&`, `>=`, ...); only ever found inside an
    /// `OperatorChain`.
    Operator(String),
}
