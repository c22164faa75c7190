//! Evaluation of raw sub-expressions (`a>b`, `a+b`, `(2-1)*3`, ...) that the
//! parser forwarded verbatim. This fills the role the original system
//! delegated to an embedded expression-evaluation library: comparison and
//! boolean logic over environment variables, with basic arithmetic.

use crate::backend::ops;
use crate::error::EvalError;
use crate::value::{Env, Value};

/// Evaluate a raw token against the environment.
///
/// A plain identifier is a variable lookup; anything else is parsed as an
/// infix expression with the usual precedence (`||` < `&&` < equality <
/// relational < `+ -` < `* / %` < unary).
pub fn eval(text: &str, env: &Env) -> Result<Value, EvalError> {
    let mut scanner = Scanner::new(text, env);
    let value = scanner.or_expr()?;
    scanner.skip_ws();
    match scanner.peek() {
        None => Ok(value),
        Some(c) => Err(EvalError::Invalid(format!(
            "unexpected character '{}' in '{}'",
            c, text
        ))),
    }
}

struct Scanner<'a> {
    chars: Vec<char>,
    pos: usize,
    env: &'a Env,
}

impl<'a> Scanner<'a> {
    fn new(text: &str, env: &'a Env) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            env,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while self.peek().map_or(false, char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Consume `token` if the upcoming characters match it exactly.
    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        let end = self.pos + token.chars().count();
        if end <= self.chars.len()
            && self.chars[self.pos..end].iter().collect::<String>() == token
        {
            self.pos = end;
            true
        } else {
            false
        }
    }

    // -- precedence levels, loosest first --------------------------------

    fn or_expr(&mut self) -> Result<Value, EvalError> {
        let mut left = self.and_expr()?;
        while self.eat("||") {
            let right = self.and_expr()?;
            left = ops::apply_binary("||", left, right)?;
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Value, EvalError> {
        let mut left = self.equality()?;
        while self.eat("&&") {
            let right = self.equality()?;
            left = ops::apply_binary("&&", left, right)?;
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<Value, EvalError> {
        let mut left = self.relational()?;
        loop {
            let op = if self.eat("==") || self.eat("=") {
                "=="
            } else if self.eat("!=") {
                "!="
            } else {
                break;
            };
            let right = self.relational()?;
            left = ops::apply_binary(op, left, right)?;
        }
        Ok(left)
    }

    fn relational(&mut self) -> Result<Value, EvalError> {
        let mut left = self.additive()?;
        loop {
            let op = if self.eat(">=") {
                ">="
            } else if self.eat("<=") {
                "<="
            } else if self.eat(">") {
                ">"
            } else if self.eat("<") {
                "<"
            } else {
                break;
            };
            let right = self.additive()?;
            left = ops::apply_binary(op, left, right)?;
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<Value, EvalError> {
        let mut left = self.term()?;
        loop {
            let op = if self.eat("+") {
                "+"
            } else if self.eat("-") {
                "-"
            } else {
                break;
            };
            let right = self.term()?;
            left = ops::apply_binary(op, left, right)?;
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Value, EvalError> {
        let mut left = self.unary()?;
        loop {
            let op = if self.eat("*") {
                "*"
            } else if self.eat("/") {
                "/"
            } else if self.eat("%") {
                "%"
            } else {
                break;
            };
            let right = self.unary()?;
            left = ops::apply_binary(op, left, right)?;
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Value, EvalError> {
        self.skip_ws();
        match self.peek() {
            Some('-') => {
                self.bump();
                ops::apply_unary("-", self.unary()?)
            }
            Some('!') if self.peek_next() != Some('=') => {
                self.bump();
                ops::apply_unary("!", self.unary()?)
            }
            Some('+') => {
                self.bump();
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Value, EvalError> {
        self.skip_ws();
        match self.peek() {
            Some('(') => {
                self.bump();
                let value = self.or_expr()?;
                self.skip_ws();
                match self.bump() {
                    Some(')') => Ok(value),
                    _ => Err(EvalError::Invalid("expected ')'".to_string())),
                }
            }
            Some('\'') => self.string_literal(),
            Some(c) if c.is_ascii_digit() => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.identifier(),
            Some(c) => Err(EvalError::Invalid(format!("unexpected character '{}'", c))),
            None => Err(EvalError::Invalid("unexpected end of expression".to_string())),
        }
    }

    fn string_literal(&mut self) -> Result<Value, EvalError> {
        self.bump(); // opening quote
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('\'') => return Ok(Value::String(text)),
                Some(c) => text.push(c),
                None => {
                    return Err(EvalError::Invalid(
                        "unterminated string literal".to_string(),
                    ))
                }
            }
        }
    }

    fn number(&mut self) -> Result<Value, EvalError> {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        text.parse()
            .map(Value::Number)
            .map_err(|_| EvalError::Invalid(format!("invalid number literal '{}'", text)))
    }

    fn identifier(&mut self) -> Result<Value, EvalError> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        match name.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::Null),
            _ => self
                .env
                .get(&name)
                .cloned()
                .ok_or(EvalError::UndefinedVariable(name)),
        }
    }
}
