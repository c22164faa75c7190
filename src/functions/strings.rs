/// String helpers.
///
/// - `substring(text, begin, len)` — `len` characters starting at char index
///   `begin`, clamped to the text's length.
/// - `contains(text, needle)` — substring containment.
/// - `replace(text, old, new)` — replace every occurrence.
use crate::backend::RegistryBackend;
use crate::error::EvalError;
use crate::functions::{require, Function};
use crate::value::Value;

fn text_arg<'a>(function: &str, args: &'a [Value], index: usize) -> Result<&'a str, EvalError> {
    args[index].as_str().ok_or_else(|| {
        EvalError::dispatch(
            function,
            format!("argument {} must be a string, got '{}'", index + 1, args[index]),
        )
    })
}

fn index_arg(function: &str, args: &[Value], index: usize) -> Result<usize, EvalError> {
    let number = args[index].as_number().ok_or_else(|| {
        EvalError::dispatch(
            function,
            format!("argument {} must be a number, got '{}'", index + 1, args[index]),
        )
    })?;
    if number < 0.0 || number.fract() != 0.0 {
        return Err(EvalError::dispatch(
            function,
            format!("argument {} must be a non-negative integer", index + 1),
        ));
    }
    Ok(number as usize)
}

pub struct Substring;

impl Function for Substring {
    fn call(&self, _backend: &RegistryBackend, args: Vec<Value>) -> Result<Value, EvalError> {
        require("substring", &args, 3)?;
        let text = text_arg("substring", &args, 0)?;
        let begin = index_arg("substring", &args, 1)?;
        let len = index_arg("substring", &args, 2)?;

        let chars: Vec<char> = text.chars().collect();
        let begin = begin.min(chars.len());
        let end = (begin + len).min(chars.len());
        Ok(Value::String(chars[begin..end].iter().collect()))
    }
}

pub struct Contains;

impl Function for Contains {
    fn call(&self, _backend: &RegistryBackend, args: Vec<Value>) -> Result<Value, EvalError> {
        require("contains", &args, 2)?;
        let text = text_arg("contains", &args, 0)?;
        let needle = text_arg("contains", &args, 1)?;
        Ok(Value::Bool(text.contains(needle)))
    }
}

pub struct Replace;

impl Function for Replace {
    fn call(&self, _backend: &RegistryBackend, args: Vec<Value>) -> Result<Value, EvalError> {
        require("replace", &args, 3)?;
        let text = text_arg("replace", &args, 0)?;
        let old = text_arg("replace", &args, 1)?;
        let new = text_arg("replace", &args, 2)?;
        Ok(Value::String(text.replace(old, new)))
    }
}

pub fn register(backend: &mut RegistryBackend) {
    backend.register("substring", Substring);
    backend.register("contains", Contains);
    backend.register("replace", Replace);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn substring_clamps_to_the_text() {
        let backend = RegistryBackend::new();
        let args = vec![Value::from("hello"), Value::Number(1.0), Value::Number(99.0)];
        assert_eq!(
            Substring.call(&backend, args).unwrap(),
            Value::String("ello".into())
        );
    }

    #[test]
    fn contains_checks_substrings() {
        let backend = RegistryBackend::new();
        let args = vec![Value::from("testa"), Value::from("x")];
        assert_eq!(Contains.call(&backend, args).unwrap(), Value::Bool(false));
    }

    #[test]
    fn replace_rewrites_every_occurrence() {
        let backend = RegistryBackend::new();
        let args = vec![Value::from("aba"), Value::from("a"), Value::from("c")];
        assert_eq!(
            Replace.call(&backend, args).unwrap(),
            Value::String("cbc".into())
        );
    }
}
