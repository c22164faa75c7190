/// `ifs(cond1, value1, cond2, value2, ...)` — multi-branch conditional:
/// returns the value following the first truthy condition, `null` when no
/// branch matches. Conditions arrive already resolved, so `ifs(a>b,c,...)`
/// sees booleans produced by the backend's raw-expression evaluation.
use crate::backend::RegistryBackend;
use crate::error::EvalError;
use crate::functions::Function;
use crate::value::Value;

pub struct Ifs;

impl Function for Ifs {
    fn call(&self, _backend: &RegistryBackend, args: Vec<Value>) -> Result<Value, EvalError> {
        if args.len() % 2 != 0 {
            return Err(EvalError::dispatch(
                "ifs",
                "requires condition/value pairs",
            ));
        }
        let mut pairs = args.into_iter();
        while let (Some(condition), Some(value)) = (pairs.next(), pairs.next()) {
            if condition.is_truthy() {
                return Ok(value);
            }
        }
        Ok(Value::Null)
    }
}

pub fn register(backend: &mut RegistryBackend) {
    backend.register("ifs", Ifs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn returns_the_first_matching_branch() {
        let backend = RegistryBackend::new();
        let args = vec![
            Value::Bool(false),
            Value::from("A"),
            Value::Bool(true),
            Value::from("B"),
        ];
        assert_eq!(Ifs.call(&backend, args).unwrap(), Value::String("B".into()));
    }

    #[test]
    fn no_match_yields_null() {
        let backend = RegistryBackend::new();
        let args = vec![Value::Bool(false), Value::from("A")];
        assert_eq!(Ifs.call(&backend, args).unwrap(), Value::Null);
    }

    #[test]
    fn odd_argument_count_is_rejected() {
        let backend = RegistryBackend::new();
        assert!(Ifs.call(&backend, vec![Value::Bool(true)]).is_err());
    }
}
