use crate::error::EvalError;
use crate::value::Value;

/// Apply a prefix operator from an operator chain or a raw sub-expression.
pub(crate) fn apply_unary(op: &str, value: Value) -> Result<Value, EvalError> {
    match op {
        "!" => Ok(Value::Bool(!value.is_truthy())),
        "-" => value
            .as_number()
            .map(|n| Value::Number(-n))
            .ok_or_else(|| EvalError::Invalid(format!("cannot negate '{}'", value))),
        "+" => Ok(value),
        _ => Err(EvalError::Invalid(format!(
            "unsupported unary operator '{}'",
            op
        ))),
    }
}

/// Apply an infix operator.
///
/// Comparisons are numeric when both sides coerce to numbers and fall back to
/// lexicographic string comparison otherwise. `+` adds two numbers and
/// concatenates when either side is a string.
pub(crate) fn apply_binary(op: &str, left: Value, right: Value) -> Result<Value, EvalError> {
    match op {
        "&&" => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
        "||" => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
        "==" | "=" => Ok(Value::Bool(equals(&left, &right))),
        "!=" => Ok(Value::Bool(!equals(&left, &right))),
        ">" | "<" | ">=" | "<=" => compare(op, &left, &right),
        "+" => add(left, right),
        "-" | "*" | "/" | "%" => arithmetic(op, &left, &right),
        _ => Err(EvalError::Invalid(format!(
            "unsupported operator '{}'",
            op
        ))),
    }
}

fn equals(left: &Value, right: &Value) -> bool {
    if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
        l == r
    } else {
        left == right || left.to_string() == right.to_string()
    }
}

fn compare(op: &str, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let ordering = if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
        l.partial_cmp(&r)
    } else {
        Some(left.to_string().cmp(&right.to_string()))
    };
    let Some(ordering) = ordering else {
        return Err(EvalError::Invalid(format!(
            "cannot compare '{}' with '{}'",
            left, right
        )));
    };
    let result = match op {
        ">" => ordering.is_gt(),
        "<" => ordering.is_lt(),
        ">=" => ordering.is_ge(),
        "<=" => ordering.is_le(),
        _ => unreachable!("checked by caller"),
    };
    Ok(Value::Bool(result))
}

fn add(left: Value, right: Value) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
        (Value::String(_), _) | (_, Value::String(_)) => {
            Ok(Value::String(format!("{}{}", left, right)))
        }
        _ => match (left.as_number(), right.as_number()) {
            (Some(l), Some(r)) => Ok(Value::Number(l + r)),
            _ => Err(EvalError::Invalid(format!(
                "cannot add '{}' and '{}'",
                left, right
            ))),
        },
    }
}

fn arithmetic(op: &str, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (Some(l), Some(r)) = (left.as_number(), right.as_number()) else {
        return Err(EvalError::Invalid(format!(
            "cannot apply '{}' to '{}' and '{}'",
            op, left, right
        )));
    };
    match op {
        "-" => Ok(Value::Number(l - r)),
        "*" => Ok(Value::Number(l * r)),
        "/" => {
            if r == 0.0 {
                Err(EvalError::Invalid("division by zero".to_string()))
            } else {
                Ok(Value::Number(l / r))
            }
        }
        "%" => {
            if r == 0.0 {
                Err(EvalError::Invalid("modulo by zero".to_string()))
            } else {
                Ok(Value::Number(l % r))
            }
        }
        _ => unreachable!("checked by caller"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_prefers_numbers_over_strings() {
        // "10" > "9" numerically, though "10" < "9" lexicographically.
        let v = apply_binary(">", Value::String("10".into()), Value::String("9".into())).unwrap();
        assert_eq!(v, Value::Bool(true));

        let v = apply_binary(">", Value::String("b".into()), Value::String("a".into())).unwrap();
        assert_eq!(v, Value::Bool(true));
    }

    #[test]
    fn plus_concatenates_strings() {
        let v = apply_binary("+", Value::String("1".into()), Value::String("2".into())).unwrap();
        assert_eq!(v, Value::String("12".into()));

        let v = apply_binary("+", Value::Number(1.0), Value::Number(2.0)).unwrap();
        assert_eq!(v, Value::Number(3.0));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert!(apply_binary("/", Value::Number(1.0), Value::Number(0.0)).is_err());
        assert!(apply_binary("%", Value::Number(1.0), Value::Number(0.0)).is_err());
    }

    #[test]
    fn unary_not_follows_truthiness() {
        assert_eq!(
            apply_unary("!", Value::Bool(false)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            apply_unary("!", Value::String("x".into())).unwrap(),
            Value::Bool(false)
        );
    }
}
