/// `date_format(date, format)` — format a date value with a chrono strftime
/// pattern, e.g. `date_format(date, '%Y-%m-%d')`. A string argument is
/// accepted when it parses as RFC 3339.
use chrono::{DateTime, Utc};

use crate::backend::RegistryBackend;
use crate::error::EvalError;
use crate::functions::{require, Function};
use crate::value::Value;

pub struct DateFormat;

impl Function for DateFormat {
    fn call(&self, _backend: &RegistryBackend, args: Vec<Value>) -> Result<Value, EvalError> {
        require("date_format", &args, 2)?;

        let date = match &args[0] {
            Value::DateTime(dt) => *dt,
            Value::String(text) => DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    EvalError::dispatch("date_format", format!("'{}': {}", text, e))
                })?,
            other => {
                return Err(EvalError::dispatch(
                    "date_format",
                    format!("expected a date, got '{}'", other),
                ))
            }
        };
        let format = args[1]
            .as_str()
            .ok_or_else(|| EvalError::dispatch("date_format", "format must be a string"))?;

        Ok(Value::String(date.format(format).to_string()))
    }
}

pub fn register(backend: &mut RegistryBackend) {
    backend.register("date_format", DateFormat);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_date_values() {
        let backend = RegistryBackend::new();
        let date = Utc.with_ymd_and_hms(2019, 12, 7, 10, 30, 0).unwrap();
        let args = vec![Value::DateTime(date), Value::from("%Y-%m-%d")];
        assert_eq!(
            DateFormat.call(&backend, args).unwrap(),
            Value::String("2019-12-07".into())
        );
    }

    #[test]
    fn accepts_rfc3339_strings() {
        let backend = RegistryBackend::new();
        let args = vec![
            Value::from("2019-12-07T10:30:00Z"),
            Value::from("%H:%M"),
        ];
        assert_eq!(
            DateFormat.call(&backend, args).unwrap(),
            Value::String("10:30".into())
        );
    }
}
