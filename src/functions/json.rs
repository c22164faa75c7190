/// JSON helpers.
///
/// - `toJson(value)` — serialize any value to its JSON text.
/// - `jsonToMap(text)` — parse a JSON object into a map value.
/// - `jsonToList(text)` — parse a JSON array into a list value.
use crate::backend::RegistryBackend;
use crate::error::EvalError;
use crate::functions::{require, Function};
use crate::value::Value;

pub struct ToJson;

impl Function for ToJson {
    fn call(&self, _backend: &RegistryBackend, args: Vec<Value>) -> Result<Value, EvalError> {
        require("toJson", &args, 1)?;
        let json = serde_json::to_string(&args[0].to_json())
            .map_err(|e| EvalError::dispatch("toJson", e.to_string()))?;
        Ok(Value::String(json))
    }
}

pub struct JsonToMap;

impl Function for JsonToMap {
    fn call(&self, _backend: &RegistryBackend, args: Vec<Value>) -> Result<Value, EvalError> {
        match parse("jsonToMap", &args)? {
            value @ Value::Map(_) => Ok(value),
            other => Err(EvalError::dispatch(
                "jsonToMap",
                format!("expected a JSON object, got '{}'", other),
            )),
        }
    }
}

pub struct JsonToList;

impl Function for JsonToList {
    fn call(&self, _backend: &RegistryBackend, args: Vec<Value>) -> Result<Value, EvalError> {
        match parse("jsonToList", &args)? {
            value @ Value::List(_) => Ok(value),
            other => Err(EvalError::dispatch(
                "jsonToList",
                format!("expected a JSON array, got '{}'", other),
            )),
        }
    }
}

fn parse(function: &str, args: &[Value]) -> Result<Value, EvalError> {
    require(function, args, 1)?;
    let text = args[0]
        .as_str()
        .ok_or_else(|| EvalError::dispatch(function, "argument must be a string"))?;
    let json: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| EvalError::dispatch(function, e.to_string()))?;
    Ok(Value::from(json))
}

pub fn register(backend: &mut RegistryBackend) {
    backend.register("toJson", ToJson);
    backend.register("jsonToMap", JsonToMap);
    backend.register("jsonToList", JsonToList);
}
