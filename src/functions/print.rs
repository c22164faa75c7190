/// `print` / `println` — write the arguments to stdout, space-separated, and
/// append the same text to the backend's captured output buffer. `println`
/// terminates the line. Both return the printed text so they compose inside
/// larger expressions.
///
/// `output` — identity pass-through: returns its first argument unchanged.
use crate::backend::RegistryBackend;
use crate::error::EvalError;
use crate::functions::Function;
use crate::value::Value;

pub struct Print;

impl Function for Print {
    fn call(&self, backend: &RegistryBackend, args: Vec<Value>) -> Result<Value, EvalError> {
        let text = join(&args);
        backend.capture_output(text.clone());
        print!("{}", text);
        Ok(Value::String(text))
    }
}

pub struct Println;

impl Function for Println {
    fn call(&self, backend: &RegistryBackend, args: Vec<Value>) -> Result<Value, EvalError> {
        let text = join(&args);
        backend.capture_output(text.clone());
        println!("{}", text);
        Ok(Value::String(text))
    }
}

pub struct Output;

impl Function for Output {
    fn call(&self, _backend: &RegistryBackend, mut args: Vec<Value>) -> Result<Value, EvalError> {
        if args.is_empty() {
            return Ok(Value::Null);
        }
        Ok(args.swap_remove(0))
    }
}

fn join(args: &[Value]) -> String {
    args.iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn register(backend: &mut RegistryBackend) {
    backend.register("print", Print);
    backend.register("println", Println);
    backend.register("output", Output);
}
