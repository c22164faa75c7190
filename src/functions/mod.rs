use crate::backend::RegistryBackend;
use crate::error::EvalError;
use crate::value::Value;

// ---------------------------------------------------------------------------
// Core trait
// ---------------------------------------------------------------------------

/// Implement this trait to add a new built-in function to the registry
/// backend.
///
/// Arguments arrive already resolved against the environment; constants are
/// strings, nested calls are their results. Return the function's value, or
/// an [`EvalError::Dispatch`] when the arguments do not fit.
pub trait Function: Send + Sync {
    fn call(&self, backend: &RegistryBackend, args: Vec<Value>) -> Result<Value, EvalError>;
}

/// Arity/shape helper shared by the builtins.
pub(crate) fn require(
    function: &str,
    args: &[Value],
    count: usize,
) -> Result<(), EvalError> {
    if args.len() < count {
        return Err(EvalError::dispatch(
            function,
            format!("requires {} argument(s), got {}", count, args.len()),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Built-in modules
// ---------------------------------------------------------------------------

pub mod datetime; // date_format
pub mod ifs;      // ifs — multi-branch conditional
pub mod json;     // toJson / jsonToMap / jsonToList
pub mod print;    // print / println / output
pub mod strings;  // substring / contains / replace

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Register every built-in with the backend.
pub fn register_all(backend: &mut RegistryBackend) {
    datetime::register(backend);
    ifs::register(backend);
    json::register(backend);
    print::register(backend);
    strings::register(backend);
}
