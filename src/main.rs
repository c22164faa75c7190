use std::env;
use std::io::{self, Read};

use callex::{Env, Executor, RegistryBackend, Value};

fn main() {
    let args: Vec<String> = env::args().collect();

    let expression = if args.len() > 1 {
        args[1].clone()
    } else {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            eprintln!("Error reading stdin: {}", e);
            std::process::exit(1);
        }
        buf
    };

    // Optional second argument: the environment as a JSON object.
    let environment: Env = if args.len() > 2 {
        match serde_json::from_str::<serde_json::Value>(&args[2]) {
            Ok(serde_json::Value::Object(entries)) => entries
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect(),
            Ok(_) => {
                eprintln!("Error: environment must be a JSON object");
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("Error parsing environment: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Env::new()
    };

    let executor = match Executor::new(&expression, RegistryBackend::with_builtins()) {
        Ok(executor) => executor,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    match executor.execute(&environment) {
        Ok(Value::Null) => {}
        Ok(value) => println!("{}", value),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
