use std::{env, fs, process::ExitCode, time::Instant};

use rill::{execute, Context, ContextConfig, StderrObservability};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let file_path = if args.len() > 1 { &args[1] } else { "example.rill.json" };
    let source = match read_file(file_path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let script: rill::Script = match serde_json::from_str(&source) {
        Ok(script) => script,
        Err(err) => {
            eprintln!("error: malformed script AST in {file_path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let config = ContextConfig { observability: std::rc::Rc::new(StderrObservability), ..ContextConfig::default() };
    let ctx = match Context::new_root(config) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    match execute(&script, ctx) {
        Ok(outcome) => {
            let elapsed = start.elapsed();
            eprintln!("success after: {elapsed:?}");
            println!("{}", rill::value::canonical_json(&outcome.value));
            ExitCode::SUCCESS
        }
        Err(err) => {
            let elapsed = start.elapsed();
            eprintln!("error after: {elapsed:?}\n{err}");
            ExitCode::FAILURE
        }
    }
}

fn read_file(file_path: &str) -> Result<String, String> {
    eprintln!("Reading script: {file_path}");
    match fs::metadata(file_path) {
        Ok(metadata) => {
            if !metadata.is_file() {
                return Err(format!("{file_path} is not a file"));
            }
        }
        Err(err) => return Err(format!("reading {file_path}: {err}")),
    }
    fs::read_to_string(file_path).map_err(|err| format!("reading file: {err}"))
}
