//! Concuma CLI entry point.
//!
//! Usage: `concuma <program>`

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use concuma_runtime::{RuntimeConfig, RuntimeError, init_tracing, run_file};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let [path] = args.as_slice() else {
        eprintln!("usage: concuma <program>");
        return ExitCode::from(2);
    };

    match run(PathBuf::from(path)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31m{}\x1b[0m", e.report());
            ExitCode::FAILURE
        }
    }
}

fn run(path: PathBuf) -> Result<(), RuntimeError> {
    let config = RuntimeConfig::from_env()?;
    init_tracing(config.log_filter.as_deref());
    run_file(&path, &config)?;
    Ok(())
}
