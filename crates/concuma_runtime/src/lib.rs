//! Program entry, configuration, and error reporting for Concuma.
//!
//! This crate provides:
//! - [`RuntimeConfig`] - Settings read from `CONCUMA_*` environment variables
//! - [`run_file`] - Load a program image from disk and execute it
//! - [`RuntimeError`] - I/O, configuration, and VM failures
//! - [`init_tracing`] - Opt-in structured logging

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;

use std::path::Path;

use concuma_language::{Program, Vm};

pub use config::RuntimeConfig;
pub use error::RuntimeError;
pub use logging::init_tracing;

/// Reads and validates a program image.
pub fn load_program(path: &Path) -> Result<Program, RuntimeError> {
    let bytes = std::fs::read(path).map_err(|source| RuntimeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "program read");
    Ok(Program::load(bytes)?)
}

/// Creates a VM for `config` with the standard host functions registered.
pub fn new_vm(config: &RuntimeConfig) -> Result<Vm, RuntimeError> {
    Ok(concuma_stdlib::vm_with_stdlib(Vm::with_config(
        config.vm.clone(),
    ))?)
}

/// Loads and runs the program at `path`, returning the collected output.
///
/// When `config.vm.echo_output` is set the lines go straight to stdout and
/// the returned list is empty.
pub fn run_file(path: &Path, config: &RuntimeConfig) -> Result<Vec<String>, RuntimeError> {
    let program = load_program(path)?;
    let mut vm = new_vm(config)?;
    vm.run(&program)?;
    Ok(vm.take_output())
}
