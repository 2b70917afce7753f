//! Decoder, environment model, and interpreter for Concuma bytecode.
//!
//! This crate provides:
//! - [`Program`] - A loaded program image with its symbol name table
//! - [`Cursor`] - Little-endian reader over the instruction stream
//! - [`Environment`] - Lexically scoped symbol tables
//! - [`NativeRegistry`] - Host functions reachable through Import
//! - [`Vm`] - The execute-or-skip interpreter
//! - [`emit`] - A bytecode emitter for building program images

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod binding;
pub mod config;
pub mod cursor;
pub mod emit;
pub mod environment;
pub mod names;
pub mod native;
pub mod opcode;
pub mod program;
pub mod skip;
mod stack;
pub mod vm;

pub use binding::{Binding, BindingRef, QualifiedName};
pub use config::{DEFAULT_MAX_CALL_DEPTH, VmConfig};
pub use cursor::Cursor;
pub use environment::{EnvRef, Environment};
pub use names::NameTable;
pub use native::{NativeAction, NativeFn, NativeRegistry};
pub use program::{CODE_START, Program};
pub use vm::{Flow, Vm};
