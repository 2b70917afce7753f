//! Core values, coercion rules, and error types for the Concuma VM.
//!
//! This crate provides:
//! - [`Value`] - The runtime value space (null, bool, int, float, string)
//! - [`ValueType`] - Type descriptors used in diagnostics
//! - [`SymbolId`] - Compiler-assigned symbol identifiers
//! - [`coerce`] - Arithmetic, comparison, and truthiness rules with numeric promotion
//! - [`Error`] - Categorized runtime errors with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod coerce;
pub mod error;
pub mod symbol;
pub mod types;
pub mod value;

pub use error::{Error, ErrorCategory, ErrorContext, ErrorKind, ExecutionLimit};
pub use symbol::SymbolId;
pub use types::{Arity, ValueType};
pub use value::Value;

/// Result type alias using the Concuma error type.
pub type Result<T> = std::result::Result<T, Error>;
