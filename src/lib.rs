//! Concuma - Bytecode virtual machine
//!
//! This crate re-exports all layers of the Concuma system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: concuma_runtime    - Program entry, configuration, error reporting
//! Layer 2: concuma_stdlib     - Standard host functions
//! Layer 1: concuma_language   - Decoder, environments, interpreter, emitter
//! Layer 0: concuma_foundation - Core types (Value, SymbolId, Error)
//! ```

pub use concuma_foundation as foundation;
pub use concuma_language as language;
pub use concuma_runtime as runtime;
pub use concuma_stdlib as stdlib;
