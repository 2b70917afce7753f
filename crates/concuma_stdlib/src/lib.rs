//! Standard host functions for Concuma programs.
//!
//! Scripts reach these through the Import opcode once a host has registered
//! them:
//! - Math functions (`abs`, `floor`, `ceil`, `sqrt`, `pow`, `min`, `max`)
//! - String functions (`len`, `upper`, `lower`, `str`)
//! - Time (`clock`)
//!
//! ```
//! use concuma_language::NativeRegistry;
//!
//! let mut registry = NativeRegistry::new();
//! concuma_stdlib::register(&mut registry).unwrap();
//! assert!(registry.contains("sqrt"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod math;
pub mod string;
pub mod time;

use concuma_foundation::{Arity, Result, Value};
use concuma_language::{NativeFn, NativeRegistry, Vm};

type Native = fn(&[Value]) -> Result<Value>;

const NATIVES: &[(&str, Arity, Native)] = &[
    ("abs", Arity::Exact(1), math::abs),
    ("floor", Arity::Exact(1), math::floor),
    ("ceil", Arity::Exact(1), math::ceil),
    ("sqrt", Arity::Exact(1), math::sqrt),
    ("pow", Arity::Exact(2), math::pow),
    ("min", Arity::Variadic(1), math::min),
    ("max", Arity::Variadic(1), math::max),
    ("len", Arity::Exact(1), string::len),
    ("upper", Arity::Exact(1), string::upper),
    ("lower", Arity::Exact(1), string::lower),
    ("str", Arity::Exact(1), string::str),
    ("clock", Arity::Exact(0), time::clock),
];

/// Every standard host function, ready to register.
#[must_use]
pub fn natives() -> Vec<NativeFn> {
    NATIVES
        .iter()
        .map(|&(name, arity, action)| NativeFn::new(name, arity, action))
        .collect()
}

/// Registers every standard host function.
///
/// Fails if any name is already taken.
pub fn register(registry: &mut NativeRegistry) -> Result<()> {
    for native in natives() {
        registry.register(native)?;
    }
    tracing::debug!(count = NATIVES.len(), "standard natives registered");
    Ok(())
}

/// Creates a VM with the standard host functions registered.
pub fn vm_with_stdlib(mut vm: Vm) -> Result<Vm> {
    register(vm.natives_mut())?;
    Ok(vm)
}
