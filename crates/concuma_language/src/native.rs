//! Host callable registry.
//!
//! Hosts register native functions by name before a script runs; scripts bind
//! them with the Import opcode. Every native takes its arguments as a slice of
//! opaque [`Value`]s and returns a [`Value`], so the "any value" parameter
//! contract holds by construction. Registration checks the remaining shape
//! (non-empty unique name, satisfiable arity) up front.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use concuma_foundation::{Arity, Error, ErrorKind, Result, Value};

/// Signature shared by every host function.
pub type NativeAction = dyn Fn(&[Value]) -> Result<Value>;

/// A host function callable from scripts.
#[derive(Clone)]
pub struct NativeFn {
    name: Rc<str>,
    arity: Arity,
    action: Rc<NativeAction>,
}

impl NativeFn {
    /// Wraps a host closure.
    pub fn new(
        name: impl Into<Rc<str>>,
        arity: Arity,
        action: impl Fn(&[Value]) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            action: Rc::new(action),
        }
    }

    /// Registered name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared arity.
    #[must_use]
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Checks the argument count, then invokes the host closure.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        if !self.arity.accepts(args.len()) {
            return Err(Error::arity_mismatch(
                self.name.to_string(),
                self.arity.to_string(),
                args.len(),
            ));
        }
        (self.action)(args)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}/{}>", self.name, self.arity)
    }
}

/// Name → host function mapping consulted by the Import opcode.
#[derive(Clone, Debug, Default)]
pub struct NativeRegistry {
    natives: HashMap<Rc<str>, NativeFn>,
}

impl NativeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a host function.
    ///
    /// Fails on an empty or already registered name, or an arity no call
    /// could satisfy.
    pub fn register(&mut self, native: NativeFn) -> Result<()> {
        let reject = |reason: &str| -> Result<()> {
            Err(Error::new(ErrorKind::InvalidNative {
                name: native.name().to_string(),
                reason: reason.to_string(),
            }))
        };
        if native.name().is_empty() {
            return reject("name is empty");
        }
        if !native.arity().is_well_formed() {
            return reject("arity range is empty");
        }
        if self.natives.contains_key(native.name()) {
            return reject("name is already registered");
        }
        self.natives.insert(Rc::clone(&native.name), native);
        Ok(())
    }

    /// Convenience wrapper around [`register`](Self::register).
    pub fn register_fn(
        &mut self,
        name: &str,
        arity: Arity,
        action: impl Fn(&[Value]) -> Result<Value> + 'static,
    ) -> Result<()> {
        self.register(NativeFn::new(name, arity, action))
    }

    /// Looks up a host function by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NativeFn> {
        self.natives.get(name)
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.natives.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.natives.keys().map(AsRef::as_ref).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.natives.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.natives.is_empty()
    }

    /// Removes every registration.
    pub fn clear(&mut self) {
        self.natives.clear();
    }
}
