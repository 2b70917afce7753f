//! Lexically scoped symbol tables.
//!
//! Environments are reference counted: the scope chain that created an
//! environment and every function, class, or module that captured it share
//! ownership, so popping a scope never invalidates a closure.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use concuma_foundation::{Error, Result, SymbolId};

use crate::binding::{Binding, BindingRef};

/// Shared handle to an environment.
pub type EnvRef = Rc<Environment>;

/// One scope: symbol bindings plus an optional parent.
#[derive(Debug, Default)]
pub struct Environment {
    symbols: RefCell<HashMap<SymbolId, BindingRef>>,
    parent: Option<EnvRef>,
}

impl Environment {
    /// Creates a root environment.
    #[must_use]
    pub fn root() -> EnvRef {
        Rc::new(Self::default())
    }

    /// Creates a child scope of `parent`.
    #[must_use]
    pub fn child(parent: &EnvRef) -> EnvRef {
        Rc::new(Self {
            symbols: RefCell::default(),
            parent: Some(Rc::clone(parent)),
        })
    }

    /// Binds `symbol` in this scope.
    ///
    /// Fails if `symbol` is already bound in this same scope; shadowing a
    /// parent's binding is allowed.
    pub fn add(&self, symbol: SymbolId, binding: Binding) -> Result<BindingRef> {
        let mut symbols = self.symbols.borrow_mut();
        if symbols.contains_key(&symbol) {
            return Err(Error::duplicate_symbol(symbol.to_string()));
        }
        let binding = Rc::new(RefCell::new(binding));
        symbols.insert(symbol, Rc::clone(&binding));
        Ok(binding)
    }

    /// Resolves `symbol` in this scope or the nearest ancestor that binds it.
    #[must_use]
    pub fn lookup(&self, symbol: SymbolId) -> Option<BindingRef> {
        if let Some(binding) = self.symbols.borrow().get(&symbol) {
            return Some(Rc::clone(binding));
        }
        let mut scope = self.parent.as_ref();
        while let Some(env) = scope {
            if let Some(binding) = env.symbols.borrow().get(&symbol) {
                return Some(Rc::clone(binding));
            }
            scope = env.parent.as_ref();
        }
        None
    }

    /// Like [`lookup`](Self::lookup), but an unbound symbol is an error.
    pub fn find(&self, symbol: SymbolId) -> Result<BindingRef> {
        self.lookup(symbol)
            .ok_or_else(|| Error::unknown_symbol(symbol.to_string()))
    }

    /// Returns true if `symbol` is bound in this scope itself.
    #[must_use]
    pub fn contains_local(&self, symbol: SymbolId) -> bool {
        self.symbols.borrow().contains_key(&symbol)
    }

    /// Returns the parent scope.
    #[must_use]
    pub fn exit(&self) -> Option<EnvRef> {
        self.parent.clone()
    }

    /// Number of scopes between this one and the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.parent.as_ref();
        while let Some(env) = scope {
            depth += 1;
            scope = env.parent.as_ref();
        }
        depth
    }
}
