//! Bindings stored per symbol in an environment.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use concuma_foundation::{SymbolId, Value};

use crate::environment::EnvRef;
use crate::names::NameTable;
use crate::native::NativeFn;

/// Shared, mutable binding cell.
pub type BindingRef = Rc<RefCell<Binding>>;

/// Module path of a declared entity, ending with its own symbol.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName(Rc<[SymbolId]>);

impl QualifiedName {
    /// Creates a name from its module path (outermost first) and own symbol.
    #[must_use]
    pub fn new(path: &[SymbolId], symbol: SymbolId) -> Self {
        Self(path.iter().copied().chain(std::iter::once(symbol)).collect())
    }

    /// The entity's own symbol.
    #[must_use]
    pub fn symbol(&self) -> SymbolId {
        self.0.last().copied().unwrap_or(SymbolId(0))
    }

    /// The full path, outermost first.
    #[must_use]
    pub fn path(&self) -> &[SymbolId] {
        &self.0
    }

    /// The enclosing module path, without the entity's own symbol.
    #[must_use]
    pub fn parent_path(&self) -> &[SymbolId] {
        &self.0[..self.0.len().saturating_sub(1)]
    }

    /// Joins the declared names of every path segment with `.`.
    #[must_use]
    pub fn render(&self, names: &NameTable) -> String {
        self.0
            .iter()
            .map(|&symbol| names.display(symbol))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// A user function: parameters, body offset, and captured scope.
pub struct Function {
    /// Qualified name.
    pub name: QualifiedName,
    /// Parameter symbols, in call order.
    pub params: Vec<SymbolId>,
    /// Offset of the body statement.
    pub body: usize,
    /// Scope holding the declared parameters; calls run in a child of it.
    pub closure: EnvRef,
}

/// A class declaration. Member statements are recorded, not executed.
pub struct Class {
    /// Qualified name.
    pub name: QualifiedName,
    /// Offsets of the field declaration statements.
    pub variable_offsets: Vec<usize>,
    /// Offsets of the method declaration statements.
    pub method_offsets: Vec<usize>,
    /// Scope the class was declared in.
    pub closure: EnvRef,
}

/// An executed module body.
pub struct ModuleScope {
    /// Qualified name.
    pub name: QualifiedName,
    /// Scope populated by the module's statements.
    pub env: EnvRef,
}

/// Tagged binding stored per symbol.
#[derive(Debug)]
pub enum Binding {
    /// Value cell; `const` cells reject assignment.
    Var {
        /// Whether the variable was declared `const`.
        is_const: bool,
        /// Current value.
        value: Value,
    },
    /// User function.
    Function(Rc<Function>),
    /// Class declaration.
    Class(Rc<Class>),
    /// Module namespace.
    Env(Rc<ModuleScope>),
    /// Imported host function.
    ExtFunction {
        /// Name the import bound it under (the alias, when one was given).
        name: QualifiedName,
        /// The registered host function.
        native: NativeFn,
    },
}

impl Binding {
    /// Creates an uninitialized, mutable variable.
    #[must_use]
    pub fn uninitialized() -> Self {
        Self::Var {
            is_const: false,
            value: Value::Null,
        }
    }

    /// The value substituted when this binding is used as a plain value.
    ///
    /// Only variables hold values; every other binding reads as `null`.
    #[must_use]
    pub fn value(&self) -> Value {
        match self {
            Self::Var { value, .. } => value.clone(),
            _ => Value::Null,
        }
    }

    /// Short description of the binding kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Var { .. } => "variable",
            Self::Function(_) => "function",
            Self::Class(_) => "class",
            Self::Env(_) => "module",
            Self::ExtFunction { .. } => "host function",
        }
    }

    /// Printed form: a variable's value, or `<qualified.name>` for anything else.
    #[must_use]
    pub fn render(&self, names: &NameTable) -> String {
        match self {
            Self::Var { value, .. } => value.to_string(),
            Self::Function(function) => format!("<{}>", function.name.render(names)),
            Self::Class(class) => format!("<{}>", class.name.render(names)),
            Self::Env(module) => format!("<{}>", module.name.render(names)),
            Self::ExtFunction { name, .. } => format!("<{}>", name.render(names)),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("variable_offsets", &self.variable_offsets)
            .field("method_offsets", &self.method_offsets)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ModuleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleScope")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Result of evaluating an expression.
///
/// `Var` expressions yield the binding itself so that callers can tell an
/// assignable reference from a computed value.
#[derive(Debug)]
pub(crate) enum Operand {
    /// A computed value.
    Value(Value),
    /// A resolved binding.
    Bound(BindingRef),
}

impl Operand {
    /// Unwraps a binding into its stored value.
    pub(crate) fn into_value(self) -> Value {
        match self {
            Self::Value(value) => value,
            Self::Bound(binding) => binding.borrow().value(),
        }
    }

    /// The module this operand names, if any.
    pub(crate) fn as_module(&self) -> Option<Rc<ModuleScope>> {
        match self {
            Self::Bound(binding) => match &*binding.borrow() {
                Binding::Env(module) => Some(Rc::clone(module)),
                _ => None,
            },
            Self::Value(_) => None,
        }
    }

    /// Printed form.
    pub(crate) fn render(&self, names: &NameTable) -> String {
        match self {
            Self::Value(value) => value.to_string(),
            Self::Bound(binding) => binding.borrow().render(names),
        }
    }
}
