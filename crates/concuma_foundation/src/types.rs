//! Type descriptors for runtime values and callable arities.

use std::fmt;

/// Runtime type of a [`Value`](crate::Value).
///
/// Used in diagnostics and by the coercion rules to describe the operands
/// that were rejected.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// The null type (only value: `null`).
    Null,
    /// Boolean type.
    Bool,
    /// 32-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// String type.
    String,
}

/// Function arity specification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly N arguments.
    Exact(usize),
    /// Between min and max arguments (inclusive).
    Range(usize, usize),
    /// At least N arguments, then any number more.
    Variadic(usize),
}

impl ValueType {
    /// Returns true for the numeric types (`int` and `float`).
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Returns the lowercase name of this type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
        }
    }
}

impl Arity {
    /// Returns true if `count` arguments satisfy this arity.
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => count == n,
            Self::Range(min, max) => count >= min && count <= max,
            Self::Variadic(min) => count >= min,
        }
    }

    /// Returns true if the arity can be satisfied by at least one argument count.
    #[must_use]
    pub const fn is_well_formed(self) -> bool {
        match self {
            Self::Range(min, max) => min <= max,
            Self::Exact(_) | Self::Variadic(_) => true,
        }
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Range(min, max) => write!(f, "{min}..={max}"),
            Self::Variadic(min) => write!(f, "{min} or more"),
        }
    }
}
