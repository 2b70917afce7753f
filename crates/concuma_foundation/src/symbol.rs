//! Compiler-assigned symbol identifiers.

use std::fmt;

/// Symbol identifier assigned by the compiler.
///
/// Unique within its declaring scope. Used as the key for environment lookups
/// and as the key into the program's name table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub i32);

impl SymbolId {
    /// Returns the raw identifier.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl From<i32> for SymbolId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
