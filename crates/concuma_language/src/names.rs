//! Symbol name table loader.
//!
//! The tail of every program image maps symbol ids to their declared names:
//! a sequence of `{u32 length, length bytes, i32 symbol}` records running to
//! the end of the buffer. Names are only used for display and for resolving
//! imports against the host registry.

use std::collections::HashMap;

use concuma_foundation::{Error, Result, SymbolId};

use crate::cursor::Cursor;

/// Mapping from symbol id to its declared name.
#[derive(Clone, Debug, Default)]
pub struct NameTable {
    names: HashMap<SymbolId, String>,
}

impl NameTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the name table that starts at `offset` and runs to the end of `bytes`.
    pub fn load(bytes: &[u8], offset: usize) -> Result<Self> {
        let mut cursor = Cursor::at(bytes, offset);
        let mut table = Self::new();
        while !cursor.is_end() {
            let name = cursor.read_string()?;
            let symbol = cursor.read_symbol();
            table.insert(symbol, name)?;
        }
        Ok(table)
    }

    /// Adds a name. Fails if the symbol already has one.
    pub fn insert(&mut self, symbol: SymbolId, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if let Some(existing) = self.names.get(&symbol) {
            return Err(Error::malformed(format!(
                "symbol {symbol} named twice (`{existing}` and `{name}`)"
            )));
        }
        self.names.insert(symbol, name);
        Ok(())
    }

    /// Returns the declared name of `symbol`.
    #[must_use]
    pub fn get(&self, symbol: SymbolId) -> Option<&str> {
        self.names.get(&symbol).map(String::as_str)
    }

    /// Returns the declared name of `symbol`, or `#<id>` when it has none.
    #[must_use]
    pub fn display(&self, symbol: SymbolId) -> String {
        self.get(symbol)
            .map_or_else(|| symbol.to_string(), str::to_string)
    }

    /// Number of named symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no symbols are named.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
