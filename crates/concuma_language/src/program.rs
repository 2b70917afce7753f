//! Program image: statement stream plus trailing name table.

use concuma_foundation::{Error, Result};

use crate::cursor::Cursor;
use crate::names::NameTable;

/// Offset of the first top-level statement.
pub const CODE_START: usize = 4;

/// A loaded program image.
///
/// Bytes `0..4` hold the little-endian offset of the name table, bytes
/// `4..offset` the top-level statement stream, and `offset..` the name table.
#[derive(Clone, Debug)]
pub struct Program {
    bytes: Vec<u8>,
    name_table_offset: usize,
    names: NameTable,
}

impl Program {
    /// Validates the header and loads the name table.
    pub fn load(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.len() < CODE_START {
            return Err(Error::malformed(format!(
                "image of {} bytes is shorter than its header",
                bytes.len()
            )));
        }
        let raw = Cursor::new(&bytes).read_i32();
        let name_table_offset = usize::try_from(raw)
            .ok()
            .filter(|offset| (CODE_START..=bytes.len()).contains(offset))
            .ok_or_else(|| {
                Error::malformed(format!(
                    "name table offset {raw} outside of {CODE_START}..={}",
                    bytes.len()
                ))
            })?;
        let names = NameTable::load(&bytes, name_table_offset)?;
        Ok(Self {
            bytes,
            name_table_offset,
            names,
        })
    }

    /// The whole image.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Offset one past the last top-level statement byte.
    #[must_use]
    pub fn code_end(&self) -> usize {
        self.name_table_offset
    }

    /// The symbol name table.
    #[must_use]
    pub fn names(&self) -> &NameTable {
        &self.names
    }
}
