//! Position in a program image plus primitive little-endian readers.
//!
//! Reads past the end of the buffer yield zero bytes instead of failing
//! (soft EOF). Variable-length reads are the exception: a length or element
//! count that cannot fit in the remaining bytes is a format error.

use concuma_foundation::{Error, Result, SymbolId, Value};

use crate::opcode::LiteralTag;

/// Moving read position over an immutable byte buffer.
///
/// This is the interpreter's only program counter; saving and restoring
/// [`position`](Cursor::position) is how calls jump into function bodies and back.
#[derive(Clone, Debug)]
pub struct Cursor<'p> {
    bytes: &'p [u8],
    pos: usize,
}

impl<'p> Cursor<'p> {
    /// Creates a cursor at the start of `bytes`.
    #[must_use]
    pub fn new(bytes: &'p [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Creates a cursor at `pos`.
    #[must_use]
    pub fn at(bytes: &'p [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    /// Current offset.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves to an absolute offset.
    #[inline]
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Returns true once the cursor has reached the end of the buffer.
    #[inline]
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Number of bytes between the cursor and the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    /// Inspects the next byte without consuming it; `0` past the end.
    #[inline]
    #[must_use]
    pub fn peek(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(0)
    }

    /// Consumes the next byte; `0` past the end.
    #[inline]
    pub fn advance(&mut self) -> u8 {
        let byte = self.peek();
        self.pos += 1;
        byte
    }

    /// Skips `n` bytes.
    #[inline]
    pub fn skip_bytes(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n);
    }

    /// Consumes an optional-child marker.
    ///
    /// Returns `false` (and consumes the `0x00` byte) when the child is absent,
    /// `true` (consuming nothing) when it is present.
    pub fn child_present(&mut self) -> bool {
        if self.peek() == 0 {
            self.advance();
            false
        } else {
            true
        }
    }

    fn read_array<const N: usize>(&mut self) -> [u8; N] {
        let mut buf = [0u8; N];
        for byte in &mut buf {
            *byte = self.advance();
        }
        buf
    }

    /// Reads a little-endian `i32`.
    pub fn read_i32(&mut self) -> i32 {
        i32::from_le_bytes(self.read_array())
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32(&mut self) -> u32 {
        u32::from_le_bytes(self.read_array())
    }

    /// Reads a little-endian IEEE `f64`.
    pub fn read_f64(&mut self) -> f64 {
        f64::from_le_bytes(self.read_array())
    }

    /// Reads a symbol id.
    pub fn read_symbol(&mut self) -> SymbolId {
        SymbolId(self.read_i32())
    }

    /// Reads an `i32` element count, each element taking at least
    /// `min_element_size` bytes.
    pub fn read_count(&mut self, min_element_size: usize) -> Result<usize> {
        let raw = self.read_i32();
        let at = self.pos - 4;
        let count = usize::try_from(raw)
            .map_err(|_| Error::malformed(format!("negative count {raw} at offset {at}")))?;
        if count.saturating_mul(min_element_size) > self.remaining() {
            return Err(Error::malformed(format!(
                "count {count} at offset {at} overruns the program"
            )));
        }
        Ok(count)
    }

    /// Reads a `u32`-length-prefixed string, one character per byte.
    ///
    /// Name-table entries use this form.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32() as usize;
        self.take_chars(len, 4)
    }

    /// Reads a string literal's payload: a `u8` length, then one character
    /// per byte.
    pub fn read_short_string(&mut self) -> Result<String> {
        let len = usize::from(self.advance());
        self.take_chars(len, 1)
    }

    /// Skips a `u8`-length-prefixed string.
    pub fn skip_short_string(&mut self) -> Result<()> {
        let len = usize::from(self.advance());
        self.check_string_len(len, 1)?;
        self.pos += len;
        Ok(())
    }

    /// Reads a literal payload: a tag byte followed by its value.
    pub fn read_literal(&mut self) -> Result<Value> {
        let tag = self.advance();
        match LiteralTag::from_byte(tag) {
            Some(LiteralTag::Null) => Ok(Value::Null),
            Some(LiteralTag::Bool) => Ok(Value::Bool(self.advance() == 0x01)),
            Some(LiteralTag::Int) => Ok(Value::Int(self.read_i32())),
            Some(LiteralTag::Float) => Ok(Value::Float(self.read_f64())),
            Some(LiteralTag::String) => Ok(Value::from(self.read_short_string()?)),
            None => Err(Error::unknown_opcode("literal tag", tag)),
        }
    }

    /// Skips a literal payload without building its value.
    pub fn skip_literal(&mut self) -> Result<()> {
        let tag = self.advance();
        match LiteralTag::from_byte(tag) {
            Some(LiteralTag::Null) => {}
            Some(LiteralTag::Bool) => self.skip_bytes(1),
            Some(LiteralTag::Int) => self.skip_bytes(4),
            Some(LiteralTag::Float) => self.skip_bytes(8),
            Some(LiteralTag::String) => self.skip_short_string()?,
            None => return Err(Error::unknown_opcode("literal tag", tag)),
        }
        Ok(())
    }

    fn take_chars(&mut self, len: usize, prefix: usize) -> Result<String> {
        self.check_string_len(len, prefix)?;
        let start = self.pos;
        self.pos += len;
        let raw = self.bytes.get(start..self.pos).unwrap_or_default();
        Ok(raw.iter().map(|&b| char::from(b)).collect())
    }

    fn check_string_len(&self, len: usize, prefix: usize) -> Result<()> {
        if len > self.remaining() {
            return Err(Error::malformed(format!(
                "string of {len} bytes at offset {} overruns the program",
                self.pos - prefix
            )));
        }
        Ok(())
    }
}
