//! Hand assembly helpers for byte-level tests.
//!
//! These deliberately avoid the emitter so that the tests pin down the wire
//! format independently of it.

/// Little-endian `i32`.
pub fn le(n: i32) -> [u8; 4] {
    n.to_le_bytes()
}

/// `Literal Int n`
pub fn int(n: i32) -> Vec<u8> {
    let mut out = vec![0x04, 0x02];
    out.extend_from_slice(&le(n));
    out
}

/// `Literal String s` (one length byte, unlike name-table entries)
pub fn string(s: &str) -> Vec<u8> {
    let mut out = vec![0x04, 0x04];
    out.push(u8::try_from(s.len()).unwrap());
    out.extend_from_slice(s.as_bytes());
    out
}

/// `Var id`
pub fn var(id: i32) -> Vec<u8> {
    let mut out = vec![0x05];
    out.extend_from_slice(&le(id));
    out
}

/// `Binary op lhs rhs`
pub fn binary(op: u8, lhs: &[u8], rhs: &[u8]) -> Vec<u8> {
    let mut out = vec![0x02, op];
    out.extend_from_slice(lhs);
    out.extend_from_slice(rhs);
    out
}

/// `Print expr`
pub fn print(expr: &[u8]) -> Vec<u8> {
    let mut out = vec![0x01];
    out.extend_from_slice(expr);
    out
}

/// `Declaration let id = init`
pub fn declare(id: i32, init: &[u8]) -> Vec<u8> {
    let mut out = vec![0x04, 0x00];
    out.extend_from_slice(&le(id));
    out.extend_from_slice(init);
    out
}

/// A complete image: header, code, and name table.
pub fn image(code: &[u8], names: &[(&str, i32)]) -> Vec<u8> {
    let offset = i32::try_from(code.len() + 4).unwrap();
    let mut out = le(offset).to_vec();
    out.extend_from_slice(code);
    for (name, id) in names {
        out.extend_from_slice(&u32::try_from(name.len()).unwrap().to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&le(*id));
    }
    out
}
