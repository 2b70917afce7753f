//! Integration tests for the program decoder
//!
//! Tests header validation, the name table trailer, and cursor reads.

use concuma_foundation::{ErrorCategory, ErrorKind, SymbolId, Value};
use concuma_language::{CODE_START, Cursor, NameTable, Program};

use crate::asm::{image, int, print, string};

// =============================================================================
// Header
// =============================================================================

#[test]
fn load_minimal_image() {
    let program = Program::load(image(&[], &[])).unwrap();
    assert_eq!(program.code_end(), CODE_START);
    assert!(program.names().is_empty());
}

#[test]
fn load_rejects_short_image() {
    let err = Program::load(vec![4, 0]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedProgram(_)));
    assert_eq!(err.category(), ErrorCategory::Format);
}

#[test]
fn load_rejects_offset_outside_image() {
    assert!(Program::load(100i32.to_le_bytes()).is_err());
    assert!(Program::load((-1i32).to_le_bytes()).is_err());
    assert!(Program::load(2i32.to_le_bytes()).is_err());
}

#[test]
fn code_end_is_name_table_offset() {
    let code = print(&int(1));
    let program = Program::load(image(&code, &[("x", 1)])).unwrap();
    assert_eq!(program.code_end(), CODE_START + code.len());
}

// =============================================================================
// Name Table
// =============================================================================

#[test]
fn names_are_loaded() {
    let program = Program::load(image(&[], &[("main", 1), ("counter", 2)])).unwrap();
    let names = program.names();
    assert_eq!(names.len(), 2);
    assert_eq!(names.get(SymbolId(1)), Some("main"));
    assert_eq!(names.get(SymbolId(2)), Some("counter"));
    assert_eq!(names.get(SymbolId(3)), None);
}

#[test]
fn truncated_name_is_malformed() {
    let mut bytes = image(&[], &[]);
    bytes.extend_from_slice(&50u32.to_le_bytes());
    bytes.extend_from_slice(b"abc");
    let err = Program::load(bytes).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedProgram(_)));
}

#[test]
fn name_table_display_falls_back_to_id() {
    let mut table = NameTable::new();
    table.insert(SymbolId(4), "four").unwrap();
    assert_eq!(table.display(SymbolId(4)), "four");
    assert_eq!(table.display(SymbolId(5)), "#5");
    assert!(table.insert(SymbolId(4), "again").is_err());
}

// =============================================================================
// Cursor
// =============================================================================

#[test]
fn cursor_reads_literals() {
    let mut bytes = int(-9)[1..].to_vec();
    bytes.extend_from_slice(&string("hey")[1..]);
    let mut cursor = Cursor::new(&bytes);
    assert_eq!(cursor.read_literal().unwrap(), Value::Int(-9));
    assert_eq!(cursor.read_literal().unwrap(), Value::from("hey"));
    assert!(cursor.is_end());
}

#[test]
fn cursor_reads_zero_past_end() {
    let bytes = [0x07];
    let mut cursor = Cursor::new(&bytes);
    assert_eq!(cursor.advance(), 0x07);
    assert_eq!(cursor.advance(), 0);
    assert_eq!(cursor.read_i32(), 0);
    assert_eq!(cursor.remaining(), 0);
}

#[test]
fn optional_child_marker() {
    let bytes = [0x00, 0x05];
    let mut cursor = Cursor::new(&bytes);
    assert!(!cursor.child_present());
    assert_eq!(cursor.position(), 1);
    assert!(cursor.child_present());
    assert_eq!(cursor.position(), 1);
}

#[test]
fn count_that_overruns_is_malformed() {
    let bytes = 1000i32.to_le_bytes();
    assert!(Cursor::new(&bytes).read_count(1).is_err());
    let bytes = (-3i32).to_le_bytes();
    assert!(Cursor::new(&bytes).read_count(1).is_err());
}
