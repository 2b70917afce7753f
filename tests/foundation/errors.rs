//! Integration tests for Error types
//!
//! Tests error construction, display, context, and categories.

use concuma_foundation::{
    Error, ErrorCategory, ErrorContext, ErrorKind, ExecutionLimit, SymbolId, ValueType,
};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_unknown_symbol() {
    let err = Error::unknown_symbol("ghost");
    assert!(matches!(err.kind, ErrorKind::UnknownSymbol(_)));
    assert_eq!(err.to_string(), "unknown variable: ghost");
    assert_eq!(err.category(), ErrorCategory::Lookup);
}

#[test]
fn error_duplicate_symbol() {
    let err = Error::duplicate_symbol("x");
    assert!(err.to_string().contains('x'));
    assert_eq!(err.category(), ErrorCategory::Lookup);
}

#[test]
fn error_invalid_operands() {
    let err = Error::invalid_operands("<", ValueType::String, ValueType::Int);
    let msg = err.to_string();
    assert!(msg.contains('<'));
    assert!(msg.contains("string"));
    assert!(msg.contains("int"));
    assert_eq!(err.category(), ErrorCategory::Type);
}

#[test]
fn error_unknown_opcode_shows_hex_byte() {
    let err = Error::unknown_opcode("statement", 0xAB);
    assert_eq!(err.to_string(), "unknown statement opcode 0xAB");
    assert_eq!(err.category(), ErrorCategory::Format);
}

#[test]
fn error_arity_mismatch() {
    let err = Error::arity_mismatch("fib", "1".to_string(), 3);
    let msg = err.to_string();
    assert!(msg.contains("fib"));
    assert!(msg.contains('1'));
    assert!(msg.contains('3'));
    assert_eq!(err.category(), ErrorCategory::Call);
}

#[test]
fn error_limits() {
    let err = Error::limit_exceeded(ExecutionLimit::CallDepth { limit: 8 });
    assert!(err.to_string().contains('8'));
    assert_eq!(err.category(), ErrorCategory::Limit);

    let err = Error::limit_exceeded(ExecutionLimit::Fuel { limit: 100 });
    assert!(err.to_string().contains("100"));
}

#[test]
fn error_unnamed_symbol() {
    let err = Error::new(ErrorKind::UnnamedSymbol(SymbolId(7)));
    assert_eq!(err.to_string(), "symbol #7 has no name");
}

#[test]
fn stray_control_flow_is_format_error() {
    let err = Error::new(ErrorKind::StrayControlFlow("break"));
    assert!(err.to_string().contains("`break`"));
    assert_eq!(err.category(), ErrorCategory::Format);
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn message_excludes_context() {
    let err = Error::unknown_symbol("x").at_offset(0x10).in_frame("f");
    assert_eq!(err.to_string(), "unknown variable: x");
}

#[test]
fn context_renders_offset_and_frames() {
    let ctx = ErrorContext::new()
        .with_offset(0x2A)
        .with_frame("inner")
        .with_frame("outer");
    assert_eq!(ctx.to_string(), "at offset 0x002A\n  in inner\n  in outer\n");
}

#[test]
fn innermost_offset_wins() {
    let err = Error::malformed("truncated").at_offset(20).at_offset(4);
    assert_eq!(err.context.and_then(|c| c.offset), Some(20));
}

#[test]
fn with_context_replaces() {
    let err = Error::unknown_symbol("y").with_context(ErrorContext::new().with_offset(3));
    let ctx = err.context.unwrap();
    assert_eq!(ctx.offset, Some(3));
    assert!(ctx.stack.is_empty());
}
