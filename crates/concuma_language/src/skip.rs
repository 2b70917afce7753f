//! Skip traversal.
//!
//! Mirrors the interpreter's byte consumption for every opcode without
//! evaluating anything. Conditionals and loops use it to step over branches
//! they do not take; class declarations use it to record member offsets.
//! Skipping never touches an environment and never raises `break`/`return`.

use concuma_foundation::{Error, Result};

use crate::cursor::Cursor;
use crate::opcode::{ExprOp, StmtOp};
use crate::stack::ensure_sufficient_stack;

/// Advances `cursor` past one statement.
pub fn skip_statement(cursor: &mut Cursor<'_>) -> Result<()> {
    ensure_sufficient_stack(|| statement(cursor))
}

/// Advances `cursor` past one expression.
pub fn skip_expression(cursor: &mut Cursor<'_>) -> Result<()> {
    ensure_sufficient_stack(|| expression(cursor))
}

fn statement(cursor: &mut Cursor<'_>) -> Result<()> {
    let byte = cursor.advance();
    let Some(op) = StmtOp::from_byte(byte) else {
        return Err(Error::unknown_opcode("statement", byte));
    };
    match op {
        StmtOp::Print => skip_expression(cursor),
        StmtOp::If => {
            skip_expression(cursor)?;
            skip_statement(cursor)?;
            skip_optional_statement(cursor)
        }
        StmtOp::Block => skip_statements(cursor),
        StmtOp::Declaration => {
            cursor.skip_bytes(1);
            cursor.read_symbol();
            skip_optional_expression(cursor)
        }
        StmtOp::Definition => {
            cursor.read_symbol();
            skip_expression(cursor)
        }
        StmtOp::For => {
            skip_optional_statement(cursor)?;
            skip_expression(cursor)?;
            skip_statement(cursor)?;
            skip_optional_statement(cursor)
        }
        StmtOp::Break => Ok(()),
        StmtOp::Function => {
            cursor.read_symbol();
            let params = cursor.read_count(4)?;
            cursor.skip_bytes(params * 4);
            skip_statement(cursor)
        }
        StmtOp::Call => {
            cursor.read_symbol();
            skip_arguments(cursor)
        }
        StmtOp::Return => skip_optional_expression(cursor),
        StmtOp::Class | StmtOp::Module => {
            cursor.read_symbol();
            skip_statements(cursor)?;
            skip_statements(cursor)
        }
        StmtOp::Import => {
            cursor.read_symbol();
            if cursor.child_present() {
                cursor.read_symbol();
            }
            Ok(())
        }
        StmtOp::Reserved => {
            cursor.skip_bytes(12);
            skip_statement(cursor)
        }
    }
}

fn expression(cursor: &mut Cursor<'_>) -> Result<()> {
    let byte = cursor.advance();
    let Some(op) = ExprOp::from_byte(byte) else {
        return Err(Error::unknown_opcode("expression", byte));
    };
    match op {
        ExprOp::Unary => {
            cursor.skip_bytes(1);
            skip_expression(cursor)
        }
        ExprOp::Binary => {
            cursor.skip_bytes(1);
            skip_expression(cursor)?;
            skip_expression(cursor)
        }
        ExprOp::Group => skip_expression(cursor),
        ExprOp::Literal => cursor.skip_literal(),
        ExprOp::Var => {
            cursor.read_symbol();
            Ok(())
        }
        ExprOp::Call => {
            cursor.read_symbol();
            skip_arguments(cursor)
        }
        ExprOp::Accessor => {
            skip_expression(cursor)?;
            skip_expression(cursor)
        }
    }
}

/// Skips an optional statement behind its presence marker.
pub(crate) fn skip_optional_statement(cursor: &mut Cursor<'_>) -> Result<()> {
    if cursor.child_present() {
        skip_statement(cursor)?;
    }
    Ok(())
}

/// Skips an optional expression behind its presence marker.
pub(crate) fn skip_optional_expression(cursor: &mut Cursor<'_>) -> Result<()> {
    if cursor.child_present() {
        skip_expression(cursor)?;
    }
    Ok(())
}

/// Skips a counted statement list, returning the offset of each statement.
pub(crate) fn skip_members(cursor: &mut Cursor<'_>) -> Result<Vec<usize>> {
    let count = cursor.read_count(1)?;
    let mut offsets = Vec::with_capacity(count);
    for _ in 0..count {
        offsets.push(cursor.position());
        skip_statement(cursor)?;
    }
    Ok(offsets)
}

fn skip_statements(cursor: &mut Cursor<'_>) -> Result<()> {
    let count = cursor.read_count(1)?;
    for _ in 0..count {
        skip_statement(cursor)?;
    }
    Ok(())
}

fn skip_arguments(cursor: &mut Cursor<'_>) -> Result<()> {
    let count = cursor.read_count(1)?;
    for _ in 0..count {
        skip_expression(cursor)?;
    }
    Ok(())
}
