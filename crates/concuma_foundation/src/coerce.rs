//! Arithmetic, comparison, and truthiness rules with numeric promotion.
//!
//! All functions take plain values; unwrapping bindings into values is the
//! interpreter's job. Int-with-Int arithmetic stays in 32-bit integers and
//! wraps on overflow, any other numeric pairing widens both sides to `f64`.
//! Division always widens.

use crate::types::ValueType;
use crate::value::Value;
use crate::{Error, ErrorKind, Result};

/// Returns true if `a` and `b` may meet in an operator.
///
/// Two nulls, two values of the same variant, or any mix of `Int` and `Float`.
#[must_use]
pub fn compatible(a: &Value, b: &Value) -> bool {
    let (ta, tb) = (a.value_type(), b.value_type());
    ta == tb || (ta.is_numeric() && tb.is_numeric())
}

/// Returns the truth value of `value`.
///
/// `null` is false, booleans are themselves, numbers are true when nonzero.
#[allow(clippy::float_cmp)]
pub fn truthy(value: &Value) -> Result<bool> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        Value::Int(n) => Ok(*n != 0),
        Value::Float(n) => Ok(*n != 0.0),
        Value::String(_) => Err(Error::new(ErrorKind::NotTruthable(ValueType::String))),
    }
}

/// Language-level `==`.
///
/// Incompatible operands are unequal rather than an error.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn equals(a: &Value, b: &Value) -> bool {
    if !compatible(a, b) {
        return false;
    }
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Null, Value::Null) => true,
        _ => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

/// Adds two values. Also concatenates two strings.
pub fn add(a: &Value, b: &Value) -> Result<Value> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Ok(Value::from(format!("{x}{y}"))),
        _ => arithmetic("+", a, b, i32::wrapping_add, |x, y| x + y),
    }
}

/// Subtracts two values.
pub fn subtract(a: &Value, b: &Value) -> Result<Value> {
    arithmetic("-", a, b, i32::wrapping_sub, |x, y| x - y)
}

/// Multiplies two values.
pub fn multiply(a: &Value, b: &Value) -> Result<Value> {
    arithmetic("*", a, b, i32::wrapping_mul, |x, y| x * y)
}

/// Divides two values.
///
/// The result is always a `Float`, even for two `Int` operands. Division by
/// zero follows IEEE semantics.
pub fn divide(a: &Value, b: &Value) -> Result<Value> {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => Ok(Value::Float(x / y)),
        _ => Err(Error::invalid_operands("/", a.value_type(), b.value_type())),
    }
}

fn arithmetic(
    op: &'static str,
    a: &Value,
    b: &Value,
    int_op: fn(i32, i32) -> i32,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    if let (Value::Int(x), Value::Int(y)) = (a, b) {
        return Ok(Value::Int(int_op(*x, *y)));
    }
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => Ok(Value::Float(float_op(x, y))),
        _ => Err(Error::invalid_operands(op, a.value_type(), b.value_type())),
    }
}

/// Language-level `<`.
pub fn less(a: &Value, b: &Value) -> Result<bool> {
    compare("<", a, b, |x, y| x < y)
}

/// Language-level `<=`.
pub fn less_equal(a: &Value, b: &Value) -> Result<bool> {
    compare("<=", a, b, |x, y| x <= y)
}

/// Language-level `>`.
pub fn greater(a: &Value, b: &Value) -> Result<bool> {
    compare(">", a, b, |x, y| x > y)
}

/// Language-level `>=`.
pub fn greater_equal(a: &Value, b: &Value) -> Result<bool> {
    compare(">=", a, b, |x, y| x >= y)
}

fn compare(op: &'static str, a: &Value, b: &Value, pred: fn(f64, f64) -> bool) -> Result<bool> {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => Ok(pred(x, y)),
        _ => Err(Error::invalid_operands(op, a.value_type(), b.value_type())),
    }
}

/// Unary `!`.
///
/// Booleans are inverted; numbers become the `Int` `1` when zero and `0` otherwise.
#[allow(clippy::float_cmp)]
pub fn not(value: &Value) -> Result<Value> {
    match value {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        Value::Int(n) => Ok(Value::Int(i32::from(*n == 0))),
        Value::Float(n) => Ok(Value::Int(i32::from(*n == 0.0))),
        _ => Err(Error::invalid_operand("!", value.value_type())),
    }
}

/// Unary `-`.
pub fn negate(value: &Value) -> Result<Value> {
    match value {
        Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
        Value::Float(n) => Ok(Value::Float(-n)),
        _ => Err(Error::invalid_operand("-", value.value_type())),
    }
}
