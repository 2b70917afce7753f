//! String host functions.

use concuma_foundation::{Error, Result, Value};

fn string<'v>(function: &str, args: &'v [Value]) -> Result<&'v str> {
    match args.first() {
        Some(Value::String(s)) => Ok(&**s),
        other => Err(Error::invalid_argument(
            function,
            format!(
                "expected a string, got {}",
                other.map_or("nothing".to_string(), |v| v.value_type().to_string())
            ),
        )),
    }
}

/// String: len
///
/// Counts characters.
pub fn len(args: &[Value]) -> Result<Value> {
    let s = string("len", args)?;
    Ok(Value::Int(
        i32::try_from(s.chars().count()).unwrap_or(i32::MAX),
    ))
}

/// String: upper
pub fn upper(args: &[Value]) -> Result<Value> {
    string("upper", args).map(|s| Value::from(s.to_uppercase()))
}

/// String: lower
pub fn lower(args: &[Value]) -> Result<Value> {
    string("lower", args).map(|s| Value::from(s.to_lowercase()))
}

/// String: str
///
/// The printed form of any value.
pub fn str(args: &[Value]) -> Result<Value> {
    Ok(Value::from(
        args.first().map(ToString::to_string).unwrap_or_default(),
    ))
}
