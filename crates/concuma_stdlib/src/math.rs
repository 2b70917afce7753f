//! Math host functions.

use concuma_foundation::{Error, Result, Value};

fn number(function: &str, value: Option<&Value>) -> Result<f64> {
    value.and_then(Value::as_number).ok_or_else(|| {
        Error::invalid_argument(
            function,
            format!(
                "expected a number, got {}",
                value.map_or("nothing".to_string(), |v| v.value_type().to_string())
            ),
        )
    })
}

/// Math: abs
pub fn abs(args: &[Value]) -> Result<Value> {
    match args.first() {
        Some(Value::Int(n)) => Ok(Value::Int(n.wrapping_abs())),
        other => number("abs", other).map(|n| Value::Float(n.abs())),
    }
}

/// Math: floor
pub fn floor(args: &[Value]) -> Result<Value> {
    match args.first() {
        Some(Value::Int(n)) => Ok(Value::Int(*n)),
        other => number("floor", other).map(|n| Value::Float(n.floor())),
    }
}

/// Math: ceil
pub fn ceil(args: &[Value]) -> Result<Value> {
    match args.first() {
        Some(Value::Int(n)) => Ok(Value::Int(*n)),
        other => number("ceil", other).map(|n| Value::Float(n.ceil())),
    }
}

/// Math: sqrt
///
/// Always a float; negative inputs yield NaN.
pub fn sqrt(args: &[Value]) -> Result<Value> {
    number("sqrt", args.first()).map(|n| Value::Float(n.sqrt()))
}

/// Math: pow
///
/// Two integers with a non-negative exponent stay integral (wrapping on
/// overflow); anything else is computed in floating point.
pub fn pow(args: &[Value]) -> Result<Value> {
    if let [Value::Int(base), Value::Int(exp)] = args {
        if let Ok(exp) = u32::try_from(*exp) {
            return Ok(Value::Int(base.wrapping_pow(exp)));
        }
    }
    let base = number("pow", args.first())?;
    let exp = number("pow", args.get(1))?;
    Ok(Value::Float(base.powf(exp)))
}

/// Math: min
pub fn min(args: &[Value]) -> Result<Value> {
    extremum("min", args, |candidate, best| candidate < best)
}

/// Math: max
pub fn max(args: &[Value]) -> Result<Value> {
    extremum("max", args, |candidate, best| candidate > best)
}

/// Picks the argument preferred by `better`, keeping its original type.
fn extremum(function: &str, args: &[Value], better: fn(f64, f64) -> bool) -> Result<Value> {
    let mut best = args.first().ok_or_else(|| {
        Error::invalid_argument(function, "requires at least one argument")
    })?;
    let mut best_n = number(function, Some(best))?;
    for arg in &args[1..] {
        let n = number(function, Some(arg))?;
        if better(n, best_n) {
            best = arg;
            best_n = n;
        }
    }
    Ok(best.clone())
}
