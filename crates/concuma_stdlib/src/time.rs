//! Time host functions.

use std::time::{SystemTime, UNIX_EPOCH};

use concuma_foundation::{Result, Value};

/// Time: clock
///
/// Seconds since the Unix epoch, as a float.
pub fn clock(_args: &[Value]) -> Result<Value> {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |elapsed| elapsed.as_secs_f64());
    Ok(Value::Float(seconds))
}
