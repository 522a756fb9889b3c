//! Thenable detection.

use core_types::{Function, JsError, Value};

/// Outcome of probing a resolution value for a `then` member.
#[derive(Debug, Clone)]
pub enum ThenProbe {
    /// The value fulfills the promise as-is.
    NotThenable,
    /// The value is a thenable; carries its `then` function.
    Thenable(Function),
}

/// Probes `value` for a callable `then`.
///
/// Only objects are probed. The `then` property is read exactly once; a read
/// that raises is returned as `Err`, and a `then` that is present but not
/// callable makes the value an ordinary fulfillment value.
pub fn probe(value: &Value) -> Result<ThenProbe, JsError> {
    let Value::Object(obj) = value else {
        return Ok(ThenProbe::NotThenable);
    };
    match obj.get("then")? {
        Value::Function(then) => Ok(ThenProbe::Thenable(then)),
        _ => Ok(ThenProbe::NotThenable),
    }
}
