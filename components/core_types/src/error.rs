//! JavaScript error types and error handling.
//!
//! This module provides the error type raised by executors, reaction
//! handlers and host objects, along with conversions between raised errors
//! and the plain values that a rejected promise carries as its reason.

use crate::Value;
use std::fmt;
use std::rc::Rc;

/// The kind of JavaScript error.
///
/// These correspond to JavaScript's built-in error constructors, plus
/// `Thrown` for an arbitrary value raised with `throw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Generic `Error`
    Error,
    /// Type error (e.g., calling a non-function)
    TypeError,
    /// Value out of allowed range
    RangeError,
    /// Internal engine error
    InternalError,
    /// A non-error value raised with `throw`
    Thrown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Error => "Error",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::InternalError => "InternalError",
            ErrorKind::Thrown => "Uncaught",
        };
        f.write_str(name)
    }
}

/// A JavaScript error with a message and, optionally, the raised value.
///
/// When user code raises an arbitrary value (a string, a number, an
/// existing error object) the value is kept in `thrown` so that it can be
/// handed back unchanged as a rejection reason.
///
/// # Examples
///
/// ```
/// use core_types::{JsError, ErrorKind, Value};
///
/// let error = JsError::type_error("undefined is not a function");
/// assert_eq!(error.kind, ErrorKind::TypeError);
/// assert_eq!(error.to_string(), "TypeError: undefined is not a function");
///
/// let raised = JsError::throw(Value::from("boom"));
/// assert_eq!(raised.into_value(), Value::from("boom"));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct JsError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The raised value, when this error came from `throw <value>`
    pub thrown: Option<Value>,
}

impl JsError {
    /// Creates an error of the given kind with no attached value.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            thrown: None,
        }
    }

    /// Creates a `TypeError`.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    /// Creates a `RangeError`.
    pub fn range_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RangeError, message)
    }

    /// Creates an internal engine error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message)
    }

    /// Raises an arbitrary value, as `throw value` would.
    pub fn throw(value: Value) -> Self {
        Self::from_value(value)
    }

    /// Converts a rejection reason back into a raised error.
    ///
    /// Error values keep their kind and message; any other value becomes a
    /// `Thrown` error. In both cases the original value is retained.
    pub fn from_value(value: Value) -> Self {
        let (kind, message) = match &value {
            Value::Error(inner) => (inner.kind.clone(), inner.message.clone()),
            other => (ErrorKind::Thrown, other.to_string()),
        };
        Self {
            kind,
            message,
            thrown: Some(value),
        }
    }

    /// Converts this error into the value a rejected promise carries.
    ///
    /// Returns the originally raised value when there is one, so a reason
    /// that is re-raised and caught again keeps its identity.
    pub fn into_value(self) -> Value {
        match self.thrown {
            Some(value) => value,
            None => Value::Error(Rc::new(self)),
        }
    }
}
