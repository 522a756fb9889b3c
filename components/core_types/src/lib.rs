//! Core JavaScript value types and error handling.
//!
//! This crate provides the foundational types shared by the promise runtime:
//! value representation, callable functions, host objects and errors.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of JavaScript values
//! - [`Function`] - Reference-counted callable
//! - [`JsObject`] - Trait for host objects with (possibly failing) property reads
//! - [`JsError`] - JavaScript errors, including arbitrary raised values
//! - [`ErrorKind`] - Types of JavaScript errors
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, Function, JsError, Value};
//!
//! let num = Value::Smi(42);
//! assert!(num.is_truthy());
//! assert_eq!(num.type_of(), "number");
//!
//! let fail = Function::new(|_args| Err(JsError::type_error("undefined is not a function")));
//! let error = fail.call(vec![]).unwrap_err();
//! assert_eq!(error.kind, ErrorKind::TypeError);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod function;
mod object;
mod value;

pub use error::{ErrorKind, JsError};
pub use function::Function;
pub use object::{JsObject, PlainObject};
pub use value::Value;
