//! Callable function values.

use crate::{JsError, Value};
use std::fmt;
use std::rc::Rc;

type NativeFn = dyn Fn(Value, Vec<Value>) -> Result<Value, JsError>;

/// A function that can be called with a receiver and arguments.
///
/// Cloning a `Function` shares the underlying closure, so two clones
/// compare equal and are the same JavaScript function.
///
/// # Examples
///
/// ```
/// use core_types::{Function, Value};
///
/// let double = Function::new(|args| match args.first() {
///     Some(Value::Smi(n)) => Ok(Value::Smi(n * 2)),
///     _ => Ok(Value::Undefined),
/// });
/// assert_eq!(double.call(vec![Value::Smi(21)]).unwrap(), Value::Smi(42));
/// ```
#[derive(Clone)]
pub struct Function {
    name: Rc<str>,
    callback: Rc<NativeFn>,
}

impl Function {
    /// Creates an anonymous function that ignores its receiver.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, JsError> + 'static,
    {
        Self::method("", move |_this, args| f(args))
    }

    /// Creates a named function that receives `this` as its first argument.
    pub fn method<F>(name: &str, f: F) -> Self
    where
        F: Fn(Value, Vec<Value>) -> Result<Value, JsError> + 'static,
    {
        Self {
            name: Rc::from(name),
            callback: Rc::new(f),
        }
    }

    /// The function's name, empty for anonymous functions.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calls the function with `this` bound to `undefined`.
    pub fn call(&self, args: Vec<Value>) -> Result<Value, JsError> {
        (self.callback)(Value::Undefined, args)
    }

    /// Calls the function with an explicit receiver.
    pub fn call_with_this(&self, this: Value, args: Vec<Value>) -> Result<Value, JsError> {
        (self.callback)(this, args)
    }

    /// Returns true if both handles refer to the same function.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function {{ name: {:?} }}", self.name)
    }
}
