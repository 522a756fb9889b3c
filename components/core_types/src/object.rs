//! Host objects.
//!
//! A host object is anything with properties that a script could inspect.
//! Property reads go through [`JsObject::get`], which may fail: this is how a
//! getter that raises, or one with side effects, is represented.

use crate::{JsError, Value};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// An object with readable properties.
pub trait JsObject: fmt::Debug + 'static {
    /// Reads the property named `key`, returning `undefined` when absent.
    fn get(&self, key: &str) -> Result<Value, JsError>;

    /// The tag used by `Object.prototype.toString`.
    fn class_name(&self) -> &str {
        "Object"
    }

    /// Upcasts to `Any` so callers can recover the concrete type.
    fn as_any_rc(self: Rc<Self>) -> Rc<dyn Any>;
}

/// A plain property bag with insertion-ordered keys.
///
/// # Examples
///
/// ```
/// use core_types::{JsObject, PlainObject, Value};
///
/// let record = PlainObject::new().with("status", Value::from("fulfilled"));
/// assert_eq!(record.get("status").unwrap(), Value::from("fulfilled"));
/// assert_eq!(record.get("missing").unwrap(), Value::Undefined);
/// ```
#[derive(Debug, Default)]
pub struct PlainObject {
    properties: RefCell<Vec<(String, Value)>>,
}

impl PlainObject {
    /// Creates an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style property definition.
    pub fn with(self, key: &str, value: Value) -> Self {
        self.set(key, value);
        self
    }

    /// Defines or overwrites a property.
    pub fn set(&self, key: &str, value: Value) {
        let mut props = self.properties.borrow_mut();
        match props.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => props.push((key.to_string(), value)),
        }
    }

    /// Returns the property names in definition order.
    pub fn keys(&self) -> Vec<String> {
        self.properties
            .borrow()
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }
}

impl JsObject for PlainObject {
    fn get(&self, key: &str) -> Result<Value, JsError> {
        Ok(self
            .properties
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or(Value::Undefined))
    }

    fn as_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}
