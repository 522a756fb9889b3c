//! Unit tests for host objects

use core_types::{JsError, JsObject, PlainObject, Value};
use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct CountingGetter {
    reads: Cell<u32>,
}

impl JsObject for CountingGetter {
    fn get(&self, key: &str) -> Result<Value, JsError> {
        self.reads.set(self.reads.get() + 1);
        if key == "explode" {
            return Err(JsError::type_error("getter failed"));
        }
        Ok(Value::Undefined)
    }

    fn class_name(&self) -> &str {
        "Counter"
    }

    fn as_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

#[test]
fn plain_object_preserves_insertion_order() {
    let obj = PlainObject::new()
        .with("b", Value::Smi(2))
        .with("a", Value::Smi(1));
    assert_eq!(obj.keys(), vec!["b".to_string(), "a".to_string()]);
}

#[test]
fn missing_property_reads_undefined() {
    let obj = PlainObject::new();
    assert_eq!(obj.get("then").unwrap(), Value::Undefined);
}

#[test]
fn custom_getter_can_fail() {
    let obj = CountingGetter::default();
    assert!(obj.get("explode").is_err());
    assert!(obj.get("fine").is_ok());
    assert_eq!(obj.reads.get(), 2);
}

#[test]
fn class_name_shows_in_display() {
    let value = Value::object(CountingGetter::default());
    assert_eq!(value.to_string(), "[object Counter]");
}

#[test]
fn downcast_recovers_concrete_type() {
    let value = Value::object(CountingGetter::default());
    let obj = value.as_object().unwrap().clone();
    assert!(obj.clone().as_any_rc().downcast::<CountingGetter>().is_ok());
    assert!(obj.as_any_rc().downcast::<PlainObject>().is_err());
}
