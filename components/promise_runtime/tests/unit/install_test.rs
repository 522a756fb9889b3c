//! Unit tests for installing the Promise global

use core_types::{Function, JsObject, Value};
use promise_runtime::{install_promise, JobQueue, Promise, PromiseConstructor, PromiseState, Realm};

fn installed(queue: &JobQueue) -> Realm {
    let mut realm = Realm::new();
    assert!(install_promise(&mut realm, queue));
    realm
}

fn call(realm: &Realm, method: &str, args: Vec<Value>) -> Promise {
    let ctor = realm.get("Promise").unwrap().as_object().unwrap();
    let f = ctor.get(method).unwrap();
    let value = f.as_function().unwrap().call(args).unwrap();
    Promise::from_value(&value).unwrap()
}

#[test]
fn install_skips_when_global_exists() {
    let queue = JobQueue::new();
    let mut realm = Realm::new();
    let native = Value::object(core_types::PlainObject::new());
    realm.define("Promise", native.clone());
    assert!(!install_promise(&mut realm, &queue));
    assert_eq!(realm.get("Promise"), Some(&native));
}

#[test]
fn install_into_two_realms_is_independent() {
    let queue = JobQueue::new();
    let first = installed(&queue);
    let second = installed(&queue);
    assert_ne!(first.get("Promise"), second.get("Promise"));
}

#[test]
fn installed_statics_use_the_bound_queue() {
    let queue = JobQueue::new();
    let realm = installed(&queue);
    let promise = call(&realm, "resolve", vec![Value::Smi(1)]);
    assert!(promise.belongs_to(&queue));
}

#[test]
fn installed_all_and_race() {
    let queue = JobQueue::new();
    let realm = installed(&queue);
    let all = call(&realm, "all", vec![Value::Array(vec![Value::Smi(1), Value::Smi(2)])]);
    let race = call(&realm, "race", vec![Value::Array(vec![Value::Smi(3)])]);
    let settled = call(&realm, "allSettled", vec![Value::Array(vec![])]);
    queue.drain();
    assert_eq!(all.result(), Some(Value::Array(vec![Value::Smi(1), Value::Smi(2)])));
    assert_eq!(race.result(), Some(Value::Smi(3)));
    assert_eq!(settled.result(), Some(Value::Array(vec![])));
}

#[test]
fn installed_reject_and_try() {
    let queue = JobQueue::new();
    let realm = installed(&queue);
    let rejected = call(&realm, "reject", vec![Value::from("r")]);
    let tried = call(
        &realm,
        "try",
        vec![Value::Function(Function::new(|_| Ok(Value::Smi(9))))],
    );
    assert_eq!(rejected.state(), PromiseState::Rejected);
    assert_eq!(tried.result(), Some(Value::Smi(9)));
}

#[test]
fn constructor_creates_promises() {
    let queue = JobQueue::new();
    let realm = installed(&queue);
    let ctor = PromiseConstructor::from_value(realm.get("Promise").unwrap()).unwrap();
    let executor = Value::Function(Function::new(|args| {
        args[1].as_function().unwrap().call(vec![Value::from("executor rejected")])
    }));
    let value = ctor.construct(&executor).unwrap();
    let promise = Promise::from_value(&value).unwrap();
    assert_eq!(promise.result(), Some(Value::from("executor rejected")));
}
