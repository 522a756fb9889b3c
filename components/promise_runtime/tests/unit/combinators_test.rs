//! Unit tests for Promise.all, Promise.allSettled and Promise.race

use super::support::{fulfilling_thenable, thenable};
use core_types::{JsObject, Value};
use promise_runtime::{JobQueue, Promise, PromiseState};

fn resolved(queue: &JobQueue, n: i32) -> Value {
    Promise::resolve(queue, Value::Smi(n)).to_value()
}

#[test]
fn all_of_nothing_fulfills_without_draining() {
    let queue = JobQueue::new();
    let promise = Promise::all(&queue, vec![]);
    assert_eq!(promise.state(), PromiseState::Fulfilled);
    assert_eq!(promise.result(), Some(Value::Array(vec![])));
}

#[test]
fn all_fulfills_in_input_order() {
    let queue = JobQueue::new();
    let promise = Promise::all(
        &queue,
        vec![resolved(&queue, 1), resolved(&queue, 2), resolved(&queue, 3)],
    );
    queue.drain();
    assert_eq!(
        promise.result(),
        Some(Value::Array(vec![Value::Smi(1), Value::Smi(2), Value::Smi(3)]))
    );
}

#[test]
fn all_rejects_with_first_rejection() {
    let queue = JobQueue::new();
    let (never, _keep) = Promise::pending(&queue);
    let promise = Promise::all(
        &queue,
        vec![
            resolved(&queue, 1),
            Promise::reject(&queue, Value::from("x")).to_value(),
            never.to_value(),
        ],
    );
    queue.drain();
    assert_eq!(promise.state(), PromiseState::Rejected);
    assert_eq!(promise.result(), Some(Value::from("x")));
}

#[test]
fn all_rejection_order_follows_settlement_not_input() {
    let queue = JobQueue::new();
    let (first, first_resolvers) = Promise::pending(&queue);
    let (second, second_resolvers) = Promise::pending(&queue);
    let promise = Promise::all(&queue, vec![first.to_value(), second.to_value()]);

    second_resolvers.reject_with(Value::from("second"));
    first_resolvers.reject_with(Value::from("first"));
    queue.drain();
    assert_eq!(promise.result(), Some(Value::from("second")));
}

#[test]
fn all_assimilates_thenable_inputs() {
    let queue = JobQueue::new();
    let promise = Promise::all(
        &queue,
        vec![fulfilling_thenable(Value::Smi(1)), Value::Smi(2)],
    );
    queue.drain();
    assert_eq!(
        promise.result(),
        Some(Value::Array(vec![Value::Smi(1), Value::Smi(2)]))
    );
}

#[test]
fn all_ignores_duplicate_resolution_from_thenable() {
    let queue = JobQueue::new();
    let noisy = thenable(|resolve, _| {
        resolve.call(vec![Value::Smi(1)])?;
        resolve.call(vec![Value::Smi(2)])?;
        Ok(())
    });
    let promise = Promise::all(&queue, vec![noisy, Value::Smi(3)]);
    queue.drain();
    assert_eq!(
        promise.result(),
        Some(Value::Array(vec![Value::Smi(1), Value::Smi(3)]))
    );
}

#[test]
fn all_rejects_when_thenable_input_rejects() {
    let queue = JobQueue::new();
    let failing = thenable(|_, reject| {
        reject.call(vec![Value::from("thenable failed")])?;
        Ok(())
    });
    let promise = Promise::all(&queue, vec![Value::Smi(1), failing]);
    queue.drain();
    assert_eq!(promise.state(), PromiseState::Rejected);
    assert_eq!(promise.result(), Some(Value::from("thenable failed")));
}

#[test]
fn race_ignores_never_settling_input() {
    let queue = JobQueue::new();
    let (never, _keep) = Promise::pending(&queue);
    let promise = Promise::race(&queue, vec![never.to_value(), resolved(&queue, 7)]);
    queue.drain();
    assert_eq!(promise.result(), Some(Value::Smi(7)));
}

#[test]
fn race_later_settlements_are_ignored() {
    let queue = JobQueue::new();
    let (a, resolve_a) = Promise::pending(&queue);
    let (b, resolve_b) = Promise::pending(&queue);
    let promise = Promise::race(&queue, vec![a.to_value(), b.to_value()]);

    resolve_b.resolve_with(Value::from("b"));
    queue.drain();
    resolve_a.reject_with(Value::from("a"));
    queue.drain();
    assert_eq!(promise.state(), PromiseState::Fulfilled);
    assert_eq!(promise.result(), Some(Value::from("b")));
}

#[test]
fn race_accepts_plain_values() {
    let queue = JobQueue::new();
    let promise = Promise::race(&queue, vec![Value::from("plain"), resolved(&queue, 1)]);
    queue.drain();
    assert_eq!(promise.result(), Some(Value::from("plain")));
}

#[test]
fn all_settled_never_rejects() {
    let queue = JobQueue::new();
    let promise = Promise::all_settled(
        &queue,
        vec![
            Promise::reject(&queue, Value::from("a")).to_value(),
            Promise::reject(&queue, Value::from("b")).to_value(),
        ],
    );
    queue.drain();
    assert_eq!(promise.state(), PromiseState::Fulfilled);
    let result = promise.result().unwrap();
    let statuses: Vec<Value> = result
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record.as_object().unwrap().get("status").unwrap())
        .collect();
    assert_eq!(statuses, vec![Value::from("rejected"), Value::from("rejected")]);
}
