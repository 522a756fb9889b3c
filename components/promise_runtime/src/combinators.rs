//! Promise combinators: `all`, `allSettled` and `race`.
//!
//! All of them are built on `Promise::resolve` and `then`; none touches a
//! promise's internals. The counted combinators seed their remaining-count at
//! one and release that extra count only after every input is registered, so
//! inputs that finish early cannot complete the aggregate prematurely.

use crate::job_queue::JobQueue;
use crate::promise::{first_arg, Promise};
use crate::resolution::ResolvingFunctions;
use core_types::{Function, PlainObject, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared bookkeeping for `all` and `allSettled`.
struct Gather {
    values: RefCell<Vec<Value>>,
    remaining: Cell<usize>,
    capability: ResolvingFunctions,
}

impl Gather {
    fn new(len: usize, capability: ResolvingFunctions) -> Rc<Self> {
        Rc::new(Self {
            values: RefCell::new(vec![Value::Undefined; len]),
            remaining: Cell::new(1),
            capability,
        })
    }

    fn expect_one(&self) {
        self.remaining.set(self.remaining.get() + 1);
    }

    /// Drops one outstanding count, resolving the aggregate on the last one.
    fn release(&self) {
        let remaining = self.remaining.get() - 1;
        self.remaining.set(remaining);
        if remaining == 0 {
            let values = self.values.take();
            self.capability.resolve_with(Value::Array(values));
        }
    }

    /// An element function that stores `wrap(value)` at `index`, guarded by
    /// `already_called` so the slot is written at most once.
    fn element_fn<W>(self: &Rc<Self>, index: usize, already_called: Rc<Cell<bool>>, wrap: W) -> Value
    where
        W: Fn(Value) -> Value + 'static,
    {
        let gather = self.clone();
        Value::Function(Function::new(move |args| {
            if !already_called.replace(true) {
                gather.values.borrow_mut()[index] = wrap(first_arg(args));
                gather.release();
            }
            Ok(Value::Undefined)
        }))
    }
}

/// `Promise.all`: fulfills with every input's value in input order, or
/// rejects with the first rejection reason to arrive.
pub fn all(queue: &JobQueue, values: Vec<Value>) -> Promise {
    let (aggregate, capability) = Promise::pending(queue);
    let reject = Value::Function(capability.reject.clone());
    let gather = Gather::new(values.len(), capability);

    for (index, value) in values.into_iter().enumerate() {
        let next = Promise::resolve(queue, value);
        gather.expect_one();
        let on_fulfilled = gather.element_fn(index, Rc::new(Cell::new(false)), |v| v);
        next.then(Some(on_fulfilled), Some(reject.clone()));
    }

    gather.release();
    aggregate
}

/// `Promise.allSettled`: fulfills, once every input has settled, with one
/// `{status, value}` or `{status, reason}` record per input.
pub fn all_settled(queue: &JobQueue, values: Vec<Value>) -> Promise {
    let (aggregate, capability) = Promise::pending(queue);
    let gather = Gather::new(values.len(), capability);

    for (index, value) in values.into_iter().enumerate() {
        let next = Promise::resolve(queue, value);
        gather.expect_one();
        // Both branches share one latch; whichever runs first fills the slot.
        let already_called = Rc::new(Cell::new(false));
        let on_fulfilled = gather.element_fn(index, already_called.clone(), |v| {
            settled_record("fulfilled", "value", v)
        });
        let on_rejected = gather.element_fn(index, already_called, |v| {
            settled_record("rejected", "reason", v)
        });
        next.then(Some(on_fulfilled), Some(on_rejected));
    }

    gather.release();
    aggregate
}

fn settled_record(status: &str, key: &str, value: Value) -> Value {
    Value::object(
        PlainObject::new()
            .with("status", Value::from(status))
            .with(key, value),
    )
}

/// `Promise.race`: settles like whichever input settles first.
pub fn race(queue: &JobQueue, values: Vec<Value>) -> Promise {
    let (aggregate, capability) = Promise::pending(queue);
    let resolve = Value::Function(capability.resolve.clone());
    let reject = Value::Function(capability.reject.clone());

    for value in values {
        Promise::resolve(queue, value).then(Some(resolve.clone()), Some(reject.clone()));
    }

    aggregate
}
