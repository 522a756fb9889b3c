//! Promise implementation with Promise/A+ semantics.
//!
//! This module provides the promise itself: its state, its result, the
//! reactions waiting on it, and the public constructors and chaining
//! methods. Settlement lives in [`crate::resolution`], handler execution in
//! [`crate::reaction`].

use crate::combinators;
use crate::job_queue::{JobQueue, WeakJobQueue};
use crate::reaction::{self, PromiseReaction, ReactionHandler};
use crate::resolution::{create_resolving_functions, ResolvingFunctions};
use core_types::{Function, JsError, JsObject, Value};
use std::any::Any;
use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// The state of a Promise.
///
/// Once settled (Fulfilled or Rejected), a Promise cannot change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseState {
    /// The initial state; the promise is neither fulfilled nor rejected.
    Pending,
    /// The promise has been resolved with a value.
    Fulfilled,
    /// The promise has been rejected with an error.
    Rejected,
}

/// Mutable part of a promise.
pub(crate) struct PromiseRecord {
    pub(crate) state: PromiseState,
    pub(crate) result: Value,
    pub(crate) fulfill_reactions: Vec<PromiseReaction>,
    pub(crate) reject_reactions: Vec<PromiseReaction>,
}

/// Shared storage behind a [`Promise`] handle.
pub struct PromiseCell {
    id: u64,
    queue: WeakJobQueue,
    methods: Rc<PromiseMethods>,
    record: RefCell<PromiseRecord>,
}

impl fmt::Debug for PromiseCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record.borrow();
        f.debug_struct("Promise")
            .field("id", &self.id)
            .field("state", &record.state)
            .field("result", &record.result)
            .finish()
    }
}

impl JsObject for PromiseCell {
    fn get(&self, key: &str) -> Result<Value, JsError> {
        Ok(match key {
            "then" => Value::Function(self.methods.then.clone()),
            "catch" => Value::Function(self.methods.catch.clone()),
            _ => Value::Undefined,
        })
    }

    fn class_name(&self) -> &str {
        "Promise"
    }

    fn as_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

fn this_promise(this: &Value) -> Result<Promise, JsError> {
    Promise::from_value(this)
        .ok_or_else(|| JsError::type_error("Promise method called on incompatible receiver"))
}

/// The built-in `then` and `catch` members, created once per queue so every
/// read of `promise.then` yields the same function.
#[derive(Debug)]
pub(crate) struct PromiseMethods {
    then: Function,
    catch: Function,
}

impl PromiseMethods {
    pub(crate) fn new() -> Self {
        Self {
            then: then_method(),
            catch: catch_method(),
        }
    }
}

/// `Promise.prototype.then`, as seen by thenable assimilation and host code.
fn then_method() -> Function {
    Function::method("then", |this, args| {
        let promise = this_promise(&this)?;
        let mut args = args.into_iter();
        let on_fulfilled = args.next();
        let on_rejected = args.next();
        Ok(promise.then(on_fulfilled, on_rejected).to_value())
    })
}

/// `Promise.prototype.catch`.
fn catch_method() -> Function {
    Function::method("catch", |this, args| {
        let promise = this_promise(&this)?;
        Ok(promise.catch(args.into_iter().next()).to_value())
    })
}

/// A JavaScript Promise.
///
/// `Promise` is a cheap handle; clones refer to the same promise. A promise
/// starts out pending and is settled at most once, through one of its
/// resolving functions. Reactions never run synchronously: they are queued on
/// the promise's [`JobQueue`] and run when the host drains it.
///
/// # Examples
///
/// ```
/// use promise_runtime::{JobQueue, Promise, PromiseState};
/// use core_types::Value;
///
/// let queue = JobQueue::new();
/// let (promise, resolvers) = Promise::pending(&queue);
/// assert_eq!(promise.state(), PromiseState::Pending);
///
/// resolvers.resolve_with(Value::Smi(42));
/// assert_eq!(promise.state(), PromiseState::Fulfilled);
/// assert_eq!(promise.result(), Some(Value::Smi(42)));
/// ```
#[derive(Clone)]
pub struct Promise {
    cell: Rc<PromiseCell>,
}

impl Promise {
    /// `new Promise(executor)`.
    ///
    /// The executor runs synchronously with `resolve` and `reject` as its
    /// arguments. An error raised by the executor rejects the promise.
    ///
    /// # Errors
    ///
    /// Returns a `TypeError` if `executor` is not callable.
    pub fn new(queue: &JobQueue, executor: &Value) -> Result<Promise, JsError> {
        let executor = executor
            .as_function()
            .ok_or_else(|| JsError::type_error("Promise resolver is not a function"))?
            .clone();
        Ok(Self::with_executor(queue, move |resolvers| {
            executor
                .call(vec![
                    Value::Function(resolvers.resolve.clone()),
                    Value::Function(resolvers.reject.clone()),
                ])
                .map(|_| ())
        }))
    }

    /// Creates a promise from a native executor closure.
    ///
    /// # Examples
    ///
    /// ```
    /// use promise_runtime::{JobQueue, Promise, PromiseState};
    /// use core_types::{JsError, Value};
    ///
    /// let queue = JobQueue::new();
    /// let failed = Promise::with_executor(&queue, |_| Err(JsError::type_error("boom")));
    /// assert_eq!(failed.state(), PromiseState::Rejected);
    /// ```
    pub fn with_executor<F>(queue: &JobQueue, executor: F) -> Promise
    where
        F: FnOnce(&ResolvingFunctions) -> Result<(), JsError>,
    {
        let (promise, resolvers) = Self::pending(queue);
        if let Err(err) = executor(&resolvers) {
            resolvers.reject_with(err.into_value());
        }
        promise
    }

    /// Creates a pending promise together with its resolving functions.
    pub fn pending(queue: &JobQueue) -> (Promise, ResolvingFunctions) {
        Self::pending_in(
            queue.next_promise_id(),
            queue.downgrade(),
            queue.promise_methods(),
        )
    }

    /// A pending promise scheduled on the same queue as `self`.
    ///
    /// Works after the queue has been released; the new promise then gets
    /// id 0 and its reactions are dropped like those of `self`.
    pub(crate) fn pending_sibling(&self) -> (Promise, ResolvingFunctions) {
        match self.cell.queue.upgrade() {
            Some(queue) => Self::pending(&queue),
            None => Self::pending_in(0, self.cell.queue.clone(), self.cell.methods.clone()),
        }
    }

    fn pending_in(
        id: u64,
        queue: WeakJobQueue,
        methods: Rc<PromiseMethods>,
    ) -> (Promise, ResolvingFunctions) {
        let promise = Promise {
            cell: Rc::new(PromiseCell {
                id,
                queue,
                methods,
                record: RefCell::new(PromiseRecord {
                    state: PromiseState::Pending,
                    result: Value::Undefined,
                    fulfill_reactions: Vec::new(),
                    reject_reactions: Vec::new(),
                }),
            }),
        };
        let resolvers = create_resolving_functions(&promise);
        (promise, resolvers)
    }

    /// `Promise.resolve(value)`.
    ///
    /// A promise created on the same queue is returned unchanged; anything
    /// else goes through the full resolution procedure, so thenables are
    /// assimilated.
    pub fn resolve(queue: &JobQueue, value: Value) -> Promise {
        if let Some(existing) = Promise::from_value(&value) {
            if existing.belongs_to(queue) {
                return existing;
            }
        }
        Self::with_executor(queue, |resolvers| {
            resolvers.resolve_with(value);
            Ok(())
        })
    }

    /// `Promise.reject(reason)`.
    pub fn reject(queue: &JobQueue, reason: Value) -> Promise {
        Self::with_executor(queue, |resolvers| {
            resolvers.reject_with(reason);
            Ok(())
        })
    }

    /// `Promise.try(f)`: calls `f` synchronously and resolves with its
    /// return value, or rejects with the error it raises.
    pub fn try_sync<F>(queue: &JobQueue, f: F) -> Promise
    where
        F: FnOnce() -> Result<Value, JsError>,
    {
        Self::with_executor(queue, |resolvers| {
            resolvers.resolve_with(f()?);
            Ok(())
        })
    }

    /// `Promise.all(values)`.
    pub fn all(queue: &JobQueue, values: Vec<Value>) -> Promise {
        combinators::all(queue, values)
    }

    /// `Promise.race(values)`.
    pub fn race(queue: &JobQueue, values: Vec<Value>) -> Promise {
        combinators::race(queue, values)
    }

    /// `Promise.allSettled(values)`.
    pub fn all_settled(queue: &JobQueue, values: Vec<Value>) -> Promise {
        combinators::all_settled(queue, values)
    }

    /// `promise.then(onFulfilled, onRejected)`.
    ///
    /// Handlers that are absent or not callable pass the outcome through
    /// unchanged. Returns the derived promise, which settles once the
    /// matching handler has run.
    pub fn then(&self, on_fulfilled: Option<Value>, on_rejected: Option<Value>) -> Promise {
        reaction::register_reactions(
            self,
            ReactionHandler::fulfill_branch(on_fulfilled.as_ref()),
            ReactionHandler::reject_branch(on_rejected.as_ref()),
        )
    }

    /// `promise.catch(onRejected)`.
    pub fn catch(&self, on_rejected: Option<Value>) -> Promise {
        self.then(None, on_rejected)
    }

    /// Chains a native fulfillment handler.
    pub fn then_with<F>(&self, on_fulfilled: F) -> Promise
    where
        F: Fn(Value) -> Result<Value, JsError> + 'static,
    {
        let handler = Function::new(move |args| on_fulfilled(first_arg(args)));
        self.then(Some(Value::Function(handler)), None)
    }

    /// Chains a native rejection handler.
    pub fn catch_with<F>(&self, on_rejected: F) -> Promise
    where
        F: Fn(Value) -> Result<Value, JsError> + 'static,
    {
        let handler = Function::new(move |args| on_rejected(first_arg(args)));
        self.then(None, Some(Value::Function(handler)))
    }

    /// `promise.finally(onFinally)`.
    ///
    /// `on_finally` runs with no arguments on either outcome. The derived
    /// promise settles like this one, unless `on_finally` raises, in which
    /// case it rejects with that error.
    pub fn finally(&self, on_finally: Function) -> Promise {
        let after_fulfill = on_finally.clone();
        let on_fulfilled = Function::new(move |args| {
            after_fulfill.call(vec![])?;
            Ok(first_arg(args))
        });
        let on_rejected = Function::new(move |args| {
            on_finally.call(vec![])?;
            Err(JsError::from_value(first_arg(args)))
        });
        self.then(
            Some(Value::Function(on_fulfilled)),
            Some(Value::Function(on_rejected)),
        )
    }

    /// The current state.
    pub fn state(&self) -> PromiseState {
        self.cell.record.borrow().state
    }

    /// Returns true while the promise is unsettled.
    pub fn is_pending(&self) -> bool {
        self.state() == PromiseState::Pending
    }

    /// The fulfillment value or rejection reason, once settled.
    pub fn result(&self) -> Option<Value> {
        let record = self.cell.record.borrow();
        match record.state {
            PromiseState::Pending => None,
            _ => Some(record.result.clone()),
        }
    }

    /// Diagnostic identifier, unique among the promises of one queue.
    pub fn id(&self) -> u64 {
        self.cell.id
    }

    /// The queue this promise schedules its reactions on, unless every
    /// handle to it has been dropped.
    pub fn queue(&self) -> Option<JobQueue> {
        self.cell.queue.upgrade()
    }

    /// Returns true if this promise schedules its reactions on `queue`.
    pub fn belongs_to(&self, queue: &JobQueue) -> bool {
        self.cell.queue.points_to(queue)
    }

    pub(crate) fn weak_queue(&self) -> &WeakJobQueue {
        &self.cell.queue
    }

    /// Wraps this promise as a script-visible object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.cell.clone())
    }

    /// Recovers a promise from a value, if the value is one.
    pub fn from_value(value: &Value) -> Option<Promise> {
        let obj = value.as_object()?.clone();
        obj.as_any_rc()
            .downcast::<PromiseCell>()
            .ok()
            .map(|cell| Promise { cell })
    }

    /// Returns true if `obj` is this very promise.
    pub(crate) fn is_same_object(&self, obj: &Rc<dyn JsObject>) -> bool {
        Rc::as_ptr(obj) as *const () == Rc::as_ptr(&self.cell) as *const ()
    }

    pub(crate) fn record_mut(&self) -> RefMut<'_, PromiseRecord> {
        self.cell.record.borrow_mut()
    }

    /// Returns true if both handles refer to the same promise.
    pub fn ptr_eq(&self, other: &Promise) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.cell, f)
    }
}

impl From<Promise> for Value {
    fn from(promise: Promise) -> Self {
        promise.to_value()
    }
}

pub(crate) fn first_arg(args: Vec<Value>) -> Value {
    args.into_iter().next().unwrap_or(Value::Undefined)
}
