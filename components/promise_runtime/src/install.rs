//! Installing the `Promise` global.
//!
//! A host may already provide its own promise implementation. The global is
//! only defined when the realm has none, so an existing one is never
//! shadowed.

use crate::job_queue::JobQueue;
use crate::promise::{first_arg, Promise};
use core_types::{Function, JsError, JsObject, Value};
use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

/// Global bindings visible to scripts.
#[derive(Debug, Default)]
pub struct Realm {
    globals: HashMap<String, Value>,
}

impl Realm {
    /// Creates a realm with no globals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a global binding.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Returns true if `name` is bound.
    pub fn has(&self, name: &str) -> bool {
        self.globals.contains_key(name)
    }

    /// Binds `name`, replacing any previous binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.globals.insert(name.to_string(), value);
    }
}

/// Installs the `Promise` global on `realm` unless one is already present.
///
/// Returns true if the global was installed.
///
/// # Examples
///
/// ```
/// use promise_runtime::{install_promise, JobQueue, Realm};
///
/// let queue = JobQueue::new();
/// let mut realm = Realm::new();
/// assert!(install_promise(&mut realm, &queue));
/// assert!(!install_promise(&mut realm, &queue));
/// ```
pub fn install_promise(realm: &mut Realm, queue: &JobQueue) -> bool {
    if realm.has("Promise") {
        tracing::debug!("Promise global already present, skipping install");
        return false;
    }
    realm.define("Promise", Value::object(PromiseConstructor::new(queue)));
    true
}

/// The `Promise` constructor object.
///
/// Its static methods are exposed as properties, each bound to the queue the
/// constructor was created with.
#[derive(Debug, Clone)]
pub struct PromiseConstructor {
    queue: JobQueue,
}

impl PromiseConstructor {
    /// Creates a constructor whose promises run on `queue`.
    pub fn new(queue: &JobQueue) -> Self {
        Self {
            queue: queue.clone(),
        }
    }

    /// The queue promises created through this constructor use.
    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    /// `new Promise(executor)`.
    ///
    /// # Errors
    ///
    /// Returns a `TypeError` if `executor` is not callable.
    pub fn construct(&self, executor: &Value) -> Result<Value, JsError> {
        Ok(Promise::new(&self.queue, executor)?.to_value())
    }

    /// Recovers the constructor from a realm global.
    pub fn from_value(value: &Value) -> Option<Rc<PromiseConstructor>> {
        value.as_object()?.clone().as_any_rc().downcast().ok()
    }

    fn static_method<F>(&self, name: &str, f: F) -> Value
    where
        F: Fn(&JobQueue, Vec<Value>) -> Result<Promise, JsError> + 'static,
    {
        let queue = self.queue.clone();
        Value::Function(Function::method(name, move |_this, args| {
            Ok(f(&queue, args)?.to_value())
        }))
    }
}

fn list_arg(args: Vec<Value>) -> Result<Vec<Value>, JsError> {
    match first_arg(args) {
        Value::Array(items) => Ok(items),
        other => Err(JsError::type_error(format!("{} is not iterable", other))),
    }
}

impl JsObject for PromiseConstructor {
    fn get(&self, key: &str) -> Result<Value, JsError> {
        let method = match key {
            "resolve" => self.static_method("resolve", |queue, args| {
                Ok(Promise::resolve(queue, first_arg(args)))
            }),
            "reject" => self.static_method("reject", |queue, args| {
                Ok(Promise::reject(queue, first_arg(args)))
            }),
            "all" => self.static_method("all", |queue, args| {
                Ok(Promise::all(queue, list_arg(args)?))
            }),
            "race" => self.static_method("race", |queue, args| {
                Ok(Promise::race(queue, list_arg(args)?))
            }),
            "allSettled" => self.static_method("allSettled", |queue, args| {
                Ok(Promise::all_settled(queue, list_arg(args)?))
            }),
            "try" => self.static_method("try", |queue, args| {
                let callback = first_arg(args);
                Ok(Promise::try_sync(queue, || match callback.as_function() {
                    Some(f) => f.call(vec![]),
                    None => Err(JsError::type_error(format!("{} is not a function", callback))),
                }))
            }),
            _ => Value::Undefined,
        };
        Ok(method)
    }

    fn class_name(&self) -> &str {
        "Function"
    }

    fn as_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}
