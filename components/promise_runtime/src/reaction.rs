//! Promise reactions and the jobs that run them.
//!
//! Registering handlers with `then` creates a derived promise and one
//! reaction per branch. A reaction runs as a [`ReactionJob`] once its source
//! settles; a thenable is assimilated by a [`ThenableJob`].

use crate::job_queue::Job;
use crate::promise::{Promise, PromiseState};
use crate::resolution::ResolvingFunctions;
use core_types::{Function, JsError, Value};

/// The handler a reaction runs.
#[derive(Debug, Clone)]
pub enum ReactionHandler {
    /// Pass the fulfillment value through unchanged.
    Identity,
    /// Re-raise the rejection reason unchanged.
    Thrower,
    /// A handler supplied by the caller.
    User(Function),
}

impl ReactionHandler {
    /// Handler for the fulfillment branch; `Identity` unless `handler` is callable.
    pub fn fulfill_branch(handler: Option<&Value>) -> Self {
        match handler.and_then(Value::as_function) {
            Some(func) => ReactionHandler::User(func.clone()),
            None => ReactionHandler::Identity,
        }
    }

    /// Handler for the rejection branch; `Thrower` unless `handler` is callable.
    pub fn reject_branch(handler: Option<&Value>) -> Self {
        match handler.and_then(Value::as_function) {
            Some(func) => ReactionHandler::User(func.clone()),
            None => ReactionHandler::Thrower,
        }
    }

    fn invoke(&self, argument: Value) -> Result<Value, JsError> {
        match self {
            ReactionHandler::Identity => Ok(argument),
            ReactionHandler::Thrower => Err(JsError::from_value(argument)),
            ReactionHandler::User(func) => func.call(vec![argument]),
        }
    }
}

/// A handler registered on a pending promise, together with the resolving
/// functions of the promise `then` returned.
#[derive(Debug, Clone)]
pub struct PromiseReaction {
    /// Handler to run on settlement
    pub handler: ReactionHandler,
    /// Settles the derived promise with the handler's outcome
    pub capability: ResolvingFunctions,
}

/// Runs a reaction handler against a settled value.
#[derive(Debug)]
pub struct ReactionJob {
    /// The reaction to run
    pub reaction: PromiseReaction,
    /// The fulfillment value or rejection reason of the source promise
    pub argument: Value,
}

impl ReactionJob {
    /// Runs the handler and settles the derived promise with its outcome.
    pub fn run(self) {
        let PromiseReaction {
            handler,
            capability,
        } = self.reaction;
        match handler.invoke(self.argument) {
            Ok(value) => capability.resolve_with(value),
            Err(err) => capability.reject_with(err.into_value()),
        }
    }
}

/// Hands a fresh resolving-function pair to a thenable's `then`.
#[derive(Debug)]
pub struct ThenableJob {
    /// The thenable, passed as `this`
    pub thenable: Value,
    /// The `then` function read when the thenable was probed
    pub then: Function,
    /// Resolving functions for the promise being resolved
    pub resolving: ResolvingFunctions,
}

impl ThenableJob {
    /// Calls `then`; an error it raises rejects the promise, unless the
    /// thenable already settled it.
    pub fn run(self) {
        let args = vec![
            Value::Function(self.resolving.resolve.clone()),
            Value::Function(self.resolving.reject.clone()),
        ];
        if let Err(err) = self.then.call_with_this(self.thenable, args) {
            self.resolving.reject_with(err.into_value());
        }
    }
}

/// Attaches a fulfillment and a rejection handler to `source`.
///
/// Both reaction lists get an entry while `source` is pending; otherwise the
/// matching handler is queued right away. Returns the derived promise.
pub(crate) fn register_reactions(
    source: &Promise,
    on_fulfilled: ReactionHandler,
    on_rejected: ReactionHandler,
) -> Promise {
    let (derived, capability) = source.pending_sibling();

    let ready = {
        let mut record = source.record_mut();
        match record.state {
            PromiseState::Pending => {
                record.fulfill_reactions.push(PromiseReaction {
                    handler: on_fulfilled,
                    capability: capability.clone(),
                });
                record.reject_reactions.push(PromiseReaction {
                    handler: on_rejected,
                    capability,
                });
                None
            }
            PromiseState::Fulfilled => Some(ReactionJob {
                reaction: PromiseReaction {
                    handler: on_fulfilled,
                    capability,
                },
                argument: record.result.clone(),
            }),
            PromiseState::Rejected => Some(ReactionJob {
                reaction: PromiseReaction {
                    handler: on_rejected,
                    capability,
                },
                argument: record.result.clone(),
            }),
        }
    };

    if let Some(job) = ready {
        source.weak_queue().enqueue(Job::Reaction(job));
    }
    derived
}
