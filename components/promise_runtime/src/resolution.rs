//! Promise resolution procedure.
//!
//! Each promise is settled through a pair of resolving functions that share
//! a one-shot latch. Resolving with a thenable does not settle anything yet:
//! it queues a job that hands a fresh pair to the thenable's `then`. The old
//! pair's latch is already tripped at that point, so only the newest pair can
//! ever settle the promise.

use crate::job_queue::Job;
use crate::promise::{first_arg, Promise, PromiseState};
use crate::reaction::{PromiseReaction, ReactionJob, ThenableJob};
use crate::thenable::{self, ThenProbe};
use core_types::{Function, JsError, Value};
use std::cell::Cell;
use std::rc::Rc;

/// The `resolve`/`reject` pair bound to one promise.
///
/// Both functions are ordinary [`Function`]s, so they can be handed to
/// executors and thenables, or called from native code through
/// [`resolve_with`](Self::resolve_with) and [`reject_with`](Self::reject_with).
#[derive(Debug, Clone)]
pub struct ResolvingFunctions {
    /// Resolves the promise, assimilating thenables
    pub resolve: Function,
    /// Rejects the promise
    pub reject: Function,
}

impl ResolvingFunctions {
    /// Calls `resolve` with `value`.
    pub fn resolve_with(&self, value: Value) {
        // Resolving functions report every failure through the promise.
        let _ = self.resolve.call(vec![value]);
    }

    /// Calls `reject` with `reason`.
    pub fn reject_with(&self, reason: Value) {
        let _ = self.reject.call(vec![reason]);
    }
}

/// Creates a fresh resolving-function pair for `promise`.
pub fn create_resolving_functions(promise: &Promise) -> ResolvingFunctions {
    let already_resolved = Rc::new(Cell::new(false));

    let resolve = {
        let promise = promise.clone();
        let already_resolved = already_resolved.clone();
        Function::method("resolve", move |_this, args| {
            if !already_resolved.replace(true) {
                resolve_promise(&promise, first_arg(args));
            }
            Ok(Value::Undefined)
        })
    };

    let reject = {
        let promise = promise.clone();
        Function::method("reject", move |_this, args| {
            if !already_resolved.replace(true) {
                reject_promise(&promise, first_arg(args));
            }
            Ok(Value::Undefined)
        })
    };

    ResolvingFunctions { resolve, reject }
}

/// Resolves `promise` with `resolution`.
///
/// The thenable probe happens here, exactly once and synchronously; a probe
/// that raises rejects the promise without touching the queue.
fn resolve_promise(promise: &Promise, resolution: Value) {
    if !promise.is_pending() {
        return;
    }

    if let Value::Object(obj) = &resolution {
        if promise.is_same_object(obj) {
            let err = JsError::type_error("Chaining cycle detected for promise");
            reject_promise(promise, err.into_value());
            return;
        }
    }

    match thenable::probe(&resolution) {
        Err(err) => reject_promise(promise, err.into_value()),
        Ok(ThenProbe::NotThenable) => fulfill_promise(promise, resolution),
        Ok(ThenProbe::Thenable(then)) => {
            tracing::trace!(promise = promise.id(), "assimilating thenable");
            let resolving = create_resolving_functions(promise);
            promise.weak_queue().enqueue(Job::ResolveThenable(ThenableJob {
                thenable: resolution,
                then,
                resolving,
            }));
        }
    }
}

/// Settles `promise` as fulfilled and schedules its fulfillment reactions.
pub(crate) fn fulfill_promise(promise: &Promise, value: Value) {
    settle(promise, PromiseState::Fulfilled, value);
}

/// Settles `promise` as rejected and schedules its rejection reactions.
pub(crate) fn reject_promise(promise: &Promise, reason: Value) {
    settle(promise, PromiseState::Rejected, reason);
}

fn settle(promise: &Promise, state: PromiseState, result: Value) {
    let reactions = {
        let mut record = promise.record_mut();
        if record.state != PromiseState::Pending {
            return;
        }
        record.state = state;
        record.result = result.clone();
        let fulfill = std::mem::take(&mut record.fulfill_reactions);
        let reject = std::mem::take(&mut record.reject_reactions);
        match state {
            PromiseState::Fulfilled => fulfill,
            _ => reject,
        }
    };

    tracing::debug!(
        promise = promise.id(),
        state = ?state,
        reactions = reactions.len(),
        "settled"
    );

    trigger_reactions(promise, reactions, result);
}

fn trigger_reactions(promise: &Promise, reactions: Vec<PromiseReaction>, argument: Value) {
    let queue = promise.weak_queue();
    for reaction in reactions {
        queue.enqueue(Job::Reaction(ReactionJob {
            reaction,
            argument: argument.clone(),
        }));
    }
}
