//! Promise runtime for a host without an event loop.
//!
//! This crate provides a Promise/A+ style promise whose reactions run on an
//! explicit, host-driven job queue:
//! - [`JobQueue`] - FIFO queue of reaction and thenable-assimilation jobs
//! - [`Promise`] - Single-assignment value with `then`/`catch`/`finally`
//! - [`ResolvingFunctions`] - The one-shot `resolve`/`reject` pair of a promise
//! - [`install_promise`] - Defines the `Promise` global unless the host has one
//!
//! Nothing happens in the background. Settling a promise only queues its
//! reactions; the host calls [`JobQueue::drain`] to run them, along with any
//! work they queue in turn.
//!
//! # Examples
//!
//! ```
//! use promise_runtime::{JobQueue, Promise, PromiseState};
//! use core_types::Value;
//!
//! let queue = JobQueue::new();
//! let all = Promise::all(
//!     &queue,
//!     vec![
//!         Promise::resolve(&queue, Value::Smi(1)).to_value(),
//!         Value::Smi(2),
//!     ],
//! );
//!
//! assert_eq!(all.state(), PromiseState::Pending);
//! queue.drain();
//! assert_eq!(all.result(), Some(Value::Array(vec![Value::Smi(1), Value::Smi(2)])));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod combinators;
pub mod install;
pub mod job_queue;
pub mod promise;
pub mod reaction;
pub mod resolution;
pub mod thenable;

// Re-export main types at crate root
pub use install::{install_promise, PromiseConstructor, Realm};
pub use job_queue::{Job, JobQueue, QueueOptions, WeakJobQueue};
pub use promise::{Promise, PromiseCell, PromiseState};
pub use reaction::{PromiseReaction, ReactionHandler, ReactionJob, ThenableJob};
pub use resolution::{create_resolving_functions, ResolvingFunctions};
pub use thenable::{probe, ThenProbe};
