//! Job queue management.
//!
//! This module provides the FIFO queue that every promise reaction and every
//! thenable assimilation step runs through. Nothing runs on its own: the host
//! drains the queue explicitly with [`JobQueue::drain`].

use crate::promise::PromiseMethods;
use crate::reaction::{ReactionJob, ThenableJob};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

/// A unit of deferred work.
#[derive(Debug)]
pub enum Job {
    /// Run a reaction handler against a settled value and settle the
    /// derived promise with the outcome.
    Reaction(ReactionJob),
    /// Call a thenable's `then` with a fresh pair of resolving functions.
    ResolveThenable(ThenableJob),
}

impl Job {
    /// Short name used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Job::Reaction(_) => "reaction",
            Job::ResolveThenable(_) => "resolve_thenable",
        }
    }

    /// Executes the job.
    ///
    /// Jobs never fail: errors raised by user code are turned into
    /// rejections of the promise the job settles.
    pub fn run(self) {
        match self {
            Job::Reaction(job) => job.run(),
            Job::ResolveThenable(job) => job.run(),
        }
    }
}

/// Options for a [`JobQueue`].
///
/// # Examples
///
/// ```
/// use promise_runtime::QueueOptions;
///
/// let options = QueueOptions::default()
///     .with_initial_capacity(64)
///     .with_max_jobs_per_drain(1_000);
/// assert_eq!(options.max_jobs_per_drain, Some(1_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueOptions {
    /// Number of job slots allocated up front
    pub initial_capacity: usize,
    /// Upper bound on jobs run by a single `drain` call; `None` drains until empty
    pub max_jobs_per_drain: Option<usize>,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            max_jobs_per_drain: None,
        }
    }
}

impl QueueOptions {
    /// Sets the initial capacity.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Bounds the number of jobs a single drain may run.
    pub fn with_max_jobs_per_drain(mut self, limit: usize) -> Self {
        self.max_jobs_per_drain = Some(limit);
        self
    }
}

struct QueueInner {
    jobs: RefCell<VecDeque<Job>>,
    options: QueueOptions,
    next_promise_id: Cell<u64>,
    methods: Rc<PromiseMethods>,
}

/// A FIFO queue of promise jobs.
///
/// `JobQueue` is a handle: clones share the same underlying queue. Every
/// promise remembers the queue it was created on and schedules its
/// reactions there, so independent queues can coexist (one per test, for
/// instance) without any global state.
///
/// Promises only hold a [`WeakJobQueue`]. Dropping the last `JobQueue`
/// handle frees the queue along with every job still in it.
///
/// # Examples
///
/// ```
/// use promise_runtime::{JobQueue, Promise, PromiseState};
/// use core_types::Value;
///
/// let queue = JobQueue::new();
/// let doubled = Promise::resolve(&queue, Value::Smi(21)).then_with(|v| match v {
///     Value::Smi(n) => Ok(Value::Smi(n * 2)),
///     other => Ok(other),
/// });
///
/// assert_eq!(doubled.state(), PromiseState::Pending);
/// queue.drain();
/// assert_eq!(doubled.result(), Some(Value::Smi(42)));
/// ```
#[derive(Clone)]
pub struct JobQueue {
    inner: Rc<QueueInner>,
}

impl JobQueue {
    /// Creates a new empty queue with default options.
    pub fn new() -> Self {
        Self::with_options(QueueOptions::default())
    }

    /// Creates a new empty queue with the given options.
    pub fn with_options(options: QueueOptions) -> Self {
        Self {
            inner: Rc::new(QueueInner {
                jobs: RefCell::new(VecDeque::with_capacity(options.initial_capacity)),
                options,
                next_promise_id: Cell::new(1),
                methods: Rc::new(PromiseMethods::new()),
            }),
        }
    }

    /// The options this queue was built with.
    pub fn options(&self) -> &QueueOptions {
        &self.inner.options
    }

    /// Adds a job to the end of the queue.
    pub fn enqueue(&self, job: Job) {
        let mut jobs = self.inner.jobs.borrow_mut();
        tracing::trace!(job = job.kind(), depth = jobs.len() + 1, "enqueue");
        jobs.push_back(job);
    }

    /// Removes and returns the next job from the queue.
    pub fn dequeue(&self) -> Option<Job> {
        self.inner.jobs.borrow_mut().pop_front()
    }

    /// Runs the job at the head of the queue.
    ///
    /// Returns false if the queue was empty.
    pub fn run_next(&self) -> bool {
        // The borrow must end before the job runs: jobs enqueue more jobs.
        let Some(job) = self.dequeue() else {
            return false;
        };
        tracing::trace!(job = job.kind(), remaining = self.len(), "run");
        job.run();
        true
    }

    /// Runs jobs until the queue is empty.
    ///
    /// Jobs enqueued while draining run in the same call, after everything
    /// that was already queued. When `max_jobs_per_drain` is set, draining
    /// stops at that many jobs and the rest stay queued in order.
    ///
    /// Returns the number of jobs that ran.
    pub fn drain(&self) -> usize {
        let limit = self.inner.options.max_jobs_per_drain;
        let mut ran = 0;
        while limit.map_or(true, |max| ran < max) {
            if !self.run_next() {
                break;
            }
            ran += 1;
        }
        if !self.is_empty() {
            tracing::warn!(jobs = ran, pending = self.len(), "drain stopped at job limit");
        }
        tracing::debug!(jobs = ran, "drained job queue");
        ran
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.jobs.borrow().is_empty()
    }

    /// Returns the number of jobs in the queue.
    pub fn len(&self) -> usize {
        self.inner.jobs.borrow().len()
    }

    /// Returns true if both handles refer to the same queue.
    pub fn ptr_eq(&self, other: &JobQueue) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Creates a handle that does not keep the queue alive.
    pub fn downgrade(&self) -> WeakJobQueue {
        WeakJobQueue {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Hands out the next promise id. Ids are unique per queue.
    pub(crate) fn next_promise_id(&self) -> u64 {
        let id = self.inner.next_promise_id.get();
        self.inner.next_promise_id.set(id + 1);
        id
    }

    pub(crate) fn promise_methods(&self) -> Rc<PromiseMethods> {
        self.inner.methods.clone()
    }
}

/// A non-owning [`JobQueue`] handle, held by every promise.
#[derive(Clone)]
pub struct WeakJobQueue {
    inner: Weak<QueueInner>,
}

impl WeakJobQueue {
    /// Returns the queue if some `JobQueue` handle still owns it.
    pub fn upgrade(&self) -> Option<JobQueue> {
        self.inner.upgrade().map(|inner| JobQueue { inner })
    }

    /// Enqueues on the queue if it is still alive; otherwise the job is dropped.
    pub fn enqueue(&self, job: Job) {
        match self.upgrade() {
            Some(queue) => queue.enqueue(job),
            None => tracing::debug!(job = job.kind(), "job queue released, dropping job"),
        }
    }

    /// Returns true if this handle points at `queue`.
    pub fn points_to(&self, queue: &JobQueue) -> bool {
        std::ptr::eq(self.inner.as_ptr(), Rc::as_ptr(&queue.inner))
    }
}

impl fmt::Debug for WeakJobQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakJobQueue")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for JobQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobQueue")
            .field("len", &self.len())
            .field("options", &self.inner.options)
            .finish()
    }
}
