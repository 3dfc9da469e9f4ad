//! Work-stealing thread pool.
//!
//! The pool is an [`ExecutionContext`] that runs work on a fixed set of
//! worker threads. It is composed of:
//! - [`builder`]: configuration ([`ThreadPoolBuilder`]),
//! - an injector: the global queue for work submitted from outside,
//! - one local queue per worker, which peers may steal from,
//! - the workers themselves.
//!
//! The process-wide default context is one of these pools.

mod builder;
mod injector;
mod queue;
mod worker;

pub use builder::ThreadPoolBuilder;

use crate::context::{ExecutionContext, Work};
use crate::error::PoolError;
use injector::Injector;
use queue::LocalQueue;
use worker::{Worker, current_worker};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

/// Source of unique pool identifiers.
static NEXT_POOL_ID: AtomicUsize = AtomicUsize::new(0);

/// State shared between a pool handle and its workers.
pub(crate) struct Shared {
    /// Unique identifier of the pool.
    id: usize,

    /// Global queue for work submitted from outside the pool.
    injector: Injector,

    /// One local queue per worker.
    locals: Vec<LocalQueue>,
}

/// A multi-threaded, work-stealing [`ExecutionContext`].
///
/// Dropping the pool signals shutdown and joins its workers once they have
/// drained every queued work item. Work submitted after shutdown has begun is
/// dropped.
pub struct ThreadPool {
    shared: Arc<Shared>,

    /// Join handles of the worker threads.
    handles: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Creates a pool with default configuration.
    ///
    /// Shorthand for `ThreadPoolBuilder::new().build()`.
    pub fn new() -> Result<Self, PoolError> {
        ThreadPoolBuilder::new().build()
    }

    /// Returns a builder for a customized pool.
    pub fn builder() -> ThreadPoolBuilder {
        ThreadPoolBuilder::new()
    }

    pub(crate) fn start(threads: usize, thread_name: &str) -> Result<Self, PoolError> {
        let shared = Arc::new(Shared {
            id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
            injector: Injector::new(),
            locals: (0..threads).map(|_| LocalQueue::new()).collect(),
        });

        let mut pool = Self {
            shared,
            handles: Vec::with_capacity(threads),
        };

        for index in 0..threads {
            let worker = Worker::new(index, pool.shared.clone());

            // On error `pool` is dropped here, which stops the workers
            // started so far.
            let handle = thread::Builder::new()
                .name(format!("{thread_name}-{index}"))
                .spawn(move || worker.run())
                .map_err(|source| PoolError::Spawn { index, source })?;

            pool.handles.push(handle);
        }

        debug!(pool = pool.shared.id, threads, "thread pool started");
        Ok(pool)
    }

    /// Number of worker threads in the pool.
    pub fn worker_threads(&self) -> usize {
        self.shared.locals.len()
    }
}

impl ExecutionContext for ThreadPool {
    /// Queues `work` on the pool.
    ///
    /// Work submitted from one of this pool's own workers goes to that
    /// worker's local queue; anything else goes to the shared injector.
    fn execute(&self, work: Work) {
        let shared = &self.shared;

        if shared.injector.is_shutdown() {
            warn!(pool = shared.id, "thread pool is shutting down, dropping work");
            return;
        }

        match current_worker(shared.id) {
            Some(index) => shared.locals[index].push(work),
            None => shared.injector.push(work),
        }
    }
}

impl Drop for ThreadPool {
    /// Shuts the pool down.
    ///
    /// 1. Signals shutdown and wakes parked workers
    /// 2. Joins every worker, except the current thread if the last handle
    ///    is dropped from inside the pool
    fn drop(&mut self) {
        self.shared.injector.shutdown();

        let current = thread::current().id();
        for handle in self.handles.drain(..) {
            if handle.thread().id() != current {
                let _ = handle.join();
            }
        }

        debug!(pool = self.shared.id, "thread pool stopped");
    }
}
