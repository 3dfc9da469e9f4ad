use super::ThreadPool;
use crate::error::PoolError;

use std::thread;

/// Builder for configuring and creating a [`ThreadPool`].
///
/// # Examples
///
/// ```rust,ignore
/// let pool = ThreadPoolBuilder::new()
///     .worker_threads(4)
///     .thread_name("io-callbacks")
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct ThreadPoolBuilder {
    /// Number of worker threads.
    worker_threads: usize,

    /// Prefix for worker thread names; the worker index is appended.
    thread_name: String,
}

impl ThreadPoolBuilder {
    /// Creates a builder with default configuration.
    ///
    /// By default, the number of worker threads is the number of available
    /// logical CPUs, falling back to `1` if unavailable.
    pub fn new() -> Self {
        let worker_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            worker_threads,
            thread_name: String::from("pool-worker"),
        }
    }

    /// Sets the number of worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn worker_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "worker_threads must be > 0");

        self.worker_threads = n;
        self
    }

    /// Sets the name prefix of the worker threads.
    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name = prefix.into();
        self
    }

    /// Starts the worker threads and returns the pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Spawn`] if a worker thread cannot be started.
    /// Workers already started are shut down before returning.
    pub fn build(self) -> Result<ThreadPool, PoolError> {
        ThreadPool::start(self.worker_threads, &self.thread_name)
    }
}

impl Default for ThreadPoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}
