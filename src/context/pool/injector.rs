use crate::context::Work;
use crate::utils::lock;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Global work queue of a thread pool.
///
/// Work submitted from outside the pool lands here before a worker picks it
/// up. The injector also parks idle workers on a condition variable and wakes
/// them when work arrives or the pool shuts down.
pub(crate) struct Injector {
    /// Work waiting for any worker, oldest first.
    queue: Mutex<VecDeque<Work>>,

    /// Guard paired with `condvar` for parking.
    parked: Mutex<usize>,

    /// Wakes parked workers.
    condvar: Condvar,

    /// Set once the pool starts shutting down.
    shutdown: AtomicBool,
}

impl Injector {
    pub(crate) fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            parked: Mutex::new(0),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Signals shutdown and wakes every parked worker.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);

        let _parked = lock(&self.parked);
        self.condvar.notify_all();
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Pushes work to the back of the queue and wakes one parked worker.
    pub(crate) fn push(&self, work: Work) {
        lock(&self.queue).push_back(work);
        self.condvar.notify_one();
    }

    /// Takes the oldest queued work item, if any.
    pub(crate) fn steal(&self) -> Option<Work> {
        lock(&self.queue).pop_front()
    }

    /// Parks the calling worker until work arrives or shutdown begins.
    ///
    /// The wait is bounded to 1 ms so that work pushed onto a peer's local
    /// queue, which does not signal the condvar, is still picked up promptly.
    pub(crate) fn park(&self) {
        if self.is_shutdown() || !lock(&self.queue).is_empty() {
            return;
        }

        let mut parked = lock(&self.parked);
        *parked += 1;

        let (mut parked, _) = self
            .condvar
            .wait_timeout(parked, Duration::from_millis(1))
            .unwrap_or_else(PoisonError::into_inner);
        *parked -= 1;
    }
}
