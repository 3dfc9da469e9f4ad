use crate::context::Work;
use crate::utils::lock;

use std::collections::VecDeque;
use std::sync::Mutex;

/// A per-worker local queue.
///
/// The owning worker takes work from the front, in submission order, so
/// continuations dispatched from one worker run in the order they were
/// queued. Other workers steal from the back.
pub(crate) struct LocalQueue {
    inner: Mutex<VecDeque<Work>>,
}

impl LocalQueue {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn push(&self, work: Work) {
        lock(&self.inner).push_back(work);
    }

    /// Pops the oldest work item. Used by the owning worker.
    pub(crate) fn pop(&self) -> Option<Work> {
        lock(&self.inner).pop_front()
    }

    /// Steals the newest work item. Used by other workers.
    pub(crate) fn steal(&self) -> Option<Work> {
        lock(&self.inner).pop_back()
    }
}
