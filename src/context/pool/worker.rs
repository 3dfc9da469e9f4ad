use super::Shared;
use crate::context::Work;

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error};

thread_local! {
    /// Identity of the pool worker running on this thread, if any, as
    /// `(pool id, worker index)`.
    ///
    /// Lets a pool route work submitted by its own workers to their local
    /// queues instead of the shared injector.
    static CURRENT_WORKER: Cell<Option<(usize, usize)>> = const { Cell::new(None) };
}

/// Returns the index of the current thread if it is a worker of `pool_id`.
pub(crate) fn current_worker(pool_id: usize) -> Option<usize> {
    CURRENT_WORKER
        .with(Cell::get)
        .and_then(|(pool, index)| (pool == pool_id).then_some(index))
}

/// A worker thread of a [`ThreadPool`](super::ThreadPool).
///
/// Each loop iteration looks for work in this order:
/// 1. the worker's own local queue
/// 2. the shared injector
/// 3. the local queues of other workers
/// 4. otherwise it parks briefly
///
/// After shutdown is signalled the worker keeps running until it finds no
/// more work, so tasks already dispatched still complete.
pub(crate) struct Worker {
    id: usize,
    shared: Arc<Shared>,
}

impl Worker {
    pub(crate) fn new(id: usize, shared: Arc<Shared>) -> Self {
        Self { id, shared }
    }

    pub(crate) fn run(self) {
        CURRENT_WORKER.with(|cell| cell.set(Some((self.shared.id, self.id))));
        debug!(pool = self.shared.id, worker = self.id, "worker started");

        loop {
            if let Some(work) = self.next_work() {
                self.run_work(work);
                continue;
            }

            if self.shared.injector.is_shutdown() {
                break;
            }

            self.shared.injector.park();
        }

        CURRENT_WORKER.with(|cell| cell.set(None));
        debug!(pool = self.shared.id, worker = self.id, "worker stopped");
    }

    fn next_work(&self) -> Option<Work> {
        self.shared.locals[self.id]
            .pop()
            .or_else(|| self.shared.injector.steal())
            .or_else(|| self.try_steal())
    }

    /// Steals from peers round-robin, starting after this worker.
    fn try_steal(&self) -> Option<Work> {
        let len = self.shared.locals.len();

        if len <= 1 {
            return None;
        }

        (1..len)
            .map(|offset| (self.id + offset) % len)
            .find_map(|victim| self.shared.locals[victim].steal())
    }

    fn run_work(&self, work: Work) {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(work)) {
            error!(
                pool = self.shared.id,
                worker = self.id,
                panic = panic_message(payload.as_ref()),
                "work item panicked"
            );
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}
