use super::state::{Continuation, State, TaskState};
use crate::context::{ExecutionContext, default_context};
use crate::utils::{lock, wait};

use std::fmt;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use tracing::{trace, warn};

/// A deferred result shared between threads.
///
/// A `Task` is a handle to a write-once cell. It starts pending and is
/// completed exactly once, either resolved with a `T` or rejected with an
/// `E`. Any thread holding a handle can inspect the outcome, block until it is
/// available, or attach continuations that run once it is.
///
/// Handles are cheap to clone; clones refer to the same cell.
///
/// Observers receive clones of the outcome, so both `T` and `E` must be
/// [`Clone`]. Wrap large or unclonable payloads in an [`Arc`].
///
/// # Examples
///
/// ```rust,ignore
/// let task: Task<u32, String> = Task::new();
///
/// let producer = task.clone();
/// std::thread::spawn(move || producer.resolve(7));
///
/// assert_eq!(task.wait(), Ok(7));
/// ```
pub struct Task<T, E> {
    inner: Arc<Inner<T, E>>,
}

struct Inner<T, E> {
    /// Outcome, continuation queue and drain flag.
    state: Mutex<State<T, E>>,

    /// Broadcast once on completion to release blocked waiters.
    completed: Condvar,

    /// Context used by chaining operations that do not name one.
    context: Arc<dyn ExecutionContext>,
}

impl<T, E> Task<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates a pending task bound to the process-wide default context.
    pub fn new() -> Self {
        Self::with_context(default_context())
    }

    /// Creates a pending task whose continuations run on `context` by
    /// default.
    pub fn with_context(context: Arc<dyn ExecutionContext>) -> Self {
        Self::from_state(State::pending(), context)
    }

    /// Creates a task that is already resolved with `value`.
    pub fn resolved(value: T) -> Self {
        Self::from_state(State::completed(Ok(value)), default_context())
    }

    /// Creates a task that is already rejected with `error`.
    pub fn rejected(error: E) -> Self {
        Self::from_state(State::completed(Err(error)), default_context())
    }

    fn from_state(state: State<T, E>, context: Arc<dyn ExecutionContext>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                completed: Condvar::new(),
                context,
            }),
        }
    }

    /// Resolves the task with `value`.
    ///
    /// Returns `false`, leaving the task untouched, if it was already
    /// completed.
    pub fn resolve(&self, value: T) -> bool {
        self.complete(Ok(value))
    }

    /// Rejects the task with `error`.
    ///
    /// Returns `false`, leaving the task untouched, if it was already
    /// completed.
    pub fn reject(&self, error: E) -> bool {
        self.complete(Err(error))
    }

    /// Completes the task; the first caller wins.
    ///
    /// The winner stores the outcome, wakes every blocked waiter, then runs
    /// the queued continuations in attachment order, including any attached
    /// while they run. Later calls only re-signal the condvar.
    ///
    /// A panicking continuation does not stop the drain: every other
    /// continuation still runs, the task leaves the draining state, and the
    /// first panic is then resumed on the completing thread.
    pub(crate) fn complete(&self, outcome: Result<T, E>) -> bool {
        let mut state = lock(&self.inner.state);

        if state.outcome.is_some() {
            self.inner.completed.notify_all();
            return false;
        }

        trace!(rejected = outcome.is_err(), "task completed");

        state.outcome = Some(outcome);
        state.draining = true;
        self.inner.completed.notify_all();

        let mut panicked = None;

        loop {
            let batch = mem::take(&mut state.continuations);

            if batch.is_empty() {
                state.draining = false;
                break;
            }

            drop(state);

            trace!(count = batch.len(), "dispatching continuations");
            for continuation in batch {
                let run = AssertUnwindSafe(move || continuation(self));

                if let Err(payload) = panic::catch_unwind(run) {
                    warn!("continuation panicked while completing task");
                    panicked.get_or_insert(payload);
                }
            }

            state = lock(&self.inner.state);
        }

        drop(state);

        if let Some(payload) = panicked {
            panic::resume_unwind(payload);
        }

        true
    }

    /// Queues `continuation`, or runs it right away if the task is already
    /// completed and no drain is in progress.
    pub(crate) fn subscribe(&self, continuation: Continuation<T, E>) {
        let mut state = lock(&self.inner.state);

        if state.outcome.is_none() || state.draining {
            state.continuations.push(continuation);
            return;
        }

        drop(state);
        continuation(self);
    }

    /// Returns a clone of the value if the task resolved.
    pub fn result(&self) -> Option<T> {
        match &lock(&self.inner.state).outcome {
            Some(Ok(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// Returns a clone of the error if the task was rejected.
    pub fn error(&self) -> Option<E> {
        match &lock(&self.inner.state).outcome {
            Some(Err(error)) => Some(error.clone()),
            _ => None,
        }
    }

    /// Returns a clone of the outcome, or `None` while pending.
    pub fn outcome(&self) -> Option<Result<T, E>> {
        lock(&self.inner.state).outcome.clone()
    }

    /// Returns `true` if the task was rejected.
    pub fn is_error(&self) -> bool {
        matches!(lock(&self.inner.state).outcome, Some(Err(_)))
    }

    /// Returns `true` once the task is resolved or rejected.
    pub fn is_completed(&self) -> bool {
        lock(&self.inner.state).outcome.is_some()
    }

    /// Returns whether the task is still pending or already completed.
    pub fn state(&self) -> TaskState {
        lock(&self.inner.state).task_state()
    }

    /// The context continuations run on unless another one is given.
    pub fn context(&self) -> Arc<dyn ExecutionContext> {
        self.inner.context.clone()
    }

    /// Blocks the calling thread until the task is completed.
    ///
    /// Returns immediately if it already is. Any number of threads may wait
    /// at once; all are released on completion.
    pub fn wait_until_completed(&self) {
        let mut state = lock(&self.inner.state);

        while state.outcome.is_none() {
            state = wait(&self.inner.completed, state);
        }
    }

    /// Blocks until the task is completed and returns its outcome.
    pub fn wait(&self) -> Result<T, E> {
        let mut state = lock(&self.inner.state);

        loop {
            if let Some(outcome) = &state.outcome {
                return outcome.clone();
            }

            state = wait(&self.inner.completed, state);
        }
    }

    /// Blocks for at most `timeout` waiting for completion.
    ///
    /// Returns `true` if the task is completed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let state = lock(&self.inner.state);

        let (state, _) = self
            .inner
            .completed
            .wait_timeout_while(state, timeout, |state| state.outcome.is_none())
            .unwrap_or_else(PoisonError::into_inner);

        state.outcome.is_some()
    }
}

impl<T, E> Default for Task<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Returns a pending task on the default context.
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for Task<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Task<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.inner.state);

        f.debug_struct("Task")
            .field("state", &state.task_state())
            .field("rejected", &matches!(state.outcome, Some(Err(_))))
            .field("continuations", &state.continuations.len())
            .finish()
    }
}
