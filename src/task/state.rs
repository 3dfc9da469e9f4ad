use super::Task;

/// Observable lifecycle state of a [`Task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Not completed yet; continuations are queued.
    Pending,

    /// Resolved or rejected. The outcome never changes again.
    Completed,
}

/// A callback waiting for a task to complete.
///
/// It receives the completed task by reference, so queued callbacks never
/// keep their own task alive.
pub(crate) type Continuation<T, E> = Box<dyn FnOnce(&Task<T, E>) + Send + 'static>;

/// Everything guarded by a task's lock.
pub(crate) struct State<T, E> {
    /// `None` while pending, then the value or the error.
    pub(crate) outcome: Option<Result<T, E>>,

    /// Callbacks in attachment order.
    pub(crate) continuations: Vec<Continuation<T, E>>,

    /// Set while the completing thread dispatches `continuations`.
    ///
    /// Callbacks attached meanwhile are queued behind the ones being
    /// dispatched instead of overtaking them.
    pub(crate) draining: bool,
}

impl<T, E> State<T, E> {
    pub(crate) fn pending() -> Self {
        Self {
            outcome: None,
            continuations: Vec::new(),
            draining: false,
        }
    }

    pub(crate) fn completed(outcome: Result<T, E>) -> Self {
        Self {
            outcome: Some(outcome),
            continuations: Vec::new(),
            draining: false,
        }
    }

    pub(crate) fn task_state(&self) -> TaskState {
        match self.outcome {
            Some(_) => TaskState::Completed,
            None => TaskState::Pending,
        }
    }
}
