use super::Task;
use crate::context::Work;

/// What a continuation produced.
///
/// A handler either yields a value, yields an error, or defers to another
/// task whose eventual outcome is adopted (flattening).
#[derive(Debug)]
pub enum Outcome<U, E> {
    /// Resolve the chained task with this value.
    Value(U),

    /// Reject the chained task with this error.
    Error(E),

    /// Complete the chained task with this task's outcome once it settles.
    Task(Task<U, E>),
}

impl<U, E> From<Result<U, E>> for Outcome<U, E> {
    fn from(result: Result<U, E>) -> Self {
        match result {
            Ok(value) => Outcome::Value(value),
            Err(error) => Outcome::Error(error),
        }
    }
}

impl<U, E> From<Task<U, E>> for Outcome<U, E> {
    fn from(task: Task<U, E>) -> Self {
        Outcome::Task(task)
    }
}

/// Conversion of a handler's return value into an [`Outcome`].
///
/// Implemented for [`Outcome`], [`Result`] and [`Task`], so a handler can
/// return `Ok(v)`, `Err(e)` or another task directly.
pub trait IntoOutcome<E> {
    /// Success type of the resulting outcome.
    type Value;

    fn into_outcome(self) -> Outcome<Self::Value, E>;
}

impl<U, E> IntoOutcome<E> for Outcome<U, E> {
    type Value = U;

    fn into_outcome(self) -> Outcome<U, E> {
        self
    }
}

impl<U, E> IntoOutcome<E> for Result<U, E> {
    type Value = U;

    fn into_outcome(self) -> Outcome<U, E> {
        Outcome::from(self)
    }
}

impl<U, E> IntoOutcome<E> for Task<U, E> {
    type Value = U;

    fn into_outcome(self) -> Outcome<U, E> {
        Outcome::Task(self)
    }
}

/// Return value of a [`Task::finally`] handler.
///
/// `()` means the handler is done as soon as it returns. A [`Task`] means the
/// chain waits for that task to complete, whatever its outcome.
pub trait Settle {
    /// Runs `work` once this value is settled.
    fn on_settled(self, work: Work);
}

impl Settle for () {
    fn on_settled(self, work: Work) {
        work();
    }
}

impl<U, E> Settle for Task<U, E>
where
    U: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn on_settled(self, work: Work) {
        self.subscribe(Box::new(move |_: &Task<U, E>| work()));
    }
}
