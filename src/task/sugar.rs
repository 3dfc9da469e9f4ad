//! Chaining shorthands, all expressed through [`Task::continue_with`].

use super::Task;
use super::cast::checked_cast;
use super::outcome::{IntoOutcome, Outcome, Settle};
use crate::error::TypeMismatchError;

use std::any::Any;

impl<T, E> Task<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Runs `on_fulfilled` with the value once this task resolves.
    ///
    /// If this task is rejected, the handler is skipped and the error is
    /// passed on unchanged.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let length = Task::<String, Error>::resolved("four".into())
    ///     .then(|s| Ok(s.len()));
    ///
    /// assert_eq!(length.wait(), Ok(4));
    /// ```
    pub fn then<F, O>(&self, on_fulfilled: F) -> Task<O::Value, E>
    where
        F: FnOnce(T) -> O + Send + 'static,
        O: IntoOutcome<E>,
        O::Value: Clone + Send + 'static,
    {
        self.continue_with(move |task: &Task<T, E>| match task.wait() {
            Ok(value) => on_fulfilled(value).into_outcome(),
            Err(error) => Outcome::Error(error),
        })
    }

    /// Like [`then`](Self::then), but only if the value is a `V` at runtime.
    ///
    /// When it is not, the handler is skipped and the chained task is
    /// rejected with a [`TypeMismatchError`] carrying the original value. A
    /// task of `Arc<dyn Any + Send + Sync>` is checked against the value it
    /// holds.
    pub fn then_typed<V, F, O>(&self, on_fulfilled: F) -> Task<O::Value, E>
    where
        T: Sync,
        V: Any + Clone + Send + Sync,
        E: From<TypeMismatchError>,
        F: FnOnce(V) -> O + Send + 'static,
        O: IntoOutcome<E>,
        O::Value: Clone + Send + 'static,
    {
        self.continue_with(move |task: &Task<T, E>| match task.wait() {
            Ok(value) => match checked_cast::<T, V>(value) {
                Ok(value) => on_fulfilled(value).into_outcome(),
                Err(mismatch) => Outcome::Error(E::from(mismatch)),
            },
            Err(error) => Outcome::Error(error),
        })
    }

    /// Runs whichever handler matches this task's outcome.
    pub fn then_else<F, G, O, P>(&self, on_fulfilled: F, on_rejected: G) -> Task<O::Value, E>
    where
        F: FnOnce(T) -> O + Send + 'static,
        G: FnOnce(E) -> P + Send + 'static,
        O: IntoOutcome<E>,
        P: IntoOutcome<E, Value = O::Value>,
        O::Value: Clone + Send + 'static,
    {
        self.continue_with(move |task: &Task<T, E>| match task.wait() {
            Ok(value) => on_fulfilled(value).into_outcome(),
            Err(error) => on_rejected(error).into_outcome(),
        })
    }

    /// Recovers from a rejection.
    ///
    /// `on_rejected` runs only if this task is rejected; returning `Ok`
    /// clears the error for the rest of the chain. A resolved value passes
    /// through untouched.
    pub fn catch<G, P>(&self, on_rejected: G) -> Task<T, E>
    where
        G: FnOnce(E) -> P + Send + 'static,
        P: IntoOutcome<E, Value = T>,
    {
        self.continue_with(move |task: &Task<T, E>| match task.wait() {
            Ok(value) => Outcome::Value(value),
            Err(error) => on_rejected(error).into_outcome(),
        })
    }

    /// Runs `on_final` whatever the outcome, then passes the outcome on.
    ///
    /// The chained task carries this task's value or error, never the
    /// handler's. If the handler returns a [`Task`], the chained task
    /// completes only after that task does.
    pub fn finally<F, S>(&self, on_final: F) -> Task<T, E>
    where
        F: FnOnce() -> S + Send + 'static,
        S: Settle,
    {
        self.continue_with(move |task: &Task<T, E>| {
            let outcome = task.wait();
            let carried = Task::with_context(task.context());
            let target = carried.clone();

            on_final().on_settled(Box::new(move || {
                target.complete(outcome);
            }));

            Outcome::Task(carried)
        })
    }
}
