use super::outcome::{IntoOutcome, Outcome};
use super::Task;
use crate::context::ExecutionContext;

use std::any::type_name;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::error;

impl<T, E> Task<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Chains `callback` after this task, on this task's context.
    ///
    /// See [`continue_with_on`](Self::continue_with_on).
    pub fn continue_with<F, O>(&self, callback: F) -> Task<O::Value, E>
    where
        F: FnOnce(&Task<T, E>) -> O + Send + 'static,
        O: IntoOutcome<E>,
        O::Value: Clone + Send + 'static,
    {
        self.continue_with_on(self.context(), callback)
    }

    /// Chains `callback` after this task and returns the chained task.
    ///
    /// Once this task completes, `callback` is handed to `context` and
    /// called with the completed task, whatever its outcome. Its return
    /// value completes the chained task:
    ///
    /// - [`Outcome::Value`] resolves it,
    /// - [`Outcome::Error`] rejects it,
    /// - [`Outcome::Task`] makes it adopt that task's outcome once the
    ///   nested task completes. The nested task is never cancelled.
    ///
    /// If this task is already completed, the callback is dispatched right
    /// away, still through `context`. This call never blocks and never runs
    /// `callback` itself.
    ///
    /// # Panics
    ///
    /// A panic in `callback` is logged and then resumed on whichever thread
    /// `context` ran it. The chained task is never completed in that case, so
    /// anything waiting on it keeps waiting; use a bounded wait or a
    /// [`race`](crate::race) against a timeout where that matters.
    pub fn continue_with_on<F, O>(
        &self,
        context: Arc<dyn ExecutionContext>,
        callback: F,
    ) -> Task<O::Value, E>
    where
        F: FnOnce(&Task<T, E>) -> O + Send + 'static,
        O: IntoOutcome<E>,
        O::Value: Clone + Send + 'static,
    {
        let next = Task::with_context(context.clone());
        let target = next.clone();

        self.subscribe(Box::new(move |source: &Task<T, E>| {
            let source = source.clone();

            context.execute(Box::new(move || {
                match panic::catch_unwind(AssertUnwindSafe(|| callback(&source))) {
                    Ok(outcome) => target.adopt(outcome.into_outcome()),
                    Err(payload) => {
                        error!(
                            handler = type_name::<F>(),
                            output = type_name::<O::Value>(),
                            "continuation handler panicked; chained task stays pending"
                        );
                        panic::resume_unwind(payload);
                    }
                }
            }));
        }));

        next
    }

    /// Returns a task with the same eventual outcome whose continuations run
    /// on `context` by default.
    pub fn switch_context(&self, context: Arc<dyn ExecutionContext>) -> Task<T, E> {
        self.continue_with_on(context, |task| task.wait())
    }

    /// Completes this task from a handler's outcome.
    pub(crate) fn adopt(&self, outcome: Outcome<T, E>) {
        match outcome {
            Outcome::Value(value) => {
                self.resolve(value);
            }
            Outcome::Error(error) => {
                self.reject(error);
            }
            Outcome::Task(nested) => {
                let target = self.clone();
                let context = self.context();

                nested.subscribe(Box::new(move |nested: &Task<T, E>| {
                    let nested = nested.clone();

                    context.execute(Box::new(move || {
                        target.complete(nested.wait());
                    }));
                }));
            }
        }
    }
}
