use crate::context::{ExecutionContext, default_context};
use crate::task::{Outcome, Task};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Completes with the outcome of whichever input completes first.
///
/// Later completions cannot affect the output. Simultaneous completions are
/// ordered arbitrarily. With no inputs the output never completes.
pub fn race<T, E, I>(tasks: I) -> Task<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    I: IntoIterator<Item = Task<T, E>>,
{
    race_on(default_context(), tasks)
}

/// [`race`] on an explicit execution context.
pub fn race_on<T, E, I>(context: Arc<dyn ExecutionContext>, tasks: I) -> Task<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    I: IntoIterator<Item = Task<T, E>>,
{
    let output = Task::with_context(context.clone());
    let decided = Arc::new(AtomicBool::new(false));

    for task in tasks {
        let decided = decided.clone();
        let output = output.clone();

        task.continue_with_on(context.clone(), move |task: &Task<T, E>| {
            if !decided.swap(true, Ordering::AcqRel) {
                match task.wait() {
                    Ok(value) => output.resolve(value),
                    Err(error) => output.reject(error),
                };
            }

            Outcome::<(), E>::Value(())
        });
    }

    output
}
