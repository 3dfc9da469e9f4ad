use super::Aggregate;
use crate::context::{ExecutionContext, default_context};
use crate::task::{Outcome, Task};
use crate::utils::lock;

use std::sync::{Arc, Mutex};

/// Resolves with every input's value, in input order, once all resolve.
///
/// Fails fast: the first rejection rejects the output with that error while
/// the other inputs run on unobserved. An empty input resolves immediately
/// with an empty vector.
///
/// # Examples
///
/// ```rust,ignore
/// let joined = all([Task::resolved(1), Task::resolved(2)]);
///
/// assert_eq!(joined.wait(), Ok(vec![1, 2]));
/// ```
pub fn all<T, E, I>(tasks: I) -> Task<Vec<T>, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    I: IntoIterator<Item = Task<T, E>>,
{
    all_on(default_context(), tasks)
}

/// [`all`] on an explicit execution context.
pub fn all_on<T, E, I>(context: Arc<dyn ExecutionContext>, tasks: I) -> Task<Vec<T>, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    I: IntoIterator<Item = Task<T, E>>,
{
    let tasks: Vec<_> = tasks.into_iter().collect();
    let output = Task::with_context(context.clone());

    if tasks.is_empty() {
        output.resolve(Vec::new());
        return output;
    }

    let aggregate = Arc::new(Mutex::new(Aggregate::new(tasks.len())));

    for (index, task) in tasks.iter().enumerate() {
        let aggregate = aggregate.clone();
        let output = output.clone();

        task.continue_with_on(context.clone(), move |task: &Task<T, E>| {
            let outcome = task.wait();
            let mut aggregate = lock(&aggregate);

            match outcome {
                Ok(value) => {
                    if let Some(values) = aggregate.fill(index, value) {
                        drop(aggregate);
                        output.resolve(values);
                    }
                }
                Err(error) => {
                    if aggregate.decide() {
                        drop(aggregate);
                        output.reject(error);
                    }
                }
            }

            Outcome::<(), E>::Value(())
        });
    }

    output
}
