use super::Aggregate;
use crate::context::{ExecutionContext, default_context};
use crate::task::{Outcome, Task};
use crate::utils::lock;

use std::sync::{Arc, Mutex};

/// Resolves with every input's outcome, in input order, once all complete.
///
/// Never rejects. An empty input resolves immediately with an empty vector.
pub fn all_settled<T, E, I>(tasks: I) -> Task<Vec<Result<T, E>>, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    I: IntoIterator<Item = Task<T, E>>,
{
    all_settled_on(default_context(), tasks)
}

/// [`all_settled`] on an explicit execution context.
pub fn all_settled_on<T, E, I>(
    context: Arc<dyn ExecutionContext>,
    tasks: I,
) -> Task<Vec<Result<T, E>>, E>
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
            let settled = lock(&aggregate).fill(index, outcome);

            if let Some(outcomes) = settled {
                output.resolve(outcomes);
            }

            Outcome::<(), E>::Value(())
        });
    }

    output
}
