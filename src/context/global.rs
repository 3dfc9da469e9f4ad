use super::pool::ThreadPoolBuilder;
use super::{ExecutionContext, ImmediateContext};
use crate::error::ContextError;

use std::sync::{Arc, OnceLock};

use tracing::{debug, error};

/// The process-wide default context, created at most once.
static DEFAULT_CONTEXT: OnceLock<Arc<dyn ExecutionContext>> = OnceLock::new();

/// Returns the process-wide default execution context.
///
/// On first use this builds a [`ThreadPool`](super::pool::ThreadPool) with
/// the default configuration, unless [`set_default_context`] installed
/// another context beforehand. The pool lives for the rest of the process.
///
/// If the pool cannot be started, an error is logged and an
/// [`ImmediateContext`] is used instead, so tasks still make progress.
pub fn default_context() -> Arc<dyn ExecutionContext> {
    DEFAULT_CONTEXT.get_or_init(build_default).clone()
}

/// Installs `context` as the process-wide default.
///
/// This succeeds only once, and only before [`default_context`] has been
/// called for the first time.
///
/// # Errors
///
/// Returns [`ContextError::AlreadyInitialized`] if a default already exists.
pub fn set_default_context(context: Arc<dyn ExecutionContext>) -> Result<(), ContextError> {
    DEFAULT_CONTEXT
        .set(context)
        .map_err(|_| ContextError::AlreadyInitialized)?;

    debug!("installed caller-provided default execution context");
    Ok(())
}

fn build_default() -> Arc<dyn ExecutionContext> {
    match ThreadPoolBuilder::new().thread_name("deferred-worker").build() {
        Ok(pool) => {
            debug!(workers = pool.worker_threads(), "started default thread pool");
            Arc::new(pool)
        }
        Err(err) => {
            error!(error = %err, "failed to start default thread pool, running work inline");
            Arc::new(ImmediateContext)
        }
    }
}
