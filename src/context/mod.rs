//! Execution contexts.
//!
//! An [`ExecutionContext`] is the only scheduling capability a [`Task`]
//! needs: something that eventually runs a unit of work, either on the
//! calling thread or by handing it to another thread or queue.
//!
//! This module provides:
//! - the [`ExecutionContext`] trait itself, also implemented for plain
//!   closures taking a [`Work`],
//! - [`ImmediateContext`], which runs work on the calling thread,
//! - [`pool`], a work-stealing thread pool,
//! - the lazily-initialized, process-wide default context.
//!
//! [`Task`]: crate::Task

mod global;

pub mod pool;

pub use global::{default_context, set_default_context};

/// A unit of work handed to an [`ExecutionContext`].
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// Capability to run a unit of work.
///
/// Implementations must eventually invoke every `work` they receive (on the
/// calling thread or another one), must not panic themselves, and must be
/// safe to call from many completing tasks at once.
pub trait ExecutionContext: Send + Sync {
    /// Runs `work`, now or later, on this thread or another.
    fn execute(&self, work: Work);
}

impl<F> ExecutionContext for F
where
    F: Fn(Work) + Send + Sync,
{
    fn execute(&self, work: Work) {
        self(work)
    }
}

/// Runs work synchronously on the thread that submits it.
///
/// Handlers attached through this context run on whichever thread completes
/// the task (or attaches the handler, if the task is already complete).
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateContext;

impl ExecutionContext for ImmediateContext {
    fn execute(&self, work: Work) {
        work();
    }
}
