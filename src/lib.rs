//! # Deferred
//!
//! **Deferred** provides [`Task`], a thread-safe deferred result: a write-once
//! cell that one party completes (with a value or an error) and any number of
//! other threads observe, chain on, or block on.
//!
//! Work attached to a task runs on a pluggable [`ExecutionContext`]. By default
//! this is a process-wide work-stealing [`ThreadPool`], but any context can be
//! supplied per call or per task.
//!
//! The crate offers:
//!
//! - A **completion cell** with first-writer-wins `resolve` / `reject` and
//!   blocking waits
//! - **Chaining** through [`Task::continue_with`] and the sugar built on it
//!   (`then`, `then_typed`, `then_else`, `catch`, `finally`), including
//!   flattening when a handler returns another task
//! - **Combinators** [`all`], [`race`] and [`all_settled`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use deferred::Task;
//!
//! let task: Task<i32, String> = Task::new();
//!
//! let doubled = task.then(|v| Ok(v * 2));
//!
//! task.resolve(21);
//!
//! assert_eq!(doubled.wait(), Ok(42));
//! ```
//!
//! ## Modules
//!
//! - [`task`] — The task cell, outcomes and chaining
//! - [`context`] — Execution contexts and the default thread pool
//! - [`combinators`] — `all`, `race` and `all_settled`
//! - [`error`] — Error types produced by the crate

mod utils;

pub mod combinators;
pub mod context;
pub mod error;
pub mod task;

pub use combinators::{all, all_settled, race};
pub use context::pool::{ThreadPool, ThreadPoolBuilder};
pub use context::{
    ExecutionContext, ImmediateContext, Work, default_context, set_default_context,
};
pub use error::{ContextError, PoolError, TypeMismatchError};
pub use task::{IntoOutcome, Outcome, Settle, Task, TaskState};
