//! The task cell and everything built on it.
//!
//! This module defines:
//! - [`Task`], the write-once completion cell with its accessors and
//!   blocking waits,
//! - [`Task::continue_with`], the chaining primitive, and the shorthands
//!   derived from it (`then`, `then_typed`, `then_else`, `catch`,
//!   `finally`),
//! - [`Outcome`] and the conversion traits describing what a handler may
//!   return.

mod cast;
mod chain;
mod core;
mod outcome;
mod state;
mod sugar;

pub use self::core::Task;
pub use outcome::{IntoOutcome, Outcome, Settle};
pub use state::TaskState;
