//! Combinators joining several tasks into one.
//!
//! Each combinator subscribes a continuation to every input task and writes
//! into a single output task exactly once. Inputs are never cancelled: once
//! the output is decided, the remaining inputs keep running and their
//! outcomes are ignored.
//!
//! - [`all`]: every value in input order, or the first error
//! - [`race`]: the outcome of whichever input completes first
//! - [`all_settled`]: every outcome in input order, never rejecting
//!
//! Each has an `_on` variant taking the execution context used for the
//! subscriptions and the output task.

mod all;
mod all_settled;
mod race;

#[doc(inline)]
pub use all::{all, all_on};
#[doc(inline)]
pub use all_settled::{all_settled, all_settled_on};
#[doc(inline)]
pub use race::{race, race_on};

use std::mem;

/// Bookkeeping shared by the continuations of one `all` or `all_settled`
/// call, guarded by a single lock per call.
pub(crate) struct Aggregate<S> {
    /// One slot per input, in input order.
    slots: Vec<Option<S>>,

    /// Inputs not yet recorded.
    remaining: usize,

    /// Set once the output task has been (or is about to be) completed.
    decided: bool,
}

impl<S> Aggregate<S> {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| None).collect(),
            remaining: len,
            decided: false,
        }
    }

    /// Marks the output as decided.
    ///
    /// Returns `false` if it already was, in which case the caller must not
    /// touch the output.
    pub(crate) fn decide(&mut self) -> bool {
        !mem::replace(&mut self.decided, true)
    }

    /// Records `value` for input `index`.
    ///
    /// Returns every recorded value, in input order, once the last input is
    /// in; the aggregate is then decided.
    pub(crate) fn fill(&mut self, index: usize, value: S) -> Option<Vec<S>> {
        if self.decided || self.slots[index].is_some() {
            return None;
        }

        self.slots[index] = Some(value);
        self.remaining -= 1;

        if self.remaining > 0 || !self.decide() {
            return None;
        }

        mem::take(&mut self.slots).into_iter().collect()
    }
}
