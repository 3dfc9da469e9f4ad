//! Error types produced by the crate itself.
//!
//! Producer errors are whatever `E` a task is rejected with; the types here
//! cover the few failures the library synthesizes on its own.

use std::any::{Any, type_name};
use std::io;
use std::sync::Arc;

/// The value handed to [`Task::then_typed`](crate::Task::then_typed) was not
/// of the expected type.
///
/// The original value is kept so that a later `catch` can inspect or recover
/// it. Cloning the error shares the value.
#[derive(Debug, Clone, thiserror::Error)]
#[error("expected a value of type `{expected}`, found `{found}`")]
pub struct TypeMismatchError {
    expected: &'static str,
    found: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl TypeMismatchError {
    pub(crate) fn new<V, T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            expected: type_name::<V>(),
            found: type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// Builds the error around a value that was already type-erased.
    pub(crate) fn erased<V>(value: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            expected: type_name::<V>(),
            found: "dyn Any",
            value,
        }
    }

    /// Name of the type the handler expected.
    pub fn expected(&self) -> &'static str {
        self.expected
    }

    /// Name of the type that was actually delivered, when it is statically
    /// known.
    pub fn found(&self) -> &'static str {
        self.found
    }

    /// Borrows the original value if it is a `T`.
    pub fn value<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Takes the original value back if it is a `T`.
    ///
    /// The value is moved out when this is the last handle to it and cloned
    /// otherwise. On a type mismatch the error is handed back unchanged.
    pub fn into_value<T>(self) -> Result<T, Self>
    where
        T: Any + Send + Sync + Clone,
    {
        match Arc::downcast::<T>(self.value) {
            Ok(value) => Ok(Arc::unwrap_or_clone(value)),
            Err(value) => Err(Self { value, ..self }),
        }
    }

    /// Returns the shared, type-erased original value.
    pub fn into_inner(self) -> Arc<dyn Any + Send + Sync> {
        self.value
    }
}

/// Errors raised while configuring the process-wide default context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// The default execution context was already set or lazily created.
    #[error("default execution context is already initialized")]
    AlreadyInitialized,
}

/// Errors raised while building a [`ThreadPool`](crate::ThreadPool).
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// The operating system refused to start a worker thread.
    #[error("failed to spawn worker thread {index}")]
    Spawn {
        index: usize,
        #[source]
        source: io::Error,
    },
}
