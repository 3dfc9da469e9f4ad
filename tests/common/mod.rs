#![allow(dead_code)]

use deferred::{ExecutionContext, ImmediateContext, Task, TypeMismatchError, Work};

use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, thiserror::Error)]
pub enum TestError {
    #[error("timed out after {0} ms")]
    Timeout(u64),

    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Mismatch(#[from] TypeMismatchError),
}

impl PartialEq for TestError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TestError::Timeout(a), TestError::Timeout(b)) => a == b,
            (TestError::Failed(a), TestError::Failed(b)) => a == b,
            (TestError::Mismatch(a), TestError::Mismatch(b)) => {
                a.expected() == b.expected() && a.found() == b.found()
            }
            _ => false,
        }
    }
}

pub fn failed(message: &str) -> TestError {
    TestError::Failed(message.to_string())
}

/// Resolves with `ms` after sleeping `ms` milliseconds on its own thread.
pub fn delay(ms: u64) -> Task<u64, TestError> {
    let task = Task::new();
    let producer = task.clone();

    thread::spawn(move || {
        thread::sleep(Duration::from_millis(ms));
        producer.resolve(ms);
    });

    task
}

/// Rejects with [`TestError::Timeout`] after `ms` milliseconds.
pub fn timeout_after(ms: u64) -> Task<u64, TestError> {
    let task = Task::new();
    let producer = task.clone();

    thread::spawn(move || {
        thread::sleep(Duration::from_millis(ms));
        producer.reject(TestError::Timeout(ms));
    });

    task
}

pub fn immediate() -> Arc<dyn ExecutionContext> {
    Arc::new(ImmediateContext)
}

/// A context that runs every work item on a freshly spawned thread.
pub fn spawning() -> Arc<dyn ExecutionContext> {
    Arc::new(|work: Work| {
        thread::spawn(work);
    })
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
