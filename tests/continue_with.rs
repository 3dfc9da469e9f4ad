mod common;

use common::{TestError, delay, failed, immediate, init_tracing, spawning};
use deferred::{ImmediateContext, Outcome, Task};

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

#[test]
fn test_continuation_runs_on_completed_task() {
    init_tracing();
    let (tx, rx) = mpsc::channel();

    Task::<(), TestError>::resolved(()).continue_with(move |_task: &Task<(), TestError>| {
        tx.send(()).unwrap();
        Ok::<(), TestError>(())
    });

    rx.recv_timeout(Duration::from_secs(5))
        .expect("continuation should run without further trigger");
}

#[test]
fn test_continuation_runs_when_rejected() {
    let chained = Task::<i32, TestError>::rejected(failed("error"))
        .continue_with(|task: &Task<i32, TestError>| Ok::<_, TestError>(task.is_error()));

    assert_eq!(chained.wait(), Ok(true));
}

#[test]
fn test_previous_result_is_passed() {
    let chained = Task::<i32, TestError>::resolved(10)
        .continue_with(|task: &Task<i32, TestError>| Ok::<_, TestError>(task.result()));

    assert_eq!(chained.wait(), Ok(Some(10)));
}

#[test]
fn test_error_value_is_passed() {
    let chained = Task::<i32, TestError>::rejected(failed("error"))
        .continue_with(|task: &Task<i32, TestError>| Ok::<_, TestError>(task.error()));

    assert_eq!(chained.wait(), Ok(Some(failed("error"))));
}

#[test]
fn test_return_value_becomes_result() {
    let chained = Task::<(), TestError>::resolved(())
        .continue_with(|_task: &Task<(), TestError>| Ok::<_, TestError>("result"))
        .continue_with(|task: &Task<&str, TestError>| Ok::<_, TestError>(task.result()));

    assert_eq!(chained.wait(), Ok(Some("result")));
}

#[test]
fn test_returned_error_rejects_chained_task() {
    let chained = Task::<(), TestError>::resolved(())
        .continue_with(|_task: &Task<(), TestError>| Outcome::<u8, _>::Error(failed("handler")));

    assert_eq!(chained.wait(), Err(failed("handler")));
}

#[test]
fn test_pending_task_queues_continuation() {
    let task: Task<i32, TestError> = Task::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = calls.clone();
    let chained = task.continue_with(move |task: &Task<i32, TestError>| {
        counter.fetch_add(1, Ordering::SeqCst);
        task.wait().map(|v| v + 1)
    });

    thread::sleep(Duration::from_millis(20));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!chained.is_completed());

    task.resolve(41);

    assert_eq!(chained.wait(), Ok(42));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_continuations_run_in_attachment_order() {
    let task: Task<(), TestError> = Task::with_context(immediate());
    let order = Arc::new(Mutex::new(Vec::new()));

    for i in 0..5 {
        let order = order.clone();
        task.continue_with(move |_task: &Task<(), TestError>| {
            order.lock().unwrap().push(i);
            Ok::<(), TestError>(())
        });
    }

    task.resolve(());

    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_continuation_attached_while_draining_runs_last() {
    let task: Task<(), TestError> = Task::with_context(immediate());
    let order = Arc::new(Mutex::new(Vec::new()));

    let first = order.clone();
    let nested_order = order.clone();
    task.continue_with(move |task: &Task<(), TestError>| {
        first.lock().unwrap().push("first");

        task.continue_with(move |_task: &Task<(), TestError>| {
            nested_order.lock().unwrap().push("nested");
            Ok::<(), TestError>(())
        });

        Ok::<(), TestError>(())
    });

    let second = order.clone();
    task.continue_with(move |_task: &Task<(), TestError>| {
        second.lock().unwrap().push("second");
        Ok::<(), TestError>(())
    });

    task.resolve(());

    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "nested"]);
}

#[test]
fn test_each_continuation_runs_exactly_once() {
    let task: Task<u32, TestError> = Task::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let chained: Vec<_> = (0..32)
        .map(|_| {
            let calls = calls.clone();
            task.continue_with(move |_task: &Task<u32, TestError>| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<(), TestError>(())
            })
        })
        .collect();

    let producers: Vec<_> = (0..4)
        .map(|i| {
            let task = task.clone();
            thread::spawn(move || task.resolve(i))
        })
        .collect();

    for producer in producers {
        producer.join().unwrap();
    }

    for task in chained {
        task.wait_until_completed();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 32);
}

#[test]
fn test_returned_task_is_flattened() {
    let chained = Task::<u64, TestError>::resolved(50)
        .continue_with(|task: &Task<u64, TestError>| match task.result() {
            Some(ms) => delay(ms),
            None => Task::rejected(failed("missing")),
        });

    assert_eq!(chained.wait(), Ok(50));
}

#[test]
fn test_flattened_rejection_is_propagated() {
    let nested: Task<u8, TestError> = Task::new();
    let inner = nested.clone();

    let chained = Task::<(), TestError>::resolved(())
        .continue_with(move |_task: &Task<(), TestError>| inner);

    thread::sleep(Duration::from_millis(20));
    assert!(!chained.is_completed());

    nested.reject(failed("nested"));

    assert_eq!(chained.wait(), Err(failed("nested")));
}

#[test]
fn test_context_switches_thread() {
    let caller = thread::current().id();

    let chained = Task::<(), TestError>::resolved(()).continue_with_on(
        spawning(),
        |_task: &Task<(), TestError>| Ok::<_, TestError>(thread::current().id()),
    );

    let worker = chained.wait().unwrap();
    assert_ne!(worker, caller);
}

#[test]
fn test_chained_task_inherits_context() {
    let context = immediate();
    let chained = Task::<u8, TestError>::resolved(1)
        .continue_with_on(context.clone(), |task: &Task<u8, TestError>| task.wait());

    assert!(Arc::ptr_eq(&chained.context(), &context));
}

#[test]
fn test_switch_context_moves_later_handlers() {
    let task: Task<u8, TestError> = Task::new();
    let switched = task.switch_context(Arc::new(ImmediateContext));

    let resolver = thread::current().id();
    let observed = switched.then(move |v| Ok((v, thread::current().id() == resolver)));

    task.resolve(3);

    assert_eq!(switched.wait(), Ok(3));
    assert_eq!(observed.wait(), Ok((3, true)));
}

#[test]
fn test_panicking_continuation_does_not_block_later_ones() {
    init_tracing();
    let task: Task<u32, TestError> = Task::with_context(immediate());
    let order = Arc::new(Mutex::new(Vec::new()));

    task.continue_with(|_task: &Task<u32, TestError>| -> Result<(), TestError> {
        panic!("continuation failure")
    });

    let seen = order.clone();
    task.continue_with(move |task: &Task<u32, TestError>| {
        seen.lock().unwrap().push(task.wait()?);
        Ok::<(), TestError>(())
    });

    let resolved = panic::catch_unwind(AssertUnwindSafe(|| task.resolve(3)));
    assert!(resolved.is_err());
    assert_eq!(*order.lock().unwrap(), vec![3]);

    let seen = order.clone();
    let late = task.continue_with(move |task: &Task<u32, TestError>| {
        seen.lock().unwrap().push(task.wait()? + 1);
        Ok::<(), TestError>(())
    });

    assert!(late.is_completed());
    assert_eq!(*order.lock().unwrap(), vec![3, 4]);
    assert!(!task.resolve(5));
}
