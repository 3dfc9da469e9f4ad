mod common;

use common::TestError;
use deferred::{ExecutionContext, Task, ThreadPool, ThreadPoolBuilder, all};

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

#[test]
fn test_single_worker_thread() {
    let pool = ThreadPoolBuilder::new().worker_threads(1).build().unwrap();
    assert_eq!(pool.worker_threads(), 1);

    let (tx, rx) = mpsc::channel();
    pool.execute(Box::new(move || tx.send(42).unwrap()));

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(42));
}

#[test]
#[should_panic(expected = "worker_threads must be > 0")]
fn test_worker_threads_zero_panics() {
    let _ = ThreadPoolBuilder::new().worker_threads(0).build();
}

#[test]
fn test_work_runs_on_named_pool_threads() {
    let pool = ThreadPoolBuilder::new()
        .worker_threads(2)
        .thread_name("pool-test")
        .build()
        .unwrap();

    let (tx, rx) = mpsc::channel();
    for _ in 0..4 {
        let tx = tx.clone();
        pool.execute(Box::new(move || {
            let name = thread::current().name().map(str::to_string);
            tx.send(name).unwrap();
        }));
    }

    for _ in 0..4 {
        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(name.unwrap().starts_with("pool-test-"));
    }
}

#[test]
fn test_pool_stress() {
    let pool = ThreadPoolBuilder::new().worker_threads(4).build().unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..1000 {
        let counter = counter.clone();
        pool.execute(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
    }

    drop(pool);

    assert_eq!(counter.load(Ordering::SeqCst), 1000);
}

#[test]
fn test_drop_drains_queued_work() {
    let pool = ThreadPoolBuilder::new().worker_threads(1).build().unwrap();
    let done = Arc::new(Mutex::new(Vec::new()));

    for i in 0..10 {
        let done = done.clone();
        pool.execute(Box::new(move || {
            thread::sleep(Duration::from_millis(2));
            done.lock().unwrap().push(i);
        }));
    }

    drop(pool);

    assert_eq!(done.lock().unwrap().len(), 10);
}

#[test]
fn test_panicking_work_does_not_kill_worker() {
    let pool = ThreadPoolBuilder::new().worker_threads(1).build().unwrap();

    pool.execute(Box::new(|| panic!("work item failure")));

    let (tx, rx) = mpsc::channel();
    pool.execute(Box::new(move || tx.send("still alive").unwrap()));

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok("still alive"));
}

#[test]
fn test_panicking_handler_leaves_chained_task_pending() {
    let pool: Arc<dyn ExecutionContext> =
        Arc::new(ThreadPoolBuilder::new().worker_threads(1).build().unwrap());

    let task: Task<u32, TestError> = Task::with_context(pool.clone());
    let broken = task.then(|_| -> Result<u32, TestError> { panic!("handler failure") });
    let healthy = task.then(|v| Ok(v + 1));

    task.resolve(1);

    assert_eq!(healthy.wait(), Ok(2));
    assert!(!broken.wait_timeout(Duration::from_millis(50)));
    assert!(!broken.is_completed());

    let next: Task<u32, TestError> = Task::with_context(pool);
    let tripled = next.then(|v| Ok(v * 3));
    next.resolve(5);

    assert_eq!(tripled.wait(), Ok(15));
}

#[test]
fn test_nested_work_from_worker() {
    let pool: Arc<dyn ExecutionContext> =
        Arc::new(ThreadPoolBuilder::new().worker_threads(2).build().unwrap());
    let (tx, rx) = mpsc::channel();

    let inner_pool = pool.clone();
    pool.execute(Box::new(move || {
        for i in 0..5 {
            let tx = tx.clone();
            inner_pool.execute(Box::new(move || tx.send(i).unwrap()));
        }
    }));

    let received: HashSet<_> = (0..5)
        .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
        .collect();
    assert_eq!(received, (0..5).collect());
}

#[test]
fn test_tasks_chain_on_custom_pool() {
    let pool: Arc<dyn ExecutionContext> = Arc::new(ThreadPool::new().unwrap());

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let task: Task<u32, TestError> = Task::with_context(pool.clone());
            let chained = task.then(|v| Ok(v * 2));
            task.resolve(i);
            chained
        })
        .collect();

    let doubled = all(tasks).wait().unwrap();

    assert_eq!(doubled, (0..20).map(|i| i * 2).collect::<Vec<_>>());
}
