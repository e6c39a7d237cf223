//! Bounded-concurrency task dispatch.
//!
//! Runs a list of fallible async tasks with at most `limit` in flight and
//! returns their outputs in submission order. A fixed pool of
//! `min(limit, tasks)` workers shares an index cursor: each worker claims
//! the next unstarted index, runs that task, writes the output into the
//! slot for that index, and claims again. Claiming by index means a slow
//! task never stalls the other workers, and the task list itself is never
//! mutated while being raced.
//!
//! On the first task error the batch fails fast: the error is kept, no new
//! tasks are claimed, and in-flight tasks run to completion with their
//! outputs discarded.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

struct Shared<F, T, E> {
    /// Unstarted tasks, each taken exactly once by index.
    tasks: Vec<Mutex<Option<F>>>,
    /// Next index to claim.
    cursor: AtomicUsize,
    /// One slot per task, filled at the task's own index.
    results: Vec<Mutex<Option<T>>>,
    /// First error observed; later errors are dropped.
    first_error: Mutex<Option<E>>,
    /// Set on task failure, stops workers from claiming further indexes.
    failed: AtomicBool,
}

/// Run `tasks` with at most `limit` in flight.
///
/// Returns the task outputs in submission order, or the first error any
/// task produced. A `limit` of 0 is treated as 1.
pub async fn run_bounded<F, T, E>(tasks: Vec<F>, limit: usize) -> Result<Vec<T>, E>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let total = tasks.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let workers = limit.max(1).min(total);
    debug!(total, workers, "dispatching task batch");

    let shared = Arc::new(Shared {
        tasks: tasks.into_iter().map(|t| Mutex::new(Some(t))).collect(),
        cursor: AtomicUsize::new(0),
        results: (0..total).map(|_| Mutex::new(None)).collect(),
        first_error: Mutex::new(None),
        failed: AtomicBool::new(false),
    });

    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let shared = Arc::clone(&shared);
            tokio::spawn(worker_loop(shared))
        })
        .collect();

    for handle in handles {
        if let Err(err) = handle.await {
            if err.is_panic() {
                std::panic::resume_unwind(err.into_panic());
            }
        }
    }

    if let Some(err) = shared
        .first_error
        .lock()
        .expect("dispatch error slot poisoned")
        .take()
    {
        return Err(err);
    }

    let mut outputs = Vec::with_capacity(total);
    for slot in shared.results.iter() {
        let value = slot
            .lock()
            .expect("dispatch result slot poisoned")
            .take()
            .expect("every claimed task stored a result");
        outputs.push(value);
    }
    Ok(outputs)
}

async fn worker_loop<F, T, E>(shared: Arc<Shared<F, T, E>>)
where
    F: Future<Output = Result<T, E>>,
{
    loop {
        if shared.failed.load(Ordering::Acquire) {
            break;
        }
        let index = shared.cursor.fetch_add(1, Ordering::AcqRel);
        if index >= shared.tasks.len() {
            break;
        }

        // The cursor hands out each index once, so the slot is always
        // occupied here. The guard is dropped before the await.
        let task = shared.tasks[index]
            .lock()
            .expect("dispatch task slot poisoned")
            .take()
            .expect("task index claimed twice");

        match task.await {
            Ok(value) => {
                *shared.results[index]
                    .lock()
                    .expect("dispatch result slot poisoned") = Some(value);
            }
            Err(err) => {
                debug!(index, "task failed, aborting batch");
                let mut first = shared
                    .first_error
                    .lock()
                    .expect("dispatch error slot poisoned");
                if first.is_none() {
                    *first = Some(err);
                }
                shared.failed.store(true, Ordering::Release);
                break;
            }
        }
    }
}
