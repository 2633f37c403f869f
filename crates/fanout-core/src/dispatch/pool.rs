//! Bounded worker pool for one batch.
//!
//! Keeps up to `size` tasks running on the blocking thread pool; when one
//! finishes, its worker slot picks up the next queued task until the batch
//! is drained.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::Dispatch;

use crate::error::TaskError;
use crate::logging::LogHandle;
use crate::task::{Task, TaskKind, TaskResult};

use super::handler::TaskHandler;

/// A pool of `size` worker slots, consumed by [`WorkerPool::run_batch`].
#[derive(Debug)]
pub struct WorkerPool {
    size: usize,
    dispatch: Dispatch,
}

impl WorkerPool {
    /// Creates a pool of `size` workers (0 is treated as 1) logging through `logs`.
    pub fn new(size: usize, logs: &LogHandle) -> Self {
        Self {
            size: size.max(1),
            dispatch: logs.dispatch().clone(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs every task and returns one result per task, `result[i]` for `tasks[i]`.
    ///
    /// A failing or panicking task only affects its own result. All workers
    /// are joined before this returns.
    pub async fn run_batch<H: TaskHandler>(
        self,
        tasks: Vec<Task>,
        handler: Arc<H>,
    ) -> Vec<TaskResult> {
        let labels: Vec<(TaskKind, String)> =
            tasks.iter().map(|t| (t.kind(), t.source())).collect();
        let mut slots: Vec<Option<TaskResult>> = (0..tasks.len()).map(|_| None).collect();
        tracing::debug!(tasks = tasks.len(), workers = self.size, "batch started");

        let mut queue = tasks.into_iter().enumerate();
        // Worker ids handed out lowest first.
        let mut idle: Vec<usize> = (1..=self.size).rev().collect();
        // A join error loses its worker id; replacements are numbered past `size`.
        let mut next_worker = self.size;
        let mut join_set = JoinSet::new();

        loop {
            while !idle.is_empty() {
                let Some((index, task)) = queue.next() else {
                    break;
                };
                let Some(worker) = idle.pop() else {
                    break;
                };
                let handler = Arc::clone(&handler);
                let dispatch = self.dispatch.clone();
                join_set.spawn_blocking(move || {
                    let result = tracing::dispatcher::with_default(&dispatch, || {
                        run_task(worker, handler.as_ref(), &task)
                    });
                    (index, worker, result)
                });
            }

            let Some(joined) = join_set.join_next().await else {
                break;
            };
            match joined {
                Ok((index, worker, result)) => {
                    slots[index] = Some(result);
                    idle.push(worker);
                }
                Err(e) => {
                    next_worker += 1;
                    idle.push(next_worker);
                    tracing::dispatcher::with_default(&self.dispatch, || {
                        tracing::error!(
                            "worker join failed: {}; starting worker-{}",
                            e,
                            next_worker
                        );
                    });
                }
            }
        }

        slots
            .into_iter()
            .zip(labels)
            .map(|(slot, (kind, source))| {
                slot.unwrap_or_else(|| TaskResult {
                    kind,
                    source,
                    outcome: Err(TaskError::Worker("task did not complete".to_string())),
                })
            })
            .collect()
    }
}

fn run_task<H: TaskHandler + ?Sized>(worker: usize, handler: &H, task: &Task) -> TaskResult {
    let verb = task.kind().verb();
    let source = task.source();
    tracing::info!("worker-{} started {} {}", worker, verb, source);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(task)))
        .unwrap_or_else(|payload| Err(TaskError::Worker(panic_message(payload.as_ref()))));

    match &outcome {
        Ok(artifact) => tracing::info!("worker-{} finished {} {}", worker, verb, artifact.name),
        Err(e) => tracing::warn!("worker-{} failed {} {}: {}", worker, verb, source, e),
    }
    TaskResult::new(task, outcome)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
