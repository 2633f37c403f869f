//! Batch dispatch over a call-scoped worker pool.
//!
//! A [`WorkerPool`] runs one homogeneous batch of tasks with at most `size`
//! in flight, collects results by submission index and joins every worker
//! before returning. What a task does is up to the [`TaskHandler`].

mod handler;
mod pool;

pub use handler::TaskHandler;
pub use pool::WorkerPool;
