//! fanout core: batch download, record filtering and CSV reports over a
//! call-scoped worker pool.

pub mod config;
pub mod logging;

pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod naming;
pub mod record;
pub mod report;
pub mod storage;
pub mod task;
pub mod workspace;

pub use dispatch::{TaskHandler, WorkerPool};
pub use error::TaskError;
pub use logging::LogHandle;
pub use record::{Record, Scalar};
pub use task::{Artifact, Task, TaskKind, TaskResult};
pub use workspace::Workspace;
