//! Execution seam between the pool and the components.

use crate::error::TaskError;
use crate::task::{Artifact, Task};

/// Runs one task to completion on a pool worker.
///
/// Implementations must not share mutable state across calls; the pool may
/// invoke `handle` from several threads at once.
pub trait TaskHandler: Send + Sync + 'static {
    fn handle(&self, task: &Task) -> Result<Artifact, TaskError>;
}
