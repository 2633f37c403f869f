//! Task failure taxonomy.
//!
//! Every component converts its own failures into a `TaskError` so that a
//! failing task only ever affects its own result.

use std::io;
use std::path::{Path, PathBuf};

/// Why a single task failed.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Transport error, timeout, or non-2xx HTTP status.
    #[error("{cause} for url: {url}")]
    Network { url: String, cause: String },
    /// Input file does not exist.
    #[error("no such file: {}", path.display())]
    NotFound { path: PathBuf },
    /// Input could not be parsed as the expected structure.
    #[error("invalid records in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Reading or writing an artifact failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Arguments are unusable (e.g. a directory where a file is expected).
    #[error("{0}")]
    Validation(String),
    /// The worker running the task panicked or was torn down.
    #[error("worker failed: {0}")]
    Worker(String),
}

impl TaskError {
    pub(crate) fn network(url: &str, cause: impl ToString) -> Self {
        TaskError::Network {
            url: url.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Maps an I/O error on `path`, turning `NotFound` into its own kind.
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            TaskError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            TaskError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}
