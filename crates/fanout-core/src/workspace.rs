//! The output directory and the components that write into it.
//!
//! `Workspace` is the production [`TaskHandler`]: it routes each task to the
//! fetcher, the record filter or the report writer.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::FanoutConfig;
use crate::dispatch::{TaskHandler, WorkerPool};
use crate::error::TaskError;
use crate::fetch::Fetcher;
use crate::filter::{Predicate, RecordFilter};
use crate::logging::LogHandle;
use crate::report::ReportWriter;
use crate::storage;
use crate::task::{Artifact, Task, TaskResult};

#[derive(Debug, Clone)]
pub struct Workspace {
    dir: PathBuf,
    fetcher: Fetcher,
    filter: RecordFilter,
    report: ReportWriter,
}

impl Workspace {
    /// Builds the components for `dir` without touching the filesystem.
    pub fn new(dir: impl Into<PathBuf>, cfg: &FanoutConfig) -> Self {
        let dir = dir.into();
        Self {
            fetcher: Fetcher::new(&dir, cfg.fetch_timeout()),
            filter: RecordFilter::new(&dir, Predicate::from(&cfg.filter)),
            report: ReportWriter::new(&dir, cfg.report.columns.clone()),
            dir,
        }
    }

    /// Creates `dir` if missing, then builds the workspace.
    pub fn open(dir: impl Into<PathBuf>, cfg: &FanoutConfig) -> Result<Self> {
        let dir = dir.into();
        if dir.exists() && !dir.is_dir() {
            anyhow::bail!("output path {} is not a directory", dir.display());
        }
        let created = storage::ensure_dir(&dir)
            .with_context(|| format!("create output directory {}", dir.display()))?;
        if created {
            tracing::info!("Created directory: {}", dir.display());
        }
        Ok(Self::new(dir, cfg))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn record_filter(&self) -> &RecordFilter {
        &self.filter
    }

    pub fn report_writer(&self) -> &ReportWriter {
        &self.report
    }
}

impl TaskHandler for Workspace {
    fn handle(&self, task: &Task) -> Result<Artifact, TaskError> {
        match task {
            Task::Download { url } => self.fetcher.fetch(url),
            Task::FilterRecords { input } => self.filter.filter(input),
            Task::WriteReport { rows } => self.report.write_report(rows),
        }
    }
}

/// Runs `tasks` against `workspace` on a fresh pool of `workers`.
pub async fn run_batch(
    workspace: &Arc<Workspace>,
    tasks: Vec<Task>,
    workers: usize,
    logs: &LogHandle,
) -> Vec<TaskResult> {
    WorkerPool::new(workers, logs)
        .run_batch(tasks, Arc::clone(workspace))
        .await
}
