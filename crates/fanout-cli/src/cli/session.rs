//! Per-invocation state shared by the commands.

use anyhow::Result;
use fanout_core::config::FanoutConfig;
use fanout_core::workspace::{self, Workspace};
use fanout_core::{LogHandle, Record, Task, TaskKind, TaskResult};
use std::io::Write;
use std::sync::Arc;

pub struct Session<'a> {
    cfg: FanoutConfig,
    workspace: Arc<Workspace>,
    logs: &'a LogHandle,
}

impl<'a> Session<'a> {
    /// Creates the output directory if needed.
    pub fn open(cfg: FanoutConfig, logs: &'a LogHandle) -> Result<Self> {
        let workspace = Arc::new(Workspace::open(&cfg.output_dir, &cfg)?);
        Ok(Self {
            cfg,
            workspace,
            logs,
        })
    }

    pub async fn download(&self, urls: Vec<String>) -> Vec<TaskResult> {
        self.run(TaskKind::Download, urls.into_iter().map(Task::download).collect())
            .await
    }

    pub async fn filter(&self, files: Vec<String>) -> Vec<TaskResult> {
        self.run(TaskKind::FilterRecords, files.into_iter().map(Task::filter).collect())
            .await
    }

    /// One report task on a single worker, whatever the configured pool sizes.
    pub async fn report(&self, rows: Vec<Record>) -> Vec<TaskResult> {
        self.run(TaskKind::WriteReport, vec![Task::report(rows)]).await
    }

    async fn run(&self, kind: TaskKind, tasks: Vec<Task>) -> Vec<TaskResult> {
        let workers = self.cfg.workers_for(kind);
        tracing::info!("running {} {:?} task(s) on {} worker(s)", tasks.len(), kind, workers);
        workspace::run_batch(&self.workspace, tasks, workers, self.logs).await
    }
}

/// Prints a heading then one line per result, in submission order.
pub fn print_results<W: Write>(
    out: &mut W,
    heading: &str,
    results: &[TaskResult],
) -> std::io::Result<()> {
    writeln!(out, "\n{heading}")?;
    for r in results {
        writeln!(out, "{r}")?;
    }
    Ok(())
}

/// Splits comma-separated input, trimming entries and dropping blanks.
pub fn split_args(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
