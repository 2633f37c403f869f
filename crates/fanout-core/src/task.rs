//! Tasks submitted to the worker pool and the results they produce.

use crate::error::TaskError;
use crate::record::Record;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Download,
    FilterRecords,
    WriteReport,
}

impl TaskKind {
    /// Progressive verb used in worker log lines.
    pub fn verb(self) -> &'static str {
        match self {
            TaskKind::Download => "downloading",
            TaskKind::FilterRecords => "processing",
            TaskKind::WriteReport => "generating report from",
        }
    }
}

/// One unit of work. Batches are homogeneous in kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Fetch `url` into the output directory.
    Download { url: String },
    /// Filter the JSON records in `input` (relative to the output directory).
    FilterRecords { input: String },
    /// Write `rows` as one CSV report.
    WriteReport { rows: Vec<Record> },
}

impl Task {
    pub fn download(url: impl Into<String>) -> Self {
        Task::Download { url: url.into() }
    }

    pub fn filter(input: impl Into<String>) -> Self {
        Task::FilterRecords {
            input: input.into(),
        }
    }

    pub fn report(rows: Vec<Record>) -> Self {
        Task::WriteReport { rows }
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            Task::Download { .. } => TaskKind::Download,
            Task::FilterRecords { .. } => TaskKind::FilterRecords,
            Task::WriteReport { .. } => TaskKind::WriteReport,
        }
    }

    /// Label of the task's argument, carried into its result.
    pub fn source(&self) -> String {
        match self {
            Task::Download { url } => url.clone(),
            Task::FilterRecords { input } => input.clone(),
            Task::WriteReport { rows } => format!("{} row(s)", rows.len()),
        }
    }
}

/// A file produced by a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name inside the output directory.
    pub name: String,
    pub path: PathBuf,
}

/// Outcome of one task, tied to it by kind and source label.
#[derive(Debug)]
pub struct TaskResult {
    pub kind: TaskKind,
    pub source: String,
    pub outcome: Result<Artifact, TaskError>,
}

impl TaskResult {
    pub fn new(task: &Task, outcome: Result<Artifact, TaskError>) -> Self {
        Self {
            kind: task.kind(),
            source: task.source(),
            outcome,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&TaskError> {
        self.outcome.as_ref().err()
    }
}

impl fmt::Display for TaskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.outcome, self.kind) {
            (Ok(a), TaskKind::Download) => write!(f, "Downloaded: {}", a.name),
            (Ok(a), TaskKind::FilterRecords) => write!(f, "Processed Data saved to: {}", a.name),
            (Ok(a), TaskKind::WriteReport) => write!(f, "Report Generated: {}", a.name),
            (Err(e), TaskKind::Download) => write!(f, "Error downloading {}: {}", self.source, e),
            (Err(e), TaskKind::FilterRecords) => {
                write!(f, "Error processing {}: {}", self.source, e)
            }
            (Err(e), TaskKind::WriteReport) => write!(f, "Error generating report: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(name: &str) -> Artifact {
        Artifact {
            name: name.to_string(),
            path: PathBuf::from("output").join(name),
        }
    }

    #[test]
    fn source_labels() {
        assert_eq!(Task::download("http://a/b").source(), "http://a/b");
        assert_eq!(Task::filter("tasks.json").source(), "tasks.json");
        assert_eq!(
            Task::report(vec![Record::new(), Record::new()]).source(),
            "2 row(s)"
        );
    }

    #[test]
    fn success_messages() {
        let r = TaskResult::new(&Task::download("http://a/f.txt"), Ok(artifact("f.txt")));
        assert_eq!(r.to_string(), "Downloaded: f.txt");
        let r = TaskResult::new(&Task::filter("t.json"), Ok(artifact("processed_t.json")));
        assert_eq!(r.to_string(), "Processed Data saved to: processed_t.json");
        let r = TaskResult::new(&Task::report(vec![]), Ok(artifact("report_1.csv")));
        assert_eq!(r.to_string(), "Report Generated: report_1.csv");
    }

    #[test]
    fn failure_messages() {
        let r = TaskResult::new(
            &Task::filter("missing.json"),
            Err(TaskError::NotFound {
                path: PathBuf::from("output/missing.json"),
            }),
        );
        assert!(!r.is_ok());
        assert_eq!(
            r.to_string(),
            "Error processing missing.json: no such file: output/missing.json"
        );

        let r = TaskResult::new(
            &Task::report(vec![]),
            Err(TaskError::Validation("bad row".into())),
        );
        assert_eq!(r.to_string(), "Error generating report: bad row");
    }
}
