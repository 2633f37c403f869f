//! CSV report generation.
//!
//! Each report gets a fresh time-derived name (`report_<unix secs>.csv`,
//! suffixed `_<n>` when taken). The file is opened with `create_new`, so an
//! existing report is never overwritten.

use crate::error::TaskError;
use crate::record::{Record, Scalar};
use crate::task::Artifact;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Upper bound on `_<n>` suffixes tried within one second.
const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Writes rows under a fixed column layout into `dir`.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
    columns: Vec<String>,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>, columns: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            columns,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Writes a header row then one row per record, in input order. Cells for
    /// absent columns are empty. Rows with unknown fields are rejected before
    /// any file is created; an I/O error mid-way leaves the partial file.
    pub fn write_report(&self, rows: &[Record]) -> Result<Artifact, TaskError> {
        self.validate(rows)?;

        let (name, path, file) = create_unique(&self.dir, unix_secs())?;
        tracing::debug!(rows = rows.len(), "writing report {}", path.display());

        let io_err = |e: csv::Error| TaskError::Io {
            path: path.clone(),
            source: io::Error::from(e),
        };
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(&self.columns).map_err(io_err)?;
        for row in rows {
            let cells = self
                .columns
                .iter()
                .map(|c| row.get(c).map(Scalar::to_cell).unwrap_or_default());
            writer.write_record(cells).map_err(io_err)?;
        }
        writer.flush().map_err(|e| TaskError::Io {
            path: path.clone(),
            source: e,
        })?;

        Ok(Artifact { name, path })
    }

    fn validate(&self, rows: &[Record]) -> Result<(), TaskError> {
        if self.columns.is_empty() {
            return Err(TaskError::Validation(
                "report needs at least one column".to_string(),
            ));
        }
        for (i, row) in rows.iter().enumerate() {
            if let Some(extra) = row.fields().find(|f| !self.columns.iter().any(|c| c == f)) {
                return Err(TaskError::Validation(format!(
                    "row {i} contains field {extra:?} not in columns {:?}",
                    self.columns
                )));
            }
        }
        Ok(())
    }
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Exclusively creates `report_<secs>.csv`, or the first free `report_<secs>_<n>.csv`.
fn create_unique(dir: &Path, secs: u64) -> Result<(String, PathBuf, File), TaskError> {
    for n in 0..MAX_NAME_ATTEMPTS {
        let name = if n == 0 {
            format!("report_{secs}.csv")
        } else {
            format!("report_{secs}_{n}.csv")
        };
        let path = dir.join(&name);
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => return Ok((name, path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(TaskError::io(&path, e)),
        }
    }
    Err(TaskError::Validation(format!(
        "no free report name for timestamp {secs} in {}",
        dir.display()
    )))
}
