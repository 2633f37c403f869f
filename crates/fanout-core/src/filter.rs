//! JSON record filtering on a single field-equality predicate.
//!
//! The input is read fully into memory, filtered, and the retained records are
//! written as `processed_<name>` next to it in the output directory.

use crate::config::FilterConfig;
use crate::error::TaskError;
use crate::record::{parse_records, Record, Scalar};
use crate::storage;
use crate::task::Artifact;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of every filtered output file.
pub const OUTPUT_PREFIX: &str = "processed_";

/// `field == value`. A record without `field` never matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub value: Scalar,
}

impl Predicate {
    pub fn new(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.get(&self.field) == Some(&self.value)
    }
}

impl From<&FilterConfig> for Predicate {
    fn from(cfg: &FilterConfig) -> Self {
        Predicate::new(cfg.field.clone(), cfg.value.clone())
    }
}

/// Keeps the records matching `predicate`, in input order.
pub fn retain_matching(records: Vec<Record>, predicate: &Predicate) -> Vec<Record> {
    records.into_iter().filter(|r| predicate.matches(r)).collect()
}

/// Output name for an input id: `processed_` + its final path component.
pub fn output_name(input: &str) -> Result<String, TaskError> {
    Path::new(input)
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| format!("{OUTPUT_PREFIX}{n}"))
        .ok_or_else(|| TaskError::Validation(format!("not a file name: {input:?}")))
}

/// Filters JSON record files found in `dir`, writing results into `dir`.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    dir: PathBuf,
    predicate: Predicate,
}

impl RecordFilter {
    pub fn new(dir: impl Into<PathBuf>, predicate: Predicate) -> Self {
        Self {
            dir: dir.into(),
            predicate,
        }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn filter(&self, input: &str) -> Result<Artifact, TaskError> {
        let name = output_name(input)?;
        let in_path = self.dir.join(input);
        if in_path.is_dir() {
            return Err(TaskError::Validation(format!(
                "{} is a directory, expected a JSON file",
                in_path.display()
            )));
        }

        let text = fs::read_to_string(&in_path).map_err(|e| TaskError::io(&in_path, e))?;
        let records = parse_records(&text).map_err(|source| TaskError::Parse {
            path: in_path.clone(),
            source,
        })?;
        let total = records.len();
        let kept = retain_matching(records, &self.predicate);
        tracing::debug!(
            input,
            total,
            kept = kept.len(),
            "filtered on {} == {}",
            self.predicate.field,
            self.predicate.value
        );

        let out_path = self.dir.join(&name);
        let bytes = to_pretty_json(&kept).map_err(|source| TaskError::Parse {
            path: out_path.clone(),
            source,
        })?;
        storage::persist(&out_path, &bytes)?;
        Ok(Artifact {
            name,
            path: out_path,
        })
    }
}

/// Serializes with 4-space indentation.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}
