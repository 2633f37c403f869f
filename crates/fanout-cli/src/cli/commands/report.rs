//! `fanout report <JSON>` – write one CSV report from JSON rows.

use anyhow::{Context, Result};
use fanout_core::record::{parse_records, Record};

use crate::cli::session::{print_results, Session};

/// Parses report rows: a JSON array of flat objects.
pub fn parse_rows(json: &str) -> Result<Vec<Record>> {
    parse_records(json.trim()).context("report data must be a JSON array of flat objects")
}

pub async fn run_report(session: &Session<'_>, json: &str) -> Result<()> {
    let rows = parse_rows(json)?;
    let results = session.report(rows).await;
    print_results(&mut std::io::stdout().lock(), "Report Generation Results:", &results)?;
    Ok(())
}
