//! `fanout filter <FILE>...` – filter JSON record files in parallel.

use anyhow::Result;

use crate::cli::session::{print_results, Session};

pub async fn run_filter(session: &Session<'_>, files: Vec<String>) -> Result<()> {
    let results = session.filter(files).await;
    print_results(&mut std::io::stdout().lock(), "Data Processing Results:", &results)?;
    Ok(())
}
