//! `fanout download <URL>...` – fetch URLs in parallel.

use anyhow::Result;

use crate::cli::session::{print_results, Session};

pub async fn run_download(session: &Session<'_>, urls: Vec<String>) -> Result<()> {
    let results = session.download(urls).await;
    print_results(&mut std::io::stdout().lock(), "Download Results:", &results)?;
    Ok(())
}
