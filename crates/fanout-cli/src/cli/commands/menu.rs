//! Interactive menu: read a choice, collect arguments, run the batch, print results.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use super::report::parse_rows;
use crate::cli::session::{print_results, split_args, Session};

pub const MENU: &str = "\
===== fanout Menu =====
1. Download Files from URLs
2. Process JSON Data
3. Generate CSV Reports
4. Exit
=======================";

/// Runs the menu until the operator picks Exit or input ends.
pub async fn run_menu<R: BufRead, W: Write>(
    session: &Session<'_>,
    mut input: R,
    mut out: W,
) -> Result<()> {
    loop {
        writeln!(out, "\n{MENU}")?;
        let Some(choice) = prompt(&mut input, &mut out, "Enter your choice (1-4): ")? else {
            writeln!(out, "\nExiting the application. Goodbye!")?;
            break;
        };

        match choice.trim() {
            "1" => {
                let Some(line) =
                    prompt(&mut input, &mut out, "Enter URLs to download (comma-separated): ")?
                else {
                    break;
                };
                let results = session.download(split_args(&line)).await;
                print_results(&mut out, "Download Results:", &results)?;
            }
            "2" => {
                let Some(line) = prompt(
                    &mut input,
                    &mut out,
                    "Enter JSON file names to process (comma-separated): ",
                )?
                else {
                    break;
                };
                let results = session.filter(split_args(&line)).await;
                print_results(&mut out, "Data Processing Results:", &results)?;
            }
            "3" => {
                writeln!(
                    out,
                    "Enter structured data for the report (e.g., [{{\"ID\": 1, \"Name\": \"Task1\", \"Status\": \"Done\"}}]):"
                )?;
                let Some(line) = prompt(&mut input, &mut out, "")? else {
                    break;
                };
                match parse_rows(&line) {
                    Ok(rows) => {
                        let results = session.report(rows).await;
                        print_results(&mut out, "Report Generation Results:", &results)?;
                    }
                    Err(e) => {
                        tracing::debug!("rejected report input: {:#}", e);
                        writeln!(out, "Invalid input. Please provide valid JSON data.")?;
                    }
                }
            }
            "4" => {
                writeln!(out, "Exiting the application. Goodbye!")?;
                break;
            }
            other => {
                tracing::debug!("invalid menu choice {:?}", other);
                writeln!(out, "Invalid choice. Please enter a valid option.")?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// Prints `label` and reads one line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    let n = input.read_line(&mut line).context("read from stdin")?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
