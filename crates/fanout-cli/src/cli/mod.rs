//! CLI for fanout: batch subcommands plus the interactive menu.

mod commands;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fanout_core::config::{self, FanoutConfig};
use fanout_core::LogHandle;
use std::path::PathBuf;

use commands::{run_download, run_filter, run_menu, run_report};
use session::Session;

/// Top-level CLI for fanout.
#[derive(Debug, Parser)]
#[command(name = "fanout")]
#[command(about = "fanout: parallel downloads, JSON record filtering and CSV reports", long_about = None)]
pub struct Cli {
    /// Directory all artifacts are written to (default from config: "output").
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Worker pool size for download and filter batches.
    #[arg(long, global = true, value_name = "N")]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

impl Cli {
    /// Global flags take precedence over the config file.
    pub fn apply_overrides(&self, cfg: &mut FanoutConfig) {
        if let Some(dir) = &self.output_dir {
            cfg.output_dir = dir.clone();
        }
        if let Some(n) = self.workers {
            cfg.download_workers = n;
            cfg.filter_workers = n;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download one or more URLs in parallel.
    Download {
        /// HTTP/HTTPS URLs to fetch.
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Keep only matching records of JSON files in the output directory.
    Filter {
        /// JSON file names, relative to the output directory.
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Write a CSV report from a JSON array of rows.
    Report {
        /// Rows, e.g. '[{"ID": 1, "Name": "Task1", "Status": "Done"}]'.
        json: String,
    },

    /// Interactive menu (default when no subcommand is given).
    Menu,
}

impl CliCommand {
    pub async fn run_from_args(logs: &LogHandle) -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        cli.apply_overrides(&mut cfg);
        tracing::debug!("loaded config: {:?}", cfg);

        let session = Session::open(cfg, logs)?;
        match cli.command.unwrap_or(CliCommand::Menu) {
            CliCommand::Download { urls } => run_download(&session, urls).await?,
            CliCommand::Filter { files } => run_filter(&session, files).await?,
            CliCommand::Report { json } => run_report(&session, &json).await?,
            CliCommand::Menu => {
                let stdin = std::io::stdin();
                let stdout = std::io::stdout();
                run_menu(&session, stdin.lock(), stdout.lock()).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
