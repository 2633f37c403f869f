use fanout_core::LogHandle;
use tracing::instrument::WithSubscriber;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    let logs = LogHandle::init().unwrap_or_else(|err| {
        eprintln!("fanout: file logging unavailable ({:#}), logging to stderr", err);
        LogHandle::stderr_only()
    });

    // Parse CLI and dispatch.
    let outcome = CliCommand::run_from_args(&logs)
        .with_subscriber(logs.dispatch().clone())
        .await;

    if let Err(err) = logs.close() {
        eprintln!("fanout: failed to flush log file: {}", err);
    }
    if let Err(err) = outcome {
        eprintln!("fanout error: {:#}", err);
        std::process::exit(1);
    }
}
