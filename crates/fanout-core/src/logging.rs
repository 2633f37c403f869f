//! Logging handle: file under XDG state dir plus stderr, or stderr alone.
//!
//! No global subscriber is installed. The caller owns a [`LogHandle`], attaches
//! its dispatcher to the futures and worker closures it runs, and closes it
//! at process end.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_FILE_FILTER: &str = "debug";

/// Writer that is either a file or stderr (used when file clone fails).
enum FileOrStderr {
    File(fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct FileMakeWriter(fs::File);

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    }
}

/// Owns the process's log dispatcher and, when logging to a file, that file.
pub struct LogHandle {
    dispatch: Dispatch,
    file: Option<(PathBuf, fs::File)>,
}

impl LogHandle {
    /// Log to `~/.local/state/fanout/fanout.log` (debug) and stderr (info).
    pub fn init() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("fanout")?;
        let log_dir = xdg_dirs.get_state_home().join("fanout");
        Self::init_at(&log_dir.join("fanout.log"))
    }

    /// Like [`LogHandle::init`] with an explicit log file path.
    pub fn init_at(log_file_path: &Path) -> Result<Self> {
        if let Some(parent) = log_file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file_path)?;
        let keep = file.try_clone()?;

        let file_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILE_FILTER));
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(FileMakeWriter(file))
            .with_ansi(false)
            .with_filter(file_filter);

        let subscriber = tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer());

        let handle = Self {
            dispatch: Dispatch::new(subscriber),
            file: Some((log_file_path.to_path_buf(), keep)),
        };
        tracing::dispatcher::with_default(&handle.dispatch, || {
            tracing::info!("fanout logging initialized at {}", log_file_path.display());
        });
        Ok(handle)
    }

    /// Stderr only (no file). Use when `init()` fails so the CLI doesn't crash.
    pub fn stderr_only() -> Self {
        let subscriber = tracing_subscriber::registry().with(console_layer());
        Self {
            dispatch: Dispatch::new(subscriber),
            file: None,
        }
    }

    /// Drops every event.
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
            file: None,
        }
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.file.as_ref().map(|(p, _)| p.as_path())
    }

    /// Flushes the log file to disk and releases the handle.
    pub fn close(self) -> io::Result<()> {
        tracing::dispatcher::with_default(&self.dispatch, || {
            tracing::debug!("fanout logging closed");
        });
        match self.file {
            Some((_, f)) => f.sync_all(),
            None => Ok(()),
        }
    }
}

fn console_layer<S>() -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(LevelFilter::INFO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_handle_writes_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("fanout.log");
        let handle = LogHandle::init_at(&path).unwrap();
        assert_eq!(handle.log_path(), Some(path.as_path()));

        tracing::dispatcher::with_default(handle.dispatch(), || {
            tracing::info!("worker-1 started downloading http://example.com/a");
        });
        handle.close().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("fanout logging initialized"));
        assert!(text.contains("worker-1 started downloading"));
    }

    #[test]
    fn stderr_and_disabled_have_no_file() {
        assert!(LogHandle::stderr_only().log_path().is_none());
        let h = LogHandle::disabled();
        assert!(h.log_path().is_none());
        h.close().unwrap();
    }
}
