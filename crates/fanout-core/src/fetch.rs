//! Single HTTP GET with a timeout, body persisted into the output directory.
//!
//! Uses the curl crate (libcurl) with redirects followed. No retries: a
//! failure is returned as a value and the caller decides whether to resubmit.

use crate::error::TaskError;
use crate::naming;
use crate::storage;
use crate::task::Artifact;
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for one GET.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_REDIRECTS: u32 = 10;
const MIN_TIMEOUT: Duration = Duration::from_millis(1);

/// Downloads URLs into `out_dir`.
#[derive(Debug, Clone)]
pub struct Fetcher {
    out_dir: PathBuf,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(out_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            out_dir: out_dir.into(),
            timeout,
        }
    }

    /// GETs `url` and writes the body to the name derived from its last path
    /// segment, replacing any existing file. Creates nothing on failure.
    pub fn fetch(&self, url: &str) -> Result<Artifact, TaskError> {
        let body = get(url, self.timeout)?;
        let name = naming::download_name(url);
        let path = self.out_dir.join(&name);
        storage::persist(&path, &body)?;
        tracing::debug!(url, bytes = body.len(), "saved {}", path.display());
        Ok(Artifact { name, path })
    }
}

/// Performs a GET and returns the full body. Non-2xx statuses are errors.
/// Blocks the current thread; call from a pool worker.
pub fn get(url: &str, timeout: Duration) -> Result<Vec<u8>, TaskError> {
    // libcurl treats a zero (or sub-millisecond) timeout as none at all.
    let timeout = timeout.max(MIN_TIMEOUT);
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    let curl_err = |e: curl::Error| curl_failure(url, timeout, &e);
    easy.url(url).map_err(curl_err)?;
    easy.get(true).map_err(curl_err)?;
    easy.follow_location(true).map_err(curl_err)?;
    easy.max_redirections(MAX_REDIRECTS).map_err(curl_err)?;
    easy.connect_timeout(timeout).map_err(curl_err)?;
    easy.timeout(timeout).map_err(curl_err)?;

    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(curl_err)?;
        transfer.perform().map_err(curl_err)?;
    }

    let code = easy.response_code().map_err(curl_err)?;
    if !(200..300).contains(&code) {
        return Err(TaskError::network(url, format!("HTTP {code}")));
    }
    Ok(body)
}

fn curl_failure(url: &str, timeout: Duration, e: &curl::Error) -> TaskError {
    if e.is_operation_timedout() {
        TaskError::network(url, format!("timed out after {}s", timeout.as_secs()))
    } else {
        TaskError::network(url, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_url_is_network_failure() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Fetcher::new(dir.path(), Duration::from_secs(1));
        let err = fetcher.fetch("not a url").unwrap_err();
        match err {
            TaskError::Network { url, .. } => assert_eq!(url, "not a url"),
            other => panic!("expected network failure, got {other:?}"),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn refused_connection_is_network_failure() {
        // Bind then drop to get a port nobody listens on.
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{port}/file.txt");
        let err = get(&url, Duration::from_secs(2)).unwrap_err();
        assert!(err.to_string().contains(&url));
    }
}
