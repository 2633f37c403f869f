//! Artifact writes into the output directory.
//!
//! Whole-body artifacts go to a uniquely named temp file next to the final
//! path and are renamed into place, so a failed write never leaves a file
//! under the final name. Two writers of the same name each get their own
//! temp file; the last rename wins.

use crate::error::TaskError;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Temporary file suffix used before rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Creates an empty temp file for `final_path` in its directory
/// (e.g. `a.json` → `.a.json.XXXXXX.part`).
fn temp_file_for(final_path: &Path) -> std::io::Result<NamedTempFile> {
    let dir = match final_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let prefix = match final_path.file_name() {
        Some(name) => format!(".{}.", name.to_string_lossy()),
        None => ".".to_string(),
    };
    tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)
}

/// Writes `bytes` to `final_path` via a private temp file, replacing any
/// existing file. The temp file is removed if any step fails.
pub fn persist(final_path: &Path, bytes: &[u8]) -> Result<(), TaskError> {
    let io_err = |source: std::io::Error| TaskError::Io {
        path: final_path.to_path_buf(),
        source,
    };
    let mut tmp = temp_file_for(final_path).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(final_path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Creates `dir` (and parents) if missing. Returns true if it was created.
pub fn ensure_dir(dir: &Path) -> std::io::Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn leftover_temps(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(TEMP_SUFFIX))
            .count()
    }

    #[test]
    fn temp_file_sits_next_to_final_path() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("processed_a.json");
        let a = temp_file_for(&final_path).unwrap();
        let b = temp_file_for(&final_path).unwrap();
        assert_eq!(a.path().parent(), Some(dir.path()));
        assert_ne!(a.path(), b.path());
        let name = a.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".processed_a.json."));
        assert!(name.ends_with(".part"));
    }

    #[test]
    fn persist_writes_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        persist(&path, b"first").unwrap();
        persist(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert_eq!(leftover_temps(dir.path()), 0);
    }

    #[test]
    fn concurrent_writers_of_one_name_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let path = Arc::new(dir.path().join("data.json"));
        let body = vec![b'x'; 256 * 1024];

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let path = Arc::clone(&path);
                let body = body.clone();
                thread::spawn(move || {
                    (0..10)
                        .map(|_| persist(&path, &body))
                        .collect::<Result<Vec<_>, _>>()
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap().unwrap();
        }
        assert_eq!(fs::read(path.as_ref()).unwrap(), body);
        assert_eq!(leftover_temps(dir.path()), 0);
    }

    #[test]
    fn persist_into_missing_dir_fails_without_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.bin");
        let err = persist(&path, b"x").unwrap_err();
        assert!(matches!(err, TaskError::Io { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn ensure_dir_reports_creation() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        assert!(ensure_dir(&out).unwrap());
        assert!(!ensure_dir(&out).unwrap());
        assert!(out.is_dir());
    }
}
