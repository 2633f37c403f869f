//! Artifact naming from download URLs.
//!
//! The last non-empty path segment of the URL becomes the file name;
//! if there is none, a randomized `file_<n>.txt` is used instead.

use rand::Rng;

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Extracts the last path segment of `url` as a file name hint.
///
/// Query string and fragment are ignored. Returns `None` if the URL cannot be
/// parsed or its path is empty or root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().rsplit('/').next()?;
    let name = sanitize_filename(segment);
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name)
}

/// Output name for a downloaded URL: path segment, or `file_<1..=1000>.txt`.
pub fn download_name(url: &str) -> String {
    filename_from_url_path(url).unwrap_or_else(random_name)
}

fn random_name() -> String {
    let n: u32 = rand::rng().random_range(1..=1000);
    format!("file_{n}.txt")
}

/// Replaces separators, NUL and control characters with `_` and trims
/// leading/trailing dots and whitespace, capped at NAME_MAX bytes.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim_matches(|c: char| c == '.' || c.is_whitespace());

    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}
