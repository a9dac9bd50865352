//! Path segment and extension extraction.

/// Returns the last segment of a URL path, or `None` when the path addresses
/// a directory (trailing `/`) or is empty.
///
/// Unlike a plain basename this keeps the distinction between
/// `/a/b/file.txt` (segment `file.txt`) and `/a/b/` (no segment): the
/// latter is a page and gets a synthetic filename downstream.
pub fn last_path_segment(path: &str) -> Option<&str> {
    let segment = path.rsplit('/').next().unwrap_or(path);
    if segment.is_empty() || segment == "." || segment == ".." {
        None
    } else {
        Some(segment)
    }
}

/// Extracts the file extension of a URL path, lowercased and including the
/// leading dot (`"/a/report.PDF"` → `".pdf"`).
///
/// A dot that starts the segment does not count (`"/.bashrc"` → `None`),
/// and only the final suffix is taken (`"/a.tar.gz"` → `".gz"`).
pub fn extension_of_path(path: &str) -> Option<String> {
    let segment = path.rsplit('/').next().unwrap_or(path);
    let dot = segment.rfind('.')?;
    if dot == 0 {
        return None;
    }
    Some(segment[dot..].to_ascii_lowercase())
}
