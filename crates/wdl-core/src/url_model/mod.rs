//! URL classification and local path derivation.
//!
//! Splits URLs into their logical form (query stripped), decides whether a
//! path names a page or a terminal file, and maps URLs onto safe local
//! paths for the mirrored download layout.

mod path;
mod sanitize;

pub use path::{extension_of_path, last_path_segment};
pub use sanitize::sanitize_component;

use std::path::{Path, PathBuf};

/// Filename used when a URL path ends in `/` (or yields nothing usable):
/// such URLs address pages, and saved pages read naturally as `index.html`.
const DEFAULT_FILENAME: &str = "index.html";

/// Extensions that mark a URL as hypertext (more to crawl) rather than a
/// terminal file. Compared lowercased, with the leading dot.
pub const DEFAULT_PAGE_EXTENSIONS: &[&str] = &[
    ".html", ".htm", ".xhtml", ".shtml", ".dhtml", ".php", ".asp", ".aspx", ".jsp", ".jspx",
    ".cgi",
];

/// Matches an email address anywhere in a string; used to throw away
/// `mailto:` style anchors before they reach the crawl queue.
pub const EMAIL_PATTERN: &str = r"([a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]{2,4})";

/// Returns the logical form of a URL: everything before the first `?`.
///
/// Two URLs differing only in query parameters address the same resource
/// for dedup purposes, so visited-set membership is keyed on this.
pub fn logical_form(url: &str) -> &str {
    match url.split_once('?') {
        Some((before, _)) => before,
        None => url,
    }
}

/// Extension of the URL's path component, lowercased (`Some(".pdf")`), or
/// `None` when the URL does not parse or its path has no extension.
///
/// The query never contributes: `"/get.php?file=a.zip"` is `.php`.
pub fn path_extension(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    extension_of_path(parsed.path())
}

/// Derives a safe filename for saving the body of `url`.
///
/// Uses the last path segment, sanitized for Linux. Directory-style URLs
/// (trailing `/`) and unusable segments fall back to `index.html`.
pub fn derive_filename(url: &str) -> String {
    let candidate = url::Url::parse(url)
        .ok()
        .and_then(|u| last_path_segment(u.path()).map(str::to_string));

    let raw = match candidate {
        Some(c) => c,
        None => return DEFAULT_FILENAME.to_string(),
    };

    let sanitized = sanitize_component(&raw);
    if sanitized.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

/// Directory a download of `url` belongs in, under `root`.
///
/// Flat mode puts everything directly in `root`. Otherwise the layout
/// mirrors the URL: `root/<host>/<path dirs...>`, each component
/// sanitized so hostile segments cannot climb out of `root`.
pub fn dest_dir_for(url: &str, root: &Path, flat: bool) -> PathBuf {
    if flat {
        return root.to_path_buf();
    }
    let parsed = match url::Url::parse(url) {
        Ok(u) => u,
        Err(_) => return root.to_path_buf(),
    };

    let mut dir = root.to_path_buf();
    if let Some(host) = parsed.host_str() {
        let clean = sanitize_component(host);
        if !clean.is_empty() {
            dir.push(clean);
        }
    }

    let mut segments: Vec<&str> = parsed.path().split('/').collect();
    // Last slot is the filename position (empty for directory URLs).
    segments.pop();
    for segment in segments {
        let clean = sanitize_component(segment);
        if !clean.is_empty() {
            dir.push(clean);
        }
    }
    dir
}
