//! HTTP fetch: one URL downloaded to one local file.
//!
//! The [`Fetcher`] trait is the seam between the crawl logic and the
//! network. The crawler and the batch pool both speak it; tests substitute
//! an in-memory implementation.

mod http;

pub use http::HttpFetcher;

use std::path::{Path, PathBuf};

/// Caller's belief about what a URL addresses. Purely advisory: it picks
/// log wording and request headers, never changes what is downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// A page to crawl.
    Link,
    /// A terminal file.
    File,
    /// No claim either way.
    Unknown,
}

impl FetchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchKind::Link => "link",
            FetchKind::File => "file",
            FetchKind::Unknown => "unknown",
        }
    }
}

/// Per-request switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Reuse an existing output file instead of re-downloading it.
    pub skip_exist: bool,
    /// Skip the politeness delay before the request.
    pub skip_throttle: bool,
}

/// A completed fetch: where the body landed and where the server says the
/// resource really lives (after redirects).
#[derive(Debug, Clone)]
pub struct Fetched {
    pub path: PathBuf,
    pub final_url: String,
}

/// Error from a single fetch, shaped for retry classification.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// URL did not parse or was rejected by the client.
    #[error("bad URL: {0}")]
    BadUrl(String),
    /// Transport-level failure (timeout, connection, DNS).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Local filesystem failure. Not retried.
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads one URL into `dest_dir` and reports where it landed.
pub trait Fetcher {
    fn fetch(
        &self,
        url: &str,
        dest_dir: &Path,
        kind: FetchKind,
        opts: FetchOptions,
    ) -> Result<Fetched, FetchError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(
        &self,
        url: &str,
        dest_dir: &Path,
        kind: FetchKind,
        opts: FetchOptions,
    ) -> Result<Fetched, FetchError> {
        (**self).fetch(url, dest_dir, kind, opts)
    }
}
