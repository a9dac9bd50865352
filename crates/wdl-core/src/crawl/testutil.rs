//! In-memory fetcher for crawl, pool, and session tests.

use crate::fetch::{FetchError, FetchKind, FetchOptions, Fetched, Fetcher};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Serves canned bodies from memory, writing each one to the destination
/// directory the way the real fetcher writes downloads.
pub(crate) struct StubFetcher {
    pages: HashMap<String, Vec<u8>>,
    redirects: HashMap<String, String>,
    failing: HashSet<String>,
    counter: AtomicUsize,
    /// Every fetch attempt, in order: requested URL and the caller's hint.
    pub(crate) requests: Mutex<Vec<(String, FetchKind)>>,
    /// Every file this stub wrote.
    pub(crate) writes: Mutex<Vec<PathBuf>>,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self {
            pages: HashMap::new(),
            redirects: HashMap::new(),
            failing: HashSet::new(),
            counter: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn page(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    pub(crate) fn redirect(mut self, url: &str, target: &str) -> Self {
        self.redirects.insert(url.to_string(), target.to_string());
        self
    }

    pub(crate) fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Fetcher for StubFetcher {
    fn fetch(
        &self,
        url: &str,
        dest_dir: &Path,
        kind: FetchKind,
        _opts: FetchOptions,
    ) -> Result<Fetched, FetchError> {
        self.requests.lock().unwrap().push((url.to_string(), kind));
        if self.failing.contains(url) {
            return Err(FetchError::Http(404));
        }
        let final_url = self
            .redirects
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_string());
        let body = match self.pages.get(&final_url) {
            Some(b) => b.clone(),
            None => return Err(FetchError::Http(404)),
        };
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let path = dest_dir.join(format!("stub-{}.body", n));
        fs::write(&path, body)?;
        self.writes.lock().unwrap().push(path.clone());
        Ok(Fetched {
            path,
            final_url,
        })
    }
}
