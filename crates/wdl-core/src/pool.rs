//! Concurrent batch download of discovered file URLs.
//!
//! Consumes the file URLs a crawl produced, dedups them by logical form,
//! and drains the batch with N worker threads pulling from a shared queue.
//! Individual failures are collected, not fatal.

use crate::fetch::{FetchError, FetchKind, FetchOptions, Fetcher};
use crate::retry::{run_with_retry, RetryPolicy};
use crate::url_model;
use anyhow::{Context, Result};
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};

/// Knobs for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Worker threads draining the queue.
    pub workers: usize,
    /// Save by basename only instead of mirroring URL paths.
    pub flat: bool,
    /// Reuse files that already exist locally.
    pub skip_exist: bool,
    /// Skip the politeness delay between requests.
    pub skip_throttle: bool,
    /// Retry transient failures per this policy; single attempt if `None`.
    pub retry: Option<RetryPolicy>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: 4,
            flat: false,
            skip_exist: false,
            skip_throttle: false,
            retry: None,
        }
    }
}

/// What a batch run accomplished.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Local paths of every file that downloaded (or was reused).
    pub downloaded: Vec<PathBuf>,
    /// URLs that failed after any retries.
    pub failed: Vec<String>,
}

fn fetch_one<F: Fetcher>(
    fetcher: &F,
    url: &str,
    dest_root: &Path,
    opts: &BatchOptions,
) -> Result<PathBuf, FetchError> {
    let dest_dir = url_model::dest_dir_for(url, dest_root, opts.flat);
    fs::create_dir_all(&dest_dir)?;
    let fetch_opts = FetchOptions {
        skip_exist: opts.skip_exist,
        skip_throttle: opts.skip_throttle,
    };
    let fetched = match &opts.retry {
        Some(policy) => run_with_retry(policy, || {
            fetcher.fetch(url, &dest_dir, FetchKind::File, fetch_opts)
        })?,
        None => fetcher.fetch(url, &dest_dir, FetchKind::File, fetch_opts)?,
    };
    Ok(fetched.path)
}

/// Downloads every URL in `file_urls` under `dest_root`.
///
/// URLs sharing a logical form are downloaded once (first occurrence wins).
/// Per-URL failures land in the report; only local setup problems (the
/// destination root not being creatable) abort the whole batch.
pub fn download_batch<F: Fetcher + Sync>(
    fetcher: &F,
    file_urls: &[String],
    dest_root: &Path,
    opts: &BatchOptions,
) -> Result<BatchReport> {
    let mut seen: HashSet<String> = HashSet::new();
    let unique: Vec<String> = file_urls
        .iter()
        .filter(|u| seen.insert(url_model::logical_form(u).to_string()))
        .cloned()
        .collect();
    let duplicates = file_urls.len() - unique.len();
    if duplicates > 0 {
        tracing::debug!("{} duplicate file urls dropped from the batch", duplicates);
    }

    let mut report = BatchReport::default();
    if unique.is_empty() {
        return Ok(report);
    }
    fs::create_dir_all(dest_root)
        .with_context(|| format!("creating download root {}", dest_root.display()))?;

    let count = unique.len();
    let num_workers = opts.workers.max(1).min(count);
    let work: Mutex<VecDeque<String>> = Mutex::new(unique.into_iter().collect());
    let (tx, rx) = mpsc::channel();

    std::thread::scope(|s| {
        for _ in 0..num_workers {
            let tx = tx.clone();
            let work = &work;
            s.spawn(move || loop {
                let url = match work.lock().unwrap().pop_front() {
                    Some(u) => u,
                    None => break,
                };
                let res = fetch_one(fetcher, &url, dest_root, opts);
                let _ = tx.send((url, res));
            });
        }
    });
    drop(tx);

    for _ in 0..count {
        let (url, res) = rx.recv().expect("worker result");
        match res {
            Ok(path) => {
                tracing::debug!("downloaded {} to {}", url, path.display());
                report.downloaded.push(path);
            }
            Err(e) => {
                tracing::warn!("download of {} failed: {}", url, e);
                report.failed.push(url);
            }
        }
    }
    Ok(report)
}
