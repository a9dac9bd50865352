//! One end-to-end run: classify seeds, crawl pages, download the batch.
//!
//! Seeds whose URL path already names a file are downloaded straight into
//! the output root. Page seeds are visited (or walked breadth-first with
//! `recurse`) to collect file URLs, which then go through the batch pool.

use crate::config::WdlConfig;
use crate::crawl::{DomainWalk, PageRules, PageVisitor, VisitOptions};
use crate::fetch::{FetchKind, FetchOptions, Fetcher};
use crate::pool::{self, BatchOptions, BatchReport};
use crate::retry::RetryPolicy;
use crate::url_model;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Everything one invocation needs to know.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub output_dir: PathBuf,
    /// Walk whole hosts breadth-first instead of visiting each seed once.
    pub recurse: bool,
    /// Allow the crawl to climb into parent directories.
    pub bidirectional: bool,
    /// Save by basename only instead of mirroring URL paths.
    pub flat: bool,
    /// Reuse files that already exist locally.
    pub skip_exist: bool,
    /// Skip the politeness delay between requests.
    pub skip_throttle: bool,
    /// Leave visited pages out of the downloads.
    pub skip_page: bool,
    pub workers: usize,
    /// Override of the page-like extension set; built-in set if `None`.
    pub page_extensions: Option<Vec<String>>,
    pub retry: Option<RetryPolicy>,
}

impl SessionOptions {
    /// Baseline options from loaded config; callers flip the per-run flags.
    pub fn new(output_dir: PathBuf, cfg: &WdlConfig) -> Self {
        Self {
            output_dir,
            recurse: false,
            bidirectional: false,
            flat: false,
            skip_exist: false,
            skip_throttle: false,
            skip_page: false,
            workers: cfg.workers,
            page_extensions: cfg.page_extensions.clone(),
            retry: Some(
                cfg.retry
                    .as_ref()
                    .map(RetryPolicy::from_config)
                    .unwrap_or_default(),
            ),
        }
    }
}

/// What a whole session accomplished.
#[derive(Debug, Default)]
pub struct SessionReport {
    /// File URLs the crawl stage produced for the batch.
    pub discovered: usize,
    /// Files on disk at the end (downloads plus reused existing ones).
    pub downloaded: usize,
    /// URLs that failed after any retries.
    pub failed: usize,
}

/// Runs a full session over `seeds`.
///
/// Only local setup problems (output dir not creatable) are errors; dead
/// seeds and failed downloads are logged, counted, and skipped.
pub fn run_session<F: Fetcher + Sync>(
    fetcher: &F,
    seeds: &[String],
    opts: &SessionOptions,
) -> Result<SessionReport> {
    fs::create_dir_all(&opts.output_dir)
        .with_context(|| format!("creating output dir {}", opts.output_dir.display()))?;

    let rules = match &opts.page_extensions {
        Some(exts) => PageRules::new(exts.iter().cloned()),
        None => PageRules::default(),
    };
    let visitor = PageVisitor::new(fetcher, rules)?;

    let mut report = SessionReport::default();
    let mut batch: Vec<String> = Vec::new();

    for (i, seed) in seeds.iter().enumerate() {
        let n = i + 1;
        let direct_file = url_model::path_extension(seed)
            .map(|ext| !visitor.rules().is_page_extension(&ext))
            .unwrap_or(false);

        if direct_file {
            tracing::info!("{:02} / {:02} - {} - file download", n, seeds.len(), seed);
            // Straight to the output root, never throttled.
            match fetcher.fetch(
                seed,
                &opts.output_dir,
                FetchKind::File,
                FetchOptions {
                    skip_exist: opts.skip_exist,
                    skip_throttle: true,
                },
            ) {
                Ok(f) => {
                    tracing::debug!("downloaded {} to {}", seed, f.path.display());
                    report.downloaded += 1;
                }
                Err(e) => {
                    tracing::warn!("download of {} failed: {}", seed, e);
                    report.failed += 1;
                }
            }
            continue;
        }

        let visit_opts = VisitOptions {
            fetch_hint: FetchKind::Link,
            skip_throttle: opts.skip_throttle,
            bidirectional: opts.bidirectional,
            skip_self_page: opts.skip_page,
        };
        if opts.recurse {
            tracing::info!("{:02} / {:02} - {} - domain walk", n, seeds.len(), seed);
            batch.extend(DomainWalk::new(&visitor, seed, visit_opts));
        } else {
            tracing::info!("{:02} / {:02} - {} - url walk", n, seeds.len(), seed);
            let (file_urls, _) = visitor.visit(seed, visit_opts);
            batch.extend(file_urls);
        }
    }

    if !batch.is_empty() {
        tracing::info!(
            "discovered {} urls from the original {}, downloading all...",
            batch.len(),
            seeds.len()
        );
        report.discovered = batch.len();
        let batch_opts = BatchOptions {
            workers: opts.workers,
            flat: opts.flat,
            skip_exist: opts.skip_exist,
            skip_throttle: opts.skip_throttle,
            retry: opts.retry.clone(),
        };
        let BatchReport { downloaded, failed } =
            pool::download_batch(fetcher, &batch, &opts.output_dir, &batch_opts)?;
        tracing::info!(
            "downloaded {} files to \"{}\", {} failures!",
            downloaded.len(),
            opts.output_dir.display(),
            failed.len()
        );
        report.downloaded += downloaded.len();
        report.failed += failed.len();
    }

    tracing::info!("done");
    Ok(report)
}
