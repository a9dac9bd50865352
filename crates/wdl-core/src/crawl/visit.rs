//! Single-page visit: fetch, parse anchors, partition into files and links.

use crate::fetch::{FetchKind, FetchOptions, Fetcher};
use crate::url_model;
use anyhow::{Context, Result};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Classification rules a visitor applies to every anchor.
#[derive(Debug, Clone)]
pub struct PageRules {
    page_extensions: HashSet<String>,
    email: Regex,
}

impl Default for PageRules {
    fn default() -> Self {
        Self::new(url_model::DEFAULT_PAGE_EXTENSIONS.iter().map(|e| e.to_string()))
    }
}

impl PageRules {
    /// Builds rules with a custom page-extension set (leading dot, any case).
    pub fn new(page_extensions: impl IntoIterator<Item = String>) -> Self {
        Self {
            page_extensions: page_extensions
                .into_iter()
                .map(|e| e.to_ascii_lowercase())
                .collect(),
            email: Regex::new(url_model::EMAIL_PATTERN).expect("EMAIL_PATTERN is a valid regex"),
        }
    }

    /// True when `ext` (with leading dot, any case) names hypertext.
    pub fn is_page_extension(&self, ext: &str) -> bool {
        self.page_extensions.contains(&ext.to_ascii_lowercase())
    }

    /// True when the string contains something that reads as an email
    /// address, as `mailto:` anchors do once resolved.
    pub fn looks_like_email(&self, s: &str) -> bool {
        self.email.is_match(s)
    }
}

/// Per-visit switches.
#[derive(Debug, Clone, Copy)]
pub struct VisitOptions {
    /// What the caller believes the URL is; advisory only.
    pub fetch_hint: FetchKind,
    /// Skip the politeness delay before the fetch.
    pub skip_throttle: bool,
    /// Keep anchors pointing one level up instead of discarding them, and
    /// queue the parent directory itself.
    pub bidirectional: bool,
    /// Leave the visited page out of the file collection.
    pub skip_self_page: bool,
}

impl Default for VisitOptions {
    fn default() -> Self {
        Self {
            fetch_hint: FetchKind::Unknown,
            skip_throttle: false,
            bidirectional: false,
            skip_self_page: false,
        }
    }
}

/// Removes the fetched page copy when the visit ends, on every path.
struct ScratchPage(PathBuf);

impl Drop for ScratchPage {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

/// Fetches one page and partitions its anchors into downloadable file URLs
/// and further crawlable link URLs.
///
/// A visit never fails: any fetch or parse problem is logged and yields
/// empty collections, so one dead page cannot abort a whole walk.
pub struct PageVisitor<F: Fetcher> {
    fetcher: F,
    rules: PageRules,
    anchors: Selector,
    scratch: TempDir,
}

impl<F: Fetcher> PageVisitor<F> {
    pub fn new(fetcher: F, rules: PageRules) -> Result<Self> {
        Ok(Self {
            fetcher,
            rules,
            anchors: Selector::parse("a[href]").expect("static selector parses"),
            scratch: TempDir::new().context("creating scratch dir for fetched pages")?,
        })
    }

    pub fn rules(&self) -> &PageRules {
        &self.rules
    }

    /// Visits `url` and returns `(file_urls, link_urls)`.
    ///
    /// Files are collected unconditionally; candidate links are kept only
    /// when they make progress (not the page itself, not its directory),
    /// point downward (unless `bidirectional`), and stay near the host.
    /// With `bidirectional` the one-level-up URL is appended exactly once
    /// after the anchors.
    pub fn visit(&self, url: &str, opts: VisitOptions) -> (Vec<String>, Vec<String>) {
        let mut file_urls: Vec<String> = Vec::new();
        let mut link_urls: Vec<String> = Vec::new();

        // Plain substring containment on purpose: it keeps sibling hosts
        // like cdn.example.com reachable, at the price of also matching the
        // host name anywhere in the URL, path included.
        let hostname = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_owned))
            .unwrap_or_default();

        let fetched = match self.fetcher.fetch(
            url,
            self.scratch.path(),
            opts.fetch_hint,
            FetchOptions {
                skip_exist: false,
                skip_throttle: opts.skip_throttle,
            },
        ) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("fetch of {} failed: {}, nothing to visit", url, e);
                return (file_urls, link_urls);
            }
        };
        let page = ScratchPage(fetched.path.clone());

        let bytes = match fs::read(&page.0) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("could not read fetched copy of {}: {}", url, e);
                return (file_urls, link_urls);
            }
        };
        let html = match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(_) => {
                tracing::warn!("{} looks like a binary file, not descending", url);
                return (file_urls, link_urls);
            }
        };

        if fetched.final_url != url {
            tracing::debug!("{} redirected to {}", url, fetched.final_url);
        }
        // Anchors resolve against the final URL so relatives stay correct
        // after redirects.
        let base = match url::Url::parse(&fetched.final_url) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("final URL {} does not parse: {}", fetched.final_url, e);
                return (file_urls, link_urls);
            }
        };
        let (same_place, one_up) = match (base.join("."), base.join("..")) {
            (Ok(same), Ok(up)) => (same.to_string(), up.to_string()),
            _ => {
                tracing::warn!("cannot resolve relative anchors against {}", base);
                return (file_urls, link_urls);
            }
        };
        let self_logical = url_model::logical_form(&fetched.final_url).to_string();

        if !opts.skip_self_page {
            file_urls.push(fetched.final_url.clone());
        }

        let dom = Html::parse_document(&html);
        for anchor in dom.select(&self.anchors) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if href.is_empty() {
                continue;
            }
            let Ok(joined) = base.join(href) else {
                tracing::debug!("unresolvable href {:?} on {}", href, fetched.final_url);
                continue;
            };
            let resolved = joined.to_string();
            let logical = url_model::logical_form(&resolved);

            if self.rules.looks_like_email(logical) {
                // mailto: and friends
                continue;
            }

            match url_model::extension_of_path(joined.path()) {
                Some(ext) if !self.rules.is_page_extension(&ext) => {
                    // Terminal file: no self, direction, or host filtering.
                    file_urls.push(resolved);
                }
                _ => {
                    if logical == same_place || logical == self_logical {
                        continue;
                    }
                    if !opts.bidirectional && logical == one_up {
                        continue;
                    }
                    if resolved.contains(&hostname) {
                        link_urls.push(resolved);
                    }
                }
            }
        }

        if opts.bidirectional {
            link_urls.push(one_up);
        }

        tracing::debug!(
            "visit of {} found {} file urls and {} link urls",
            fetched.final_url,
            file_urls.len(),
            link_urls.len()
        );
        (file_urls, link_urls)
    }
}
