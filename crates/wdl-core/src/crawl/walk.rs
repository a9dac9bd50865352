//! Breadth-first walk across a host, yielding file URLs lazily.

use super::visit::{PageVisitor, VisitOptions};
use crate::fetch::{FetchKind, Fetcher};
use crate::url_model;
use std::collections::{HashSet, VecDeque};

/// Lazy breadth-first traversal from one seed URL.
///
/// Pages and files are each deduplicated by logical form (query stripped),
/// independently: a page visited once is never refetched, a file URL is
/// yielded at most once. Pulling the next item drives just enough visiting
/// to produce it; dropping the iterator abandons the rest of the walk.
pub struct DomainWalk<'a, F: Fetcher> {
    visitor: &'a PageVisitor<F>,
    opts: VisitOptions,
    /// Caller's hint, honored for the seed only.
    hint: FetchKind,
    queue: VecDeque<String>,
    visited_links: HashSet<String>,
    visited_files: HashSet<String>,
    /// Discovered but not yet yielded file URLs.
    ready: VecDeque<String>,
    processed: u64,
    files_found: u64,
    max_queue: usize,
}

impl<'a, F: Fetcher> DomainWalk<'a, F> {
    pub fn new(visitor: &'a PageVisitor<F>, seed: &str, opts: VisitOptions) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(seed.to_string());
        Self {
            visitor,
            hint: opts.fetch_hint,
            opts,
            queue,
            visited_links: HashSet::new(),
            visited_files: HashSet::new(),
            ready: VecDeque::new(),
            processed: 0,
            files_found: 0,
            max_queue: 1,
        }
    }
}

impl<F: Fetcher> Iterator for DomainWalk<'_, F> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(file_url) = self.ready.pop_front() {
                self.files_found += 1;
                return Some(file_url);
            }

            let url = self.queue.pop_front()?;
            self.processed += 1;
            if self.processed % 10 == 0 {
                let done = self.processed as f64 / self.max_queue as f64 * 100.0;
                tracing::info!(
                    "url walk queue: {} / {}, {:.2}% done, {} files discovered",
                    self.processed,
                    self.max_queue,
                    done,
                    self.files_found
                );
            }

            if !self
                .visited_links
                .insert(url_model::logical_form(&url).to_string())
            {
                continue;
            }

            let (file_urls, link_urls) = self.visitor.visit(
                &url,
                VisitOptions {
                    fetch_hint: self.hint,
                    ..self.opts
                },
            );
            // Only the seed gets the caller's hint; everything found from
            // here on is a guess.
            self.hint = FetchKind::Unknown;

            self.queue.extend(link_urls);
            self.max_queue = self.max_queue.max(self.queue.len() + 1);

            for file_url in file_urls {
                let logical = url_model::logical_form(&file_url).to_string();
                if self.visited_files.insert(logical) {
                    self.ready.push_back(file_url);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::testutil::StubFetcher;
    use crate::crawl::PageRules;

    fn html_page(anchors: &[&str]) -> String {
        let body: String = anchors
            .iter()
            .map(|a| format!("<a href=\"{}\">x</a>", a))
            .collect();
        format!("<html><body>{}</body></html>", body)
    }

    fn walk_opts() -> VisitOptions {
        VisitOptions {
            fetch_hint: FetchKind::Link,
            skip_throttle: true,
            bidirectional: false,
            skip_self_page: true,
        }
    }

    #[test]
    fn yields_files_in_breadth_first_order() {
        let stub = StubFetcher::new()
            .page("https://h.test/", html_page(&["a/", "b/"]))
            .page("https://h.test/a/", html_page(&["one.zip", "deep/"]))
            .page("https://h.test/b/", html_page(&["two.zip"]))
            .page("https://h.test/a/deep/", html_page(&["three.zip"]));
        let visitor = PageVisitor::new(&stub, PageRules::default()).unwrap();

        let walk = DomainWalk::new(&visitor, "https://h.test/", walk_opts());
        let files: Vec<String> = walk.collect();
        assert_eq!(
            files,
            vec![
                "https://h.test/a/one.zip".to_string(),
                "https://h.test/b/two.zip".to_string(),
                "https://h.test/a/deep/three.zip".to_string(),
            ]
        );
    }

    #[test]
    fn file_urls_differing_only_in_query_yield_once() {
        let stub = StubFetcher::new()
            .page("https://h.test/", html_page(&["a/", "b/"]))
            .page("https://h.test/a/", html_page(&["/shared/f.zip"]))
            .page("https://h.test/b/", html_page(&["/shared/f.zip?v=2"]));
        let visitor = PageVisitor::new(&stub, PageRules::default()).unwrap();

        let walk = DomainWalk::new(&visitor, "https://h.test/", walk_opts());
        let files: Vec<String> = walk.collect();
        assert_eq!(files, vec!["https://h.test/shared/f.zip".to_string()]);
    }

    #[test]
    fn pages_are_not_revisited() {
        // a/b/ links back to the root, which is already visited by then.
        let stub = StubFetcher::new()
            .page("https://h.test/", html_page(&["a/"]))
            .page("https://h.test/a/", html_page(&["b/"]))
            .page("https://h.test/a/b/", html_page(&["/"]));
        let visitor = PageVisitor::new(&stub, PageRules::default()).unwrap();

        let walk = DomainWalk::new(&visitor, "https://h.test/", walk_opts());
        let _ = walk.count();
        let requests = stub.requests.lock().unwrap();
        let urls: Vec<&str> = requests.iter().map(|(u, _)| u.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://h.test/", "https://h.test/a/", "https://h.test/a/b/"]
        );
    }

    #[test]
    fn seed_keeps_hint_then_unknown() {
        let stub = StubFetcher::new()
            .page("https://h.test/", html_page(&["a/"]))
            .page("https://h.test/a/", html_page(&[]));
        let visitor = PageVisitor::new(&stub, PageRules::default()).unwrap();

        let walk = DomainWalk::new(&visitor, "https://h.test/", walk_opts());
        let _ = walk.count();
        let requests = stub.requests.lock().unwrap();
        let kinds: Vec<FetchKind> = requests.iter().map(|(_, k)| *k).collect();
        assert_eq!(kinds, vec![FetchKind::Link, FetchKind::Unknown]);
    }

    #[test]
    fn failed_seed_means_empty_walk() {
        let stub = StubFetcher::new().failing("https://h.test/");
        let visitor = PageVisitor::new(&stub, PageRules::default()).unwrap();

        let walk = DomainWalk::new(&visitor, "https://h.test/", walk_opts());
        let files: Vec<String> = walk.collect();
        assert!(files.is_empty());
    }

    #[test]
    fn bidirectional_walk_climbs_into_parents() {
        // Seed sits one level down; the file lives in the parent listing.
        let stub = StubFetcher::new()
            .page("https://h.test/pool/sub/", html_page(&[]))
            .page("https://h.test/pool/", html_page(&["top.pdf"]))
            .page("https://h.test/", html_page(&[]));
        let visitor = PageVisitor::new(&stub, PageRules::default()).unwrap();

        let opts = VisitOptions {
            bidirectional: true,
            ..walk_opts()
        };
        let walk = DomainWalk::new(&visitor, "https://h.test/pool/sub/", opts);
        let files: Vec<String> = walk.collect();
        assert_eq!(files, vec!["https://h.test/pool/top.pdf".to_string()]);
    }

    #[test]
    fn dead_branch_does_not_abort_walk() {
        let stub = StubFetcher::new()
            .page("https://h.test/", html_page(&["gone/", "live/"]))
            .failing("https://h.test/gone/")
            .page("https://h.test/live/", html_page(&["keep.tar.gz"]));
        let visitor = PageVisitor::new(&stub, PageRules::default()).unwrap();

        let walk = DomainWalk::new(&visitor, "https://h.test/", walk_opts());
        let files: Vec<String> = walk.collect();
        assert_eq!(files, vec!["https://h.test/live/keep.tar.gz".to_string()]);
    }
}
