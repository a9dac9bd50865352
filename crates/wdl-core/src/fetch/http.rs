//! Blocking HTTP fetcher built on curl (libcurl).
//!
//! Streams the response body to a `.part` file next to the final path and
//! renames on success, so an interrupted transfer never leaves a
//! plausible-looking output file behind.

use super::{FetchError, FetchKind, FetchOptions, Fetched, Fetcher};
use crate::url_model;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Suffix for in-progress downloads.
const PART_SUFFIX: &str = ".part";

/// Returns the in-progress path for `path` (same directory, `.part` appended).
fn part_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}

/// Real network fetcher: one blocking GET per call, body streamed to disk.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    user_agent: String,
    throttle: Duration,
}

impl HttpFetcher {
    pub fn new(user_agent: impl Into<String>, throttle: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            throttle,
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(
        &self,
        url: &str,
        dest_dir: &Path,
        kind: FetchKind,
        opts: FetchOptions,
    ) -> Result<Fetched, FetchError> {
        // Filename comes from the requested URL; we only learn the final
        // URL after the transfer, and the two rarely disagree for files.
        let final_path = dest_dir.join(url_model::derive_filename(url));
        if opts.skip_exist && final_path.exists() {
            tracing::debug!("{} already exists, skipping {}", final_path.display(), url);
            return Ok(Fetched {
                path: final_path,
                final_url: url.to_string(),
            });
        }

        if !opts.skip_throttle && !self.throttle.is_zero() {
            tracing::debug!("sleeping {}ms before {} fetch of {}", self.throttle.as_millis(), kind.as_str(), url);
            std::thread::sleep(self.throttle);
        }

        let part = part_path(&final_path);
        let out = File::create(&part)?;

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(|_| FetchError::BadUrl(url.to_string()))?;
        easy.useragent(&self.user_agent)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(Duration::from_secs(30))?;
        easy.low_speed_limit(1024)?;
        easy.low_speed_time(Duration::from_secs(60))?;
        easy.timeout(Duration::from_secs(3600))?;

        if kind == FetchKind::Link {
            let mut list = curl::easy::List::new();
            list.append("Accept: text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")?;
            easy.http_headers(list)?;
        }

        let write_error: Arc<Mutex<Option<io::Error>>> = Arc::new(Mutex::new(None));
        let perform = {
            let mut transfer = easy.transfer();
            let slot = Arc::clone(&write_error);
            let mut out = out;
            transfer.write_function(move |data| match out.write_all(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    let _ = slot.lock().unwrap().replace(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Err(e) = perform {
            let _ = fs::remove_file(&part);
            if let Some(io_err) = write_error.lock().unwrap().take() {
                return Err(FetchError::Io(io_err));
            }
            return Err(FetchError::Curl(e));
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            let _ = fs::remove_file(&part);
            return Err(FetchError::Http(code));
        }

        let final_url = match easy.effective_url()? {
            Some(effective) => effective.to_string(),
            None => url.to_string(),
        };

        fs::rename(&part, &final_path)?;
        tracing::debug!("fetched {} ({}) to {}", url, kind.as_str(), final_path.display());
        Ok(Fetched {
            path: final_path,
            final_url,
        })
    }
}
