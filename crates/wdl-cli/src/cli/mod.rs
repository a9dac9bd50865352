//! CLI for the WDL site crawler and batch downloader.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use wdl_core::config;
use wdl_core::fetch::HttpFetcher;
use wdl_core::logging;
use wdl_core::session::{self, SessionOptions};

/// Top-level CLI: scan pages for downloadable files and grab them.
#[derive(Debug, Parser)]
#[command(name = "wdl")]
#[command(about = "wdl: site crawler and batch file downloader", long_about = None)]
pub struct Cli {
    /// Pages to scan or files to grab (one or more URLs).
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Directory downloads are written to.
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dirpath: Option<PathBuf>,

    /// Walk each host breadth-first for files instead of visiting one page.
    #[arg(long)]
    pub recurse: bool,

    /// Follow links upward into parent directories as well as downward.
    #[arg(long)]
    pub bidirectional: bool,

    /// Save files by basename only instead of mirroring URL paths.
    #[arg(long)]
    pub flat: bool,

    /// Skip downloads whose output file already exists.
    #[arg(long)]
    pub skip_exist: bool,

    /// Skip the politeness delay between requests.
    #[arg(long)]
    pub skip_sleep: bool,

    /// Do not keep visited pages themselves as downloads.
    #[arg(long)]
    pub skip_page: bool,

    /// Shorthand for --log-level debug.
    #[arg(long)]
    pub debug: bool,

    /// Level written to the log file.
    #[arg(
        long,
        default_value = "info",
        value_name = "LEVEL",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    pub log_level: String,

    /// Log file path (default: under the XDG state dir).
    #[arg(long, value_name = "PATH")]
    pub log_filepath: Option<PathBuf>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        Cli::parse().run()
    }

    fn run(self) -> Result<()> {
        let level = if self.debug {
            "debug"
        } else {
            self.log_level.as_str()
        };
        if logging::init_logging(level, self.log_filepath.as_deref()).is_err() {
            logging::init_logging_stderr(level);
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let output_dir = self
            .output_dirpath
            .clone()
            .unwrap_or_else(default_output_dir);

        let mut opts = SessionOptions::new(output_dir, &cfg);
        opts.recurse = self.recurse;
        opts.bidirectional = self.bidirectional;
        opts.flat = self.flat;
        opts.skip_exist = self.skip_exist;
        opts.skip_throttle = self.skip_sleep;
        opts.skip_page = self.skip_page;

        let fetcher = HttpFetcher::new(
            cfg.user_agent.clone(),
            Duration::from_millis(cfg.throttle_ms),
        );
        let report = session::run_session(&fetcher, &self.urls, &opts)?;

        println!(
            "{} discovered, {} downloaded, {} failed -> {}",
            report.discovered,
            report.downloaded,
            report.failed,
            opts.output_dir.display()
        );
        Ok(())
    }
}

/// Default output directory: a wdl folder under the system temp dir.
fn default_output_dir() -> PathBuf {
    std::env::temp_dir().join("wdl")
}
