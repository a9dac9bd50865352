pub mod config;
pub mod logging;

// Core modules
pub mod crawl;
pub mod fetch;
pub mod pool;
pub mod retry;
pub mod session;
pub mod url_model;
