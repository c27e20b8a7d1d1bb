//! Command-line configuration.

use clap::Parser;
use std::time::Duration;

/// Pages fetched at once unless `--concurrency` says otherwise.
pub const DEFAULT_CONCURRENCY: usize = 20;

/// Root of the transactions API; pages live at `{base}/{n}.json`.
pub const DEFAULT_BASE_URL: &str = "http://resttest.bench.co/transactions";

/// Fetches every transaction page and prints running daily balances.
#[derive(Debug, Clone, Parser)]
#[command(name = "daily-balances", version, about)]
pub struct Config {
    /// Number of pages fetched concurrently
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Base URL of the transactions API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl Config {
    /// Request timeout, if one was given.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}
