//! Daily Balances CLI
//!
//! Fetches all transaction pages and prints the running balance per day.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --concurrency 20
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity

use clap::Parser;
use daily_balances::{running_balances, Config, HttpPageFetcher, Result};
use std::io;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run(Config::parse()).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    let fetcher = HttpPageFetcher::new(&config.base_url, config.timeout())?;
    let balances = running_balances(fetcher, config.concurrency).await?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    balances.write_report(handle)?;

    Ok(())
}
