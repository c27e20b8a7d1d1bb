//! # Daily Balances
//!
//! Fetches a paginated collection of transactions from a remote API and
//! derives the running balance at the end of every day.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: Uses 2 decimal places via `rust_decimal`
//! - **Bounded concurrency**: At most `concurrency_limit` page fetches in flight
//! - **Fail-fast**: The first fetch error cancels the remaining fetches
//! - **Deterministic output**: Days sorted ascending regardless of arrival order
//!
//! ## Example
//!
//! ```no_run
//! use daily_balances::{running_balances, HttpPageFetcher};
//!
//! # async fn run() -> daily_balances::Result<()> {
//! let fetcher = HttpPageFetcher::new("http://resttest.bench.co/transactions", None)?;
//! let balances = running_balances(fetcher, 20).await?;
//! balances.write_report(std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

pub mod accumulator;
pub mod amount;
pub mod balances;
pub mod config;
pub mod coordinator;
pub mod date;
pub mod error;
pub mod fetch;
pub mod transaction;

pub use accumulator::{accumulate, BalanceAccumulator};
pub use amount::Amount;
pub use balances::{DailyBalances, RunningBalances};
pub use config::Config;
pub use coordinator::{Batch, BatchStream, PaginationCoordinator};
pub use date::Date;
pub use error::{BalanceError, Result};
pub use fetch::{HttpPageFetcher, PageSource};
pub use transaction::{Page, Transaction, PAGE_SIZE};

/// Fetches every page from `source` and returns the running daily balances.
///
/// Must be called from within a tokio runtime.
pub async fn running_balances<S: PageSource>(source: S, concurrency_limit: usize) -> Result<RunningBalances> {
    let coordinator = PaginationCoordinator::new(source, concurrency_limit)?;
    let daily = accumulate(coordinator.fetch_all()).await?;
    Ok(daily.sequence())
}
