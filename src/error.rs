//! Error types for the daily balances pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, BalanceError>;

/// Errors that can occur while fetching, merging or reporting balances.
#[derive(Error, Debug)]
pub enum BalanceError {
    /// The request for a page could not be built or sent
    #[error("page {page}: transport error: {source}")]
    Transport {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    /// The remote server answered with a non-success status
    #[error("page {page}: remote server responded with {status} {reason}")]
    Http { page: u32, status: u16, reason: String },

    /// The page body could not be decoded
    #[error("page {page}: malformed page body: {source}")]
    Decode {
        page: u32,
        #[source]
        source: serde_json::Error,
    },

    /// Date literal not in `YYYY-MM-DD` form
    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Amount literal not a decimal number
    #[error("invalid amount {0:?}: expected a decimal number")]
    InvalidAmount(String),

    /// Concurrency limit of zero or beyond the semaphore maximum
    #[error("concurrency limit must be between 1 and {max}, got {0}", max = tokio::sync::Semaphore::MAX_PERMITS)]
    InvalidConcurrency(usize),

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// A fetch or merge task panicked
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The batch stream consumer was dropped before fetching finished
    #[error("batch stream closed by consumer")]
    StreamClosed,

    /// Failed to write the report
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write a report row
    #[error("CSV writer error: {0}")]
    Csv(#[from] csv::Error),
}
