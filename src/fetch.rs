//! Fetching single pages from the remote transactions API.

use crate::error::{BalanceError, Result};
use crate::transaction::Page;
use log::debug;
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;

/// Idle connections kept open per host, enough for every in-flight fetch.
pub const MAX_IDLE_CONNECTIONS: usize = 100;

/// A source of transaction pages, addressed by 1-based page index.
///
/// The coordinator is generic over this trait so it can run against the HTTP
/// API or against an in-memory source.
pub trait PageSource: Send + Sync + 'static {
    /// Fetches and decodes one page.
    fn fetch_page(&self, index: u32) -> impl Future<Output = Result<Page>> + Send;
}

/// Fetches pages over HTTP from `{base_url}/{index}.json`.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPageFetcher {
    /// Creates a fetcher for the given base URL.
    ///
    /// Without a `timeout` the transport's default applies.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(MAX_IDLE_CONNECTIONS);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(BalanceError::Client)?;

        Ok(HttpPageFetcher {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the URL of the given page.
    pub fn page_url(&self, index: u32) -> String {
        format!("{}/{}.json", self.base_url, index)
    }
}

impl PageSource for HttpPageFetcher {
    async fn fetch_page(&self, index: u32) -> Result<Page> {
        let url = self.page_url(index);
        debug!("Fetching page {} from {}", index, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| BalanceError::Transport { page: index, source })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(BalanceError::Http {
                page: index,
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| BalanceError::Transport { page: index, source })?;

        serde_json::from_slice(&body).map_err(|source| BalanceError::Decode { page: index, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_layout() {
        let fetcher = HttpPageFetcher::new("http://resttest.bench.co/transactions", None).unwrap();
        assert_eq!(fetcher.page_url(1), "http://resttest.bench.co/transactions/1.json");
        assert_eq!(fetcher.page_url(42), "http://resttest.bench.co/transactions/42.json");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let fetcher = HttpPageFetcher::new("http://localhost:8080/", Some(Duration::from_secs(5))).unwrap();
        assert_eq!(fetcher.page_url(3), "http://localhost:8080/3.json");
    }

    #[tokio::test]
    async fn test_invalid_url_is_transport_error() {
        let fetcher = HttpPageFetcher::new("invalid url", None).unwrap();
        let err = fetcher.fetch_page(1).await.unwrap_err();
        assert!(matches!(err, BalanceError::Transport { page: 1, .. }));
    }
}
