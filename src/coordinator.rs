//! Concurrent fetching of every page of the transaction collection.
//!
//! Page 1 is fetched first since its `totalCount` decides how many pages
//! follow. The remaining pages are fetched by spawned tasks, at most
//! `concurrency_limit` at a time, each pushing its batch onto one shared
//! channel. The first failure aborts every outstanding task and becomes the
//! last item on the stream.

use crate::error::{BalanceError, Result};
use crate::fetch::PageSource;
use crate::transaction::{Page, Transaction, PAGE_SIZE};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

/// Transactions of one fetched page.
pub type Batch = Vec<Transaction>;

/// Receiving end of the coordinator's output.
///
/// Yields `Ok(batch)` items, then either closes (`None`) or yields a single
/// terminal `Err`. The first batch always belongs to page 1; later batches
/// arrive in completion order.
#[derive(Debug)]
pub struct BatchStream {
    receiver: mpsc::Receiver<Result<Batch>>,
}

impl BatchStream {
    /// Waits for the next batch.
    pub async fn next(&mut self) -> Option<Result<Batch>> {
        self.receiver.recv().await
    }

    /// Drains the stream into one vector, stopping at the first error.
    pub async fn collect(mut self) -> Result<Vec<Batch>> {
        let mut batches = Vec::new();
        while let Some(batch) = self.next().await {
            batches.push(batch?);
        }
        Ok(batches)
    }
}

/// Fetches all pages from a [`PageSource`] with bounded concurrency.
pub struct PaginationCoordinator<S> {
    source: Arc<S>,
    concurrency_limit: usize,
}

impl<S: PageSource> PaginationCoordinator<S> {
    /// Creates a coordinator admitting at most `concurrency_limit` fetches at once.
    pub fn new(source: S, concurrency_limit: usize) -> Result<Self> {
        if concurrency_limit == 0 || concurrency_limit > Semaphore::MAX_PERMITS {
            return Err(BalanceError::InvalidConcurrency(concurrency_limit));
        }
        Ok(PaginationCoordinator {
            source: Arc::new(source),
            concurrency_limit,
        })
    }

    /// Returns the configured concurrency limit.
    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    /// Starts fetching every page and returns the stream of batches.
    ///
    /// Must be called from within a tokio runtime. Dropping the stream stops
    /// the fetch.
    pub fn fetch_all(&self) -> BatchStream {
        let (sender, receiver) = mpsc::channel(self.concurrency_limit);
        tokio::spawn(drive(Arc::clone(&self.source), self.concurrency_limit, sender));
        BatchStream { receiver }
    }
}

fn check_page(page: &Page, index: u32) {
    if page.page != index {
        warn!("Requested page {} but server answered with page {}", index, page.page);
    }
    if page.transactions.len() > PAGE_SIZE as usize {
        warn!(
            "Page {} holds {} transactions, more than the page size of {}",
            index,
            page.transactions.len(),
            PAGE_SIZE
        );
    }
}

async fn drive<S: PageSource>(source: Arc<S>, limit: usize, sender: mpsc::Sender<Result<Batch>>) {
    let first = match source.fetch_page(1).await {
        Ok(page) => page,
        Err(e) => {
            warn!("Fetching page 1 failed: {}", e);
            let _ = sender.send(Err(e)).await;
            return;
        }
    };
    check_page(&first, 1);

    let page_count = first.page_count().max(1);
    info!(
        "Collection holds {} transactions on {} pages, fetching {} more with concurrency {}",
        first.total_count,
        page_count,
        first.remaining_pages(),
        limit
    );

    if sender.send(Ok(first.transactions)).await.is_err() {
        debug!("Batch stream dropped after page 1");
        return;
    }

    if let Err(e) = fetch_remaining(source, limit, page_count, &sender).await {
        warn!("Aborting pagination: {}", e);
        let _ = sender.send(Err(e)).await;
    }
}

/// Fetches pages `2..=last`, returning the first error after every
/// dispatched task has been aborted and wound down.
async fn fetch_remaining<S: PageSource>(
    source: Arc<S>,
    limit: usize,
    last: u32,
    sender: &mpsc::Sender<Result<Batch>>,
) -> Result<()> {
    let semaphore = Arc::new(Semaphore::new(limit));
    let mut tasks = JoinSet::new();
    let mut next_index = 2u32;

    loop {
        tokio::select! {
            biased;

            Some(joined) = tasks.join_next() => {
                let outcome = joined.map_err(BalanceError::from).and_then(|result| result);
                if let Err(e) = outcome {
                    tasks.abort_all();
                    while tasks.join_next().await.is_some() {}
                    return Err(e);
                }
            }

            permit = Arc::clone(&semaphore).acquire_owned(), if next_index <= last => {
                // The semaphore is never closed.
                let Ok(permit) = permit else { break };
                let index = next_index;
                next_index += 1;

                let source = Arc::clone(&source);
                let sender = sender.clone();
                tasks.spawn(async move {
                    let _permit = permit;
                    let page = source.fetch_page(index).await?;
                    check_page(&page, index);
                    debug!("Fetched page {} with {} transactions", index, page.transactions.len());
                    sender
                        .send(Ok(page.transactions))
                        .await
                        .map_err(|_| BalanceError::StreamClosed)
                });
            }

            else => break,
        }
    }

    Ok(())
}
