//! Merging the batch stream into per-day totals.
//!
//! Each batch is merged by its own task. The shared [`DailyBalances`] lives
//! behind one mutex, taken once per transaction so the check for an existing
//! day, the append of a new one and the addition are never split.

use crate::balances::DailyBalances;
use crate::coordinator::{Batch, BatchStream};
use crate::error::Result;
use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Accumulates batches into a shared [`DailyBalances`].
#[derive(Debug, Default)]
pub struct BalanceAccumulator {
    state: Arc<Mutex<DailyBalances>>,
    merges: JoinSet<usize>,
    merged: usize,
}

impl BalanceAccumulator {
    /// Creates an accumulator with empty totals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a task merging one batch into the shared totals.
    ///
    /// Must be called from within a tokio runtime.
    pub fn merge(&mut self, batch: Batch) {
        let state = Arc::clone(&self.state);
        self.merges.spawn(async move {
            for transaction in &batch {
                state.lock().record(transaction);
            }
            batch.len()
        });
    }

    /// Number of merge tasks not yet reaped.
    pub fn pending(&self) -> usize {
        self.merges.len()
    }

    /// Collects merge tasks that have already finished, without waiting.
    pub fn reap(&mut self) -> Result<()> {
        while let Some(count) = self.merges.try_join_next() {
            self.merged += count?;
        }
        Ok(())
    }

    /// Waits for every merge task and returns the totals.
    pub async fn finish(mut self) -> Result<DailyBalances> {
        while let Some(count) = self.merges.join_next().await {
            self.merged += count?;
        }
        debug!("Merged {} transactions", self.merged);

        Ok(match Arc::try_unwrap(self.state) {
            Ok(state) => state.into_inner(),
            Err(shared) => shared.lock().clone(),
        })
    }

    /// Consumes `stream` until it closes, merging every batch.
    ///
    /// A terminal error on the stream aborts the outstanding merges and is
    /// returned.
    pub async fn accumulate(mut self, mut stream: BatchStream) -> Result<DailyBalances> {
        while let Some(batch) = stream.next().await {
            match batch {
                Ok(batch) => {
                    debug!("Received batch of {} transactions", batch.len());
                    self.merge(batch);
                    self.reap()?;
                }
                Err(e) => {
                    self.merges.abort_all();
                    return Err(e);
                }
            }
        }
        self.finish().await
    }
}

/// Accumulates a batch stream into per-day totals.
pub async fn accumulate(stream: BatchStream) -> Result<DailyBalances> {
    BalanceAccumulator::new().accumulate(stream).await
}
