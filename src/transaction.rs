//! Transaction and page models as served by the remote API.

use crate::amount::Amount;
use crate::date::Date;
use serde::Deserialize;
use std::fmt;

/// Maximum number of transactions the remote service puts on one page.
pub const PAGE_SIZE: u32 = 10;

/// A single financial transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    /// Day the transaction was booked
    pub date: Date,

    /// Ledger account the transaction belongs to
    #[serde(default)]
    pub ledger: String,

    /// Signed amount, negative for expenses
    pub amount: Amount,

    /// Counterparty name
    #[serde(default)]
    pub company: String,
}

impl Transaction {
    /// Creates a transaction.
    pub fn new(date: Date, ledger: impl Into<String>, amount: Amount, company: impl Into<String>) -> Self {
        Transaction {
            date,
            ledger: ledger.into(),
            amount,
            company: company.into(),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.date, self.amount, self.ledger, self.company)
    }
}

/// One page of the transaction collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page {
    /// Number of transactions across the whole collection
    #[serde(rename = "totalCount")]
    pub total_count: u32,

    /// 1-based index of this page
    pub page: u32,

    /// Transactions on this page, at most `PAGE_SIZE`
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Page {
    /// Number of pages the collection spans.
    pub fn page_count(&self) -> u32 {
        self.total_count.div_ceil(PAGE_SIZE)
    }

    /// Pages still to fetch once this first page is in hand.
    pub fn remaining_pages(&self) -> u32 {
        self.page_count().saturating_sub(1)
    }
}
