//! Per-day totals and the running balance derived from them.
//!
//! [`DailyBalances`] collects unordered per-day sums. [`DailyBalances::sequence`]
//! consumes it, sorts the days and turns the sums into a prefix sum, giving the
//! read-only [`RunningBalances`].

use crate::amount::Amount;
use crate::date::Date;
use crate::error::Result;
use crate::transaction::Transaction;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;

/// Heading printed above the per-day lines.
const REPORT_HEADER: &str = "Running Daily Balances:";

/// Separator between the per-day lines and the total.
const REPORT_SEPARATOR: &str = "-----------";

/// Unordered per-day totals.
///
/// # Invariants
///
/// - `days` holds exactly the keys of `totals`, each once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyBalances {
    /// Days in first-seen order. Kept apart from the map so sorting is a
    /// plain slice sort.
    days: Vec<Date>,

    /// Sum of the amounts booked on each day.
    totals: HashMap<Date, Amount>,
}

impl DailyBalances {
    /// Creates an empty set of totals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds totals from `(day, amount)` pairs, summing repeated days.
    pub fn from_totals<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Date, Amount)>,
    {
        let mut balances = Self::new();
        for (date, amount) in entries {
            balances.add(date, amount);
        }
        balances
    }

    /// Adds one transaction to its day's total.
    ///
    /// The existence check, the append of a new day and the addition happen
    /// in one call, so a caller holding a lock for the call keeps the
    /// invariant.
    pub fn record(&mut self, transaction: &Transaction) {
        self.add(transaction.date, transaction.amount);
    }

    fn add(&mut self, date: Date, amount: Amount) {
        match self.totals.entry(date) {
            Entry::Occupied(mut total) => *total.get_mut() += amount,
            Entry::Vacant(slot) => {
                self.days.push(date);
                slot.insert(amount);
            }
        }
    }

    /// Days seen so far, in no particular order.
    pub fn days(&self) -> &[Date] {
        &self.days
    }

    /// Total booked on each day.
    pub fn totals(&self) -> &HashMap<Date, Amount> {
        &self.totals
    }

    /// Total booked on `date`, if any transaction fell on it.
    pub fn get(&self, date: &Date) -> Option<Amount> {
        self.totals.get(date).copied()
    }

    /// Number of distinct days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Returns `true` when no transaction has been recorded.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Sorts the days and converts each total into the running balance.
    ///
    /// Runs in O(n log n) for the sort plus one O(n) pass.
    pub fn sequence(mut self) -> RunningBalances {
        self.days.sort_unstable();

        let mut running = Amount::ZERO;
        for day in &self.days {
            if let Some(total) = self.totals.get_mut(day) {
                running += *total;
                *total = running;
            }
        }

        RunningBalances {
            days: self.days,
            totals: self.totals,
        }
    }
}

/// Running balance per day, days ascending.
///
/// The balance of a day is the sum of every amount booked on or before it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunningBalances {
    days: Vec<Date>,
    totals: HashMap<Date, Amount>,
}

impl RunningBalances {
    /// Iterates `(day, running balance)` pairs in ascending day order.
    pub fn iter(&self) -> impl Iterator<Item = (Date, Amount)> + '_ {
        self.days
            .iter()
            .map(|day| (*day, self.totals.get(day).copied().unwrap_or(Amount::ZERO)))
    }

    /// Days in ascending order.
    pub fn days(&self) -> &[Date] {
        &self.days
    }

    /// Running balance at the end of `date`, if it had transactions.
    pub fn get(&self, date: &Date) -> Option<Amount> {
        self.totals.get(date).copied()
    }

    /// Balance after the last day, or zero when there were no transactions.
    pub fn running_balance(&self) -> Amount {
        self.days
            .last()
            .and_then(|day| self.totals.get(day).copied())
            .unwrap_or(Amount::ZERO)
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Returns `true` when there are no days.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Writes the full console report: heading, one tab-separated line per
    /// day, separator and the final balance.
    pub fn write_report<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", REPORT_HEADER)?;

        {
            let mut rows = csv::WriterBuilder::new()
                .delimiter(b'\t')
                .has_headers(false)
                .from_writer(&mut writer);
            for (day, balance) in self.iter() {
                rows.write_record([format!("{}:", day), balance.to_string()])?;
            }
            rows.flush()?;
        }

        writeln!(writer, "{}", REPORT_SEPARATOR)?;
        writeln!(writer, "Total Balance: \t{}", self.running_balance())?;
        writer.flush()?;
        Ok(())
    }
}

impl fmt::Display for RunningBalances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (day, balance)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}:\t{}", day, balance)?;
        }
        Ok(())
    }
}
