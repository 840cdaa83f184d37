//! Ledger — the aggregation context: every ingested transaction plus
//! year/month bucket indexes over them.
//!
//! Lifecycle:
//! - Build phase: `ingest` batches in file order (single writer).
//! - Report phase: read-only views for summaries, layout and queries.
//!
//! Transactions are stored once, in insertion order. Buckets hold indexes
//! into that list, so "every transaction appears in both" holds by
//! construction.
//!
//! Buckets:
//! - key: `date.year()`
//! - 12 months, index `date.month0()` (January = 0)

use crate::category::CategoryMaps;
use crate::transaction::Transaction;
use chrono::Datelike;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use std::fmt;

pub const MONTHS: usize = 12;

#[derive(Debug, Default, Clone)]
pub struct Ledger {
    transactions: Vec<Transaction>,

    // years[year][month0] = indexes into `transactions`
    years: BTreeMap<i32, [Vec<usize>; MONTHS]>,
}

/// Borrowed view of one year's 12 month buckets
#[derive(Debug, Clone)]
pub struct YearBuckets<'a> {
    pub year: i32,
    pub months: [Vec<&'a Transaction>; MONTHS],
}

/// Round to whole cents, halves away from zero. `{:.2}` on a `Decimal`
/// truncates, so anything printed with two places goes through here first.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Income/expense totals for one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthlyFlow {
    /// 1-based month number
    pub month: u32,
    /// Sum of all positive amounts
    pub plus: Decimal,
    /// Sum of all negative amounts (<= 0)
    pub minus: Decimal,
}

impl fmt::Display for MonthlyFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Month {:2}: {:10.2} {:10.2}",
            self.month,
            round_cents(self.plus),
            round_cents(self.minus)
        )
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// All transactions in insertion order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Categorize a freshly parsed batch and index it into the buckets.
    /// No deduplication: ingesting the same rows twice stores them twice.
    pub fn ingest(&mut self, batch: Vec<Transaction>, maps: &CategoryMaps) {
        tracing::info!("Processing {} payments", batch.len());

        for mut txn in batch {
            maps.categorize(&mut txn);
            self.insert(txn);
        }
    }

    /// Index an already-categorized transaction.
    pub fn insert(&mut self, txn: Transaction) {
        let idx = self.transactions.len();
        let month0 = txn.date.month0() as usize;
        self.years.entry(txn.date.year()).or_default()[month0].push(idx);
        self.transactions.push(txn);
    }

    /// Years with at least one transaction, ascending
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    /// Month buckets for `year`. A year never seen yields 12 empty buckets.
    pub fn year(&self, year: i32) -> YearBuckets<'_> {
        let months = match self.years.get(&year) {
            Some(buckets) => std::array::from_fn(|m| {
                buckets[m].iter().map(|&i| &self.transactions[i]).collect()
            }),
            None => std::array::from_fn(|_| Vec::new()),
        };
        YearBuckets { year, months }
    }

    /// Per-month positive and negative sums for `year`
    pub fn year_summary(&self, year: i32) -> [MonthlyFlow; MONTHS] {
        let buckets = self.year(year);
        std::array::from_fn(|m| {
            let (plus, minus) = buckets.months[m].iter().fold(
                (Decimal::ZERO, Decimal::ZERO),
                |(plus, minus), t| {
                    if t.amount > Decimal::ZERO {
                        (plus + t.amount, minus)
                    } else {
                        (plus, minus + t.amount)
                    }
                },
            );
            MonthlyFlow {
                month: m as u32 + 1,
                plus,
                minus,
            }
        })
    }
}

impl<'a> YearBuckets<'a> {
    /// Every transaction of the year, month by month
    pub fn iter(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.months.iter().flat_map(|m| m.iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.months.iter().all(Vec::is_empty)
    }
}
