//! Read-only queries over a built ledger.

use crate::category::{CategoryCoverage, CategoryMaps};
use crate::ledger::Ledger;
use crate::transaction::Transaction;
use anyhow::{Result, bail};
use rust_decimal::Decimal;

/// Matches of a search, in insertion order
#[derive(Debug, Clone)]
pub struct SearchResult<'a> {
    pub matches: Vec<&'a Transaction>,
}

impl SearchResult<'_> {
    pub fn count(&self) -> usize {
        self.matches.len()
    }
}

/// Running balance after the chronologically latest transaction.
///
/// Ties on date resolve to the transaction ingested last.
pub fn current_balance(ledger: &Ledger) -> Result<Decimal> {
    let Some(latest) = ledger.transactions().iter().max_by_key(|t| t.date) else {
        bail!("no transactions ingested, balance is undefined");
    };
    match latest.amount_left {
        Some(balance) => Ok(balance),
        None => bail!("latest transaction ({}) carries no running balance", latest.date),
    }
}

pub fn search<'a, P>(ledger: &'a Ledger, predicate: P) -> SearchResult<'a>
where
    P: Fn(&Transaction) -> bool,
{
    SearchResult {
        matches: ledger.transactions().iter().filter(|t| predicate(t)).collect(),
    }
}

/// Case-insensitive free-text search over name, usage and payment type
pub fn search_text<'a>(ledger: &'a Ledger, term: &str) -> SearchResult<'a> {
    let term = term.to_lowercase();
    search(ledger, |t| {
        t.name.to_lowercase().contains(&term)
            || t.usage.to_lowercase().contains(&term)
            || t.payment_type.to_lowercase().contains(&term)
    })
}

pub fn category_coverage(maps: &CategoryMaps) -> CategoryCoverage {
    maps.coverage()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn txn(m: u32, day: u32, name: &str, amount: &str, left: &str) -> Transaction {
        Transaction::new(NaiveDate::from_ymd_opt(2023, m, day).unwrap(), name, d(amount))
            .with_balance(d(left))
    }

    fn ledger() -> Ledger {
        let mut l = Ledger::new();
        // out of date order on purpose
        l.ingest(
            vec![
                txn(3, 1, "REWE", "-20.00", "80.00"),
                txn(1, 1, "ACME", "100.00", "100.00"),
                txn(2, 1, "Rewe City", "-5.00", "95.00"),
            ],
            &CategoryMaps::new(),
        );
        l
    }

    #[test]
    fn test_balance_uses_latest_date() {
        assert_eq!(current_balance(&ledger()).unwrap(), d("80.00"));
    }

    #[test]
    fn test_balance_empty_is_error() {
        assert!(current_balance(&Ledger::new()).is_err());
    }

    #[test]
    fn test_search_keeps_insertion_order() {
        let l = ledger();
        let res = search(&l, |t| t.amount < Decimal::ZERO);
        assert_eq!(res.count(), 2);
        assert_eq!(res.matches[0].name, "REWE");
        assert_eq!(res.matches[1].name, "Rewe City");
    }

    #[test]
    fn test_search_text_case_insensitive() {
        let l = ledger();
        assert_eq!(search_text(&l, "rewe").count(), 2);
        assert_eq!(search_text(&l, "nothing").count(), 0);
    }
}
