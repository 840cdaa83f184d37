//! Transaction record types for ingested bank-ledger entries

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// One bank-ledger entry after ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Booking date (day precision)
    pub date: NaiveDate,
    /// Counterparty name
    pub name: String,
    /// Counterparty IBAN, if the source reports one
    pub iban: Option<String>,
    /// Counterparty BIC, if the source reports one
    pub bic: Option<String>,
    /// Free-text transaction type label ("Lastschrift", "Gutschrift", ...)
    pub payment_type: String,
    /// Memo text, whitespace-normalized
    pub usage: String,
    /// Positive = income, negative = expense
    pub amount: Decimal,
    /// Running balance after this transaction, as reported by the source
    pub amount_left: Option<Decimal>,
    /// Category label shipped with the source data. Informational only.
    pub innate_category: Option<String>,
    /// Resolved category. Empty until the categorizer has run.
    pub category: String,
    /// Tax-relevance flag as reported by the source
    pub relevant_for_tax: Option<String>,
}

impl Transaction {
    /// Create a new uncategorized Transaction
    pub fn new(date: NaiveDate, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            date,
            name: name.into(),
            iban: None,
            bic: None,
            payment_type: String::new(),
            usage: String::new(),
            amount,
            amount_left: None,
            innate_category: None,
            category: String::new(),
            relevant_for_tax: None,
        }
    }

    pub fn with_iban(mut self, iban: impl Into<String>) -> Self {
        self.iban = Some(iban.into());
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn with_balance(mut self, amount_left: Decimal) -> Self {
        self.amount_left = Some(amount_left);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "On {}: {} change by {} ({}) ({}) ({})\n\t{}",
            self.date,
            self.amount,
            self.name,
            self.iban.as_deref().unwrap_or("-"),
            self.category,
            self.payment_type,
            self.usage
        )
    }
}

/// A transaction under construction, filled one field at a time by a
/// field processor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDraft {
    pub date: Option<NaiveDate>,
    pub name: Option<String>,
    pub iban: Option<String>,
    pub bic: Option<String>,
    pub payment_type: Option<String>,
    pub usage: Option<String>,
    pub amount: Option<Decimal>,
    pub amount_left: Option<Decimal>,
    pub innate_category: Option<String>,
    pub relevant_for_tax: Option<String>,
}

impl TransactionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish the draft. `date` and `amount` are required; text fields
    /// default to empty.
    pub fn build(self) -> Result<Transaction, MissingField> {
        let date = self.date.ok_or(MissingField("date"))?;
        let amount = self.amount.ok_or(MissingField("amount"))?;

        Ok(Transaction {
            date,
            name: self.name.unwrap_or_default(),
            iban: self.iban,
            bic: self.bic,
            payment_type: self.payment_type.unwrap_or_default(),
            usage: self.usage.unwrap_or_default(),
            amount,
            amount_left: self.amount_left,
            innate_category: self.innate_category,
            category: String::new(),
            relevant_for_tax: self.relevant_for_tax,
        })
    }
}

/// A required field never appeared in the source row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("missing field: {0}")]
pub struct MissingField(pub &'static str);
