//! Delimited-text splitter.
//!
//! Splitting is literal: no quoting or escaping is interpreted, exactly one
//! header row, fields aligned to it by position.

use crate::error::IngestError;
use crate::processor::{FieldContext, FieldProcessor};
use moneez_core::{Transaction, TransactionDraft};
use std::borrow::Cow;

/// Column/row separators of one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separators {
    pub columns: String,
    pub rows: String,
}

impl Default for Separators {
    fn default() -> Self {
        Self {
            columns: ";".to_string(),
            rows: "\n".to_string(),
        }
    }
}

/// Fold `\r\n` and lone `\r` into `\n`, the way a text-mode read does.
fn unify_newlines(s: &str) -> Cow<'_, str> {
    if s.contains('\r') {
        Cow::Owned(s.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Parse raw export text into one transaction per data row.
///
/// Line endings are unified to `\n` in both the text and the row separator,
/// so CRLF exports split cleanly. Leading and trailing whitespace of the
/// whole text is then dropped, so a trailing newline does not produce an
/// empty row.
pub fn parse_records(
    text: &str,
    separators: &Separators,
    processor: FieldProcessor,
    currency: &str,
) -> Result<Vec<Transaction>, IngestError> {
    let text = unify_newlines(text);
    let row_separator = unify_newlines(&separators.rows);
    let mut rows = text.trim().split(row_separator.as_ref());
    let header: Vec<&str> = match rows.next() {
        Some(line) => line.split(separators.columns.as_str()).collect(),
        None => return Ok(Vec::new()),
    };

    let mut out = Vec::new();
    for (i, line) in rows.enumerate() {
        let row = i + 1;
        let fields: Vec<&str> = line.split(separators.columns.as_str()).collect();
        if fields.len() > header.len() {
            return Err(IngestError::RaggedRow {
                row,
                fields: fields.len(),
                columns: header.len(),
            });
        }

        let ctx = FieldContext { row, currency };
        let mut draft = TransactionDraft::new();
        for (key, value) in header.iter().zip(fields) {
            processor.apply(&mut draft, key, value, ctx)?;
        }

        let txn = draft
            .build()
            .map_err(|missing| IngestError::MissingField {
                row,
                field: missing.0,
            })?;
        out.push(txn);
    }

    Ok(out)
}
