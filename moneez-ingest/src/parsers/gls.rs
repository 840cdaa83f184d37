//! GLS Bank CSV export
//!
//! Header row (`;`-separated):
//!   Bezeichnung Auftragskonto;IBAN Auftragskonto;BIC Auftragskonto;Bankname Auftragskonto;
//!   Buchungstag;Valutadatum;Name Zahlungsbeteiligter;IBAN Zahlungsbeteiligter;
//!   BIC (SWIFT-Code) Zahlungsbeteiligter;Buchungstext;Verwendungszweck;Betrag;Waehrung;
//!   Saldo nach Buchung;Bemerkung;Kategorie;Steuerrelevant;Glaeubiger ID;Mandatsreferenz
//!
//! Dates are `DD.MM.YYYY`, amounts use a decimal comma (`-12,30`).

use crate::error::IngestError;
use crate::processor::FieldContext;
use chrono::NaiveDate;
use moneez_core::TransactionDraft;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").expect("static regex"));

pub(crate) fn parse_date(value: &str, row: usize) -> Result<NaiveDate, IngestError> {
    NaiveDate::parse_from_str(value.trim(), "%d.%m.%Y").map_err(|source| IngestError::InvalidDate {
        row,
        value: value.to_string(),
        source,
    })
}

/// Decimal comma becomes a dot. No thousands separators are handled.
pub(crate) fn parse_amount(field: &str, value: &str, row: usize) -> Result<Decimal, IngestError> {
    let normalized = value.trim().replace(',', ".");
    Decimal::from_str(&normalized).map_err(|source| IngestError::InvalidAmount {
        row,
        field: field.to_string(),
        value: value.to_string(),
        source,
    })
}

/// Collapse every run of non-word characters to one space
pub(crate) fn normalize_usage(value: &str) -> String {
    NON_WORD.replace_all(value, " ").into_owned()
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub fn process_field(
    draft: &mut TransactionDraft,
    key: &str,
    value: &str,
    ctx: FieldContext<'_>,
) -> Result<(), IngestError> {
    match key {
        "Buchungstag" => draft.date = Some(parse_date(value, ctx.row)?),
        "Name Zahlungsbeteiligter" => draft.name = Some(value.to_string()),
        "IBAN Zahlungsbeteiligter" => draft.iban = non_empty(value),
        "BIC (SWIFT-Code) Zahlungsbeteiligter" => draft.bic = non_empty(value),
        "Buchungstext" => draft.payment_type = Some(value.to_string()),
        "Verwendungszweck" => draft.usage = Some(normalize_usage(value)),
        "Betrag" => draft.amount = Some(parse_amount(key, value, ctx.row)?),
        "Waehrung" => {
            if value.trim() != ctx.currency {
                return Err(IngestError::UnsupportedCurrency {
                    row: ctx.row,
                    found: value.to_string(),
                    expected: ctx.currency.to_string(),
                });
            }
        }
        "Saldo nach Buchung" => draft.amount_left = Some(parse_amount(key, value, ctx.row)?),
        "Bemerkung" => {
            if !value.trim().is_empty() {
                return Err(IngestError::UnexpectedRemark {
                    row: ctx.row,
                    value: value.to_string(),
                });
            }
        }
        "Kategorie" => draft.innate_category = non_empty(value),
        "Steuerrelevant" => draft.relevant_for_tax = non_empty(value),
        "Glaeubiger ID" | "Mandatsreferenz" | "Valutadatum" => {}
        "Bezeichnung Auftragskonto" | "IBAN Auftragskonto" | "BIC Auftragskonto"
        | "Bankname Auftragskonto" => {}
        _ => {
            return Err(IngestError::UnknownKey {
                row: ctx.row,
                key: key.to_string(),
            });
        }
    }
    Ok(())
}
