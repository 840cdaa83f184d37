//! Field-processor strategies: one per supported export format.
//!
//! Resolved from the config by name once, before any file is read. An
//! unknown name is an error, never a silent fallback.

use crate::error::IngestError;
use crate::parsers::gls;
use moneez_core::TransactionDraft;
use std::fmt;
use std::str::FromStr;

/// Processor used when an input file names none
pub const DEFAULT_FIELD_PROCESSOR: FieldProcessor = FieldProcessor::Gls;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldProcessor {
    /// GLS Bank CSV export
    #[default]
    Gls,
}

/// Per-row state a processor needs besides the field itself
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// 1-based data row
    pub row: usize,
    /// The single accepted currency
    pub currency: &'a str,
}

impl FieldProcessor {
    pub fn name(&self) -> &'static str {
        match self {
            FieldProcessor::Gls => "gls",
        }
    }

    /// Apply one (header, value) pair to `draft`.
    pub fn apply(
        &self,
        draft: &mut TransactionDraft,
        key: &str,
        value: &str,
        ctx: FieldContext<'_>,
    ) -> Result<(), IngestError> {
        match self {
            FieldProcessor::Gls => gls::process_field(draft, key, value, ctx),
        }
    }
}

impl FromStr for FieldProcessor {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gls" => Ok(FieldProcessor::Gls),
            other => Err(IngestError::UnknownFieldProcessor(other.to_string())),
        }
    }
}

impl fmt::Display for FieldProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
