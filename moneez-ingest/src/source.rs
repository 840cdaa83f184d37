//! Input files: where to read, how to split, which field processor.

use crate::processor::{DEFAULT_FIELD_PROCESSOR, FieldProcessor};
use crate::record::{Separators, parse_records};
use anyhow::{Context, Result, bail};
use moneez_core::{CategoryMaps, Ledger, Transaction};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSource {
    pub path: PathBuf,
    pub separators: Separators,
    pub processor: FieldProcessor,
}

impl InputSource {
    /// Source with `;` columns, newline rows and the default processor
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            separators: Separators::default(),
            processor: DEFAULT_FIELD_PROCESSOR,
        }
    }

    pub fn with_separators(mut self, columns: &str, rows: &str) -> Result<Self> {
        if columns.is_empty() || rows.is_empty() {
            bail!("empty separator for {}", self.path.display());
        }
        self.separators = Separators {
            columns: columns.to_string(),
            rows: rows.to_string(),
        };
        Ok(self)
    }

    pub fn with_processor(mut self, processor: FieldProcessor) -> Self {
        self.processor = processor;
        self
    }

    /// Read and parse the file. Transactions come back uncategorized.
    pub fn read(&self, currency: &str) -> Result<Vec<Transaction>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        tracing::debug!(
            "parsing {} with field processor {}",
            self.path.display(),
            self.processor
        );
        let txns = parse_records(&text, &self.separators, self.processor, currency)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(txns)
    }
}

/// Expand a leading `~` against `$HOME`.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return Ok(PathBuf::from(path)),
    };
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(Path::new(&home).join(rest))
}

/// Ingest every source in order. The first failure aborts the run; files
/// already ingested stay in the ledger but the caller is expected to stop.
pub fn ingest_all(
    sources: &[InputSource],
    currency: &str,
    maps: &CategoryMaps,
    ledger: &mut Ledger,
) -> Result<()> {
    for source in sources {
        let txns = source.read(currency)?;
        ledger.ingest(txns, maps);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home() {
        let home = std::env::var("HOME").unwrap();
        assert_eq!(expand_home("~/bank/gls.csv").unwrap(), Path::new(&home).join("bank/gls.csv"));
        assert_eq!(expand_home("~").unwrap(), PathBuf::from(&home));
        assert_eq!(expand_home("/tmp/x.csv").unwrap(), PathBuf::from("/tmp/x.csv"));
        assert_eq!(expand_home("~other/x").unwrap(), PathBuf::from("~other/x"));
    }

    #[test]
    fn test_empty_separator_rejected() {
        assert!(InputSource::new("x.csv").with_separators("", "\n").is_err());
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = InputSource::new("/nonexistent/moneez.csv").read("EUR").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/moneez.csv"));
    }
}
