//! Deterministic category rules: IBAN table first, then keywords in
//! configured order, then "Unknown".

use crate::transaction::Transaction;
use std::collections::{BTreeSet, HashMap};

/// Category assigned when no rule matches
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Static lookup tables, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMaps {
    ibans: HashMap<String, String>,
    /// (lowercased keyword, category) in configured order
    keywords: Vec<(String, String)>,
    /// (category, color) in configured order
    colors: Vec<(String, String)>,
}

/// Categories referenced by the lookup tables, and those without a color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCoverage {
    pub categories: BTreeSet<String>,
    pub uncolored: BTreeSet<String>,
}

impl CategoryMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ibans<I, K, V>(mut self, ibans: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.ibans
            .extend(ibans.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Keywords are matched in iteration order; later duplicates never win.
    ///
    /// Keywords are stored lowercased, so a capitalised config entry still
    /// matches the lowercased name and usage. Matching a keyword exactly as
    /// written would make such entries dead.
    pub fn with_keywords<I, K, V>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.keywords.extend(
            keywords
                .into_iter()
                .map(|(k, v)| (k.into().to_lowercase(), v.into())),
        );
        self
    }

    pub fn with_colors<I, K, V>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.colors
            .extend(colors.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn keywords(&self) -> &[(String, String)] {
        &self.keywords
    }

    pub fn colors(&self) -> &[(String, String)] {
        &self.colors
    }

    /// Configured color for `category`, if any
    pub fn color_of(&self, category: &str) -> Option<&str> {
        self.colors
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, color)| color.as_str())
    }

    /// Resolve the category for a transaction without mutating it.
    /// Priority: IBAN table > first matching keyword > Unknown.
    pub fn resolve(&self, txn: &Transaction) -> &str {
        if let Some(category) = txn.iban.as_ref().and_then(|iban| self.ibans.get(iban)) {
            return category;
        }

        let name = txn.name.to_lowercase();
        let usage = txn.usage.to_lowercase();
        self.keywords
            .iter()
            .find(|(kw, _)| name.contains(kw.as_str()) || usage.contains(kw.as_str()))
            .map(|(_, category)| category.as_str())
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    /// Set `txn.category`. Calling it again yields the same label.
    pub fn categorize(&self, txn: &mut Transaction) {
        txn.category = self.resolve(txn).to_string();
    }

    pub fn coverage(&self) -> CategoryCoverage {
        let categories: BTreeSet<String> = self
            .ibans
            .values()
            .chain(self.keywords.iter().map(|(_, c)| c))
            .cloned()
            .collect();
        let uncolored = categories
            .iter()
            .filter(|c| self.color_of(c).is_none())
            .cloned()
            .collect();
        CategoryCoverage {
            categories,
            uncolored,
        }
    }
}
