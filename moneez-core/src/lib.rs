//! moneez-core: transaction model, categorization, aggregation and the
//! stacked-bar layout engine

pub mod category;
pub mod layout;
pub mod ledger;
pub mod report;
pub mod transaction;

pub use category::{CategoryCoverage, CategoryMaps, UNKNOWN_CATEGORY};
pub use layout::{
    ChartCanvas, DEFAULT_CYCLE, LegendEntry, Segment, UnusedColor, YearLayout, discover_categories,
    layout_year,
};
pub use ledger::{Ledger, MONTHS, MonthlyFlow, YearBuckets, round_cents};
pub use report::{SearchResult, category_coverage, current_balance, search, search_text};
pub use transaction::{MissingField, Transaction, TransactionDraft};
