//! moneez-ingest: bank-export parsing into uncategorized transactions.

pub mod error;
pub mod parsers;
pub mod processor;
pub mod record;
pub mod source;

pub use error::IngestError;
pub use processor::{DEFAULT_FIELD_PROCESSOR, FieldContext, FieldProcessor};
pub use record::{Separators, parse_records};
pub use source::{InputSource, expand_home, ingest_all};
