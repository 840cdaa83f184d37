use thiserror::Error;

/// Fatal ingestion failures. Any of these aborts the whole run: the
/// dataset's shape can no longer be trusted.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unknown field processor: {0}")]
    UnknownFieldProcessor(String),

    #[error("Unknown key in row {row}: {key}")]
    UnknownKey { row: usize, key: String },

    #[error("Unexpected remark in row {row}: {value:?}")]
    UnexpectedRemark { row: usize, value: String },

    #[error("Unknown currency in row {row}: {found} (expected {expected})")]
    UnsupportedCurrency {
        row: usize,
        found: String,
        expected: String,
    },

    #[error("Invalid date in row {row}: {value:?}")]
    InvalidDate {
        row: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid amount in row {row}, field {field}: {value:?}")]
    InvalidAmount {
        row: usize,
        field: String,
        value: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("Row {row} is missing required field {field}")]
    MissingField { row: usize, field: &'static str },

    #[error("Row {row} has {fields} fields but the header names {columns}")]
    RaggedRow {
        row: usize,
        fields: usize,
        columns: usize,
    },
}
