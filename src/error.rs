use thiserror::Error;

// ---------------------------------------------------------------------------
// Engine errors
// ---------------------------------------------------------------------------

/// Structural problems found while turning a loaded table into records.
///
/// Raised once, by [`Index::build`](crate::data::index::Index::build).
/// Nothing is repaired: the first offending cell aborts index construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedDatasetError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: no value in column '{column}'")]
    MissingValue { row: usize, column: String },

    #[error("row {row}: column '{column}' expects {expected}, found '{found}'")]
    InvalidValue {
        row: usize,
        column: String,
        expected: &'static str,
        found: String,
    },

    #[error("duplicate record for company '{company_id}' in {year}")]
    DuplicateKey { company_id: String, year: i32 },
}

/// A row lacks one of the keyword-frequency columns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record is missing keyword frequency '{0}'")]
pub struct MissingFieldError(pub &'static str);

/// A metric was requested by a column name that is not numeric or unknown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown metric column '{0}'")]
pub struct UnknownMetric(pub String);
