use serde::{Deserialize, Serialize};

use super::index::Index;
use super::model::Record;

// ---------------------------------------------------------------------------
// Selection – what the analyst picked
// ---------------------------------------------------------------------------

/// A company, optionally narrowed to one year.
///
/// `year: None` is the all-years view: the query resolves to the company's
/// full history rather than a single point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub company_id: String,
    pub year: Option<i32>,
}

impl Selection {
    pub fn company(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            year: None,
        }
    }

    pub fn point(company_id: impl Into<String>, year: i32) -> Self {
        Self {
            company_id: company_id.into(),
            year: Some(year),
        }
    }
}

/// Outcome of [`run`]. Both variants may be empty; "no data" is a valid
/// answer, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult<'a> {
    History(Vec<&'a Record>),
    Point(Option<&'a Record>),
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// All records of `company_id`, ascending by year. Empty for unknown ids.
pub fn history<'a>(index: &'a Index, company_id: &str) -> Vec<&'a Record> {
    index
        .positions(company_id)
        .iter()
        .map(|&pos| index.record_at(pos))
        .collect()
}

/// The record for exactly (`company_id`, `year`), if any.
pub fn point<'a>(index: &'a Index, company_id: &str, year: i32) -> Option<&'a Record> {
    index
        .position(company_id, year)
        .map(|pos| index.record_at(pos))
}

/// Sorted distinct company ids across the whole dataset.
pub fn distinct_company_ids(index: &Index) -> &[String] {
    index.company_ids()
}

/// Sorted distinct years across the whole dataset.
pub fn distinct_years(index: &Index) -> &[i32] {
    index.years()
}

/// Display name of a company, taken from its earliest record.
pub fn company_name<'a>(index: &'a Index, company_id: &str) -> Option<&'a str> {
    index
        .positions(company_id)
        .first()
        .map(|&pos| index.record_at(pos).company_name.as_str())
}

/// Resolve a selection to a history (no year) or a point (year given).
pub fn run<'a>(index: &'a Index, selection: &Selection) -> QueryResult<'a> {
    match selection.year {
        None => QueryResult::History(history(index, &selection.company_id)),
        Some(year) => QueryResult::Point(point(index, &selection.company_id, year)),
    }
}
