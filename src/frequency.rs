use crate::data::model::{KeywordCategory, Record, Row};
use crate::error::MissingFieldError;

/// Anything that can report keyword mention counts per category.
pub trait KeywordSource {
    /// Count for `category`, or `None` when the source does not carry it.
    fn keyword_count(&self, category: KeywordCategory) -> Option<u64>;
}

impl KeywordSource for Record {
    fn keyword_count(&self, category: KeywordCategory) -> Option<u64> {
        Some(self.keywords.get(category))
    }
}

/// Raw rows carry a count only when the cell holds a non-negative integer.
impl KeywordSource for Row {
    fn keyword_count(&self, category: KeywordCategory) -> Option<u64> {
        self.get(category.column())
            .and_then(|v| v.as_i64())
            .and_then(|c| u64::try_from(c).ok())
    }
}

/// Keyword counts in the fixed category order (see [`KeywordCategory::ALL`]).
pub fn frequencies<S>(source: &S) -> Result<Vec<(KeywordCategory, u64)>, MissingFieldError>
where
    S: KeywordSource + ?Sized,
{
    KeywordCategory::ALL
        .into_iter()
        .map(|category| {
            source
                .keyword_count(category)
                .map(|count| (category, count))
                .ok_or(MissingFieldError(category.column()))
        })
        .collect()
}
