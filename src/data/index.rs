use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::MalformedDatasetError;

use super::model::{columns, CellValue, KeywordCategory, KeywordCounts, Record, Row, Table};

// ---------------------------------------------------------------------------
// Index – validated records plus company / year lookups
// ---------------------------------------------------------------------------

/// Read-only lookup structure over the dataset.
///
/// Built once per session by [`Index::build`] and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Index {
    /// Validated records in source order.
    records: Vec<Record>,
    /// company_id → positions into `records`, ascending by year.
    by_company: HashMap<String, Vec<usize>>,
    /// (company_id, year) → position into `records`.
    by_key: HashMap<(String, i32), usize>,
    company_ids: Vec<String>,
    years: Vec<i32>,
}

impl Index {
    /// Validate `table` into typed records and build the lookups.
    ///
    /// Fails on the first structural problem: a required column missing from
    /// the table, an empty or mistyped cell, or a repeated (company, year).
    pub fn build(table: &Table) -> Result<Self, MalformedDatasetError> {
        for required in columns::REQUIRED {
            if !table.has_column(required) {
                return Err(MalformedDatasetError::MissingColumn(required.to_string()));
            }
        }

        let records = table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| parse_record(i, row))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_records(records)
    }

    /// Index records that are already typed.
    pub fn from_records(records: Vec<Record>) -> Result<Self, MalformedDatasetError> {
        let mut by_company: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_key: HashMap<(String, i32), usize> = HashMap::new();
        let mut company_ids: BTreeSet<String> = BTreeSet::new();
        let mut years: BTreeSet<i32> = BTreeSet::new();

        for (pos, record) in records.iter().enumerate() {
            let key = (record.company_id.clone(), record.year);
            if by_key.insert(key, pos).is_some() {
                return Err(MalformedDatasetError::DuplicateKey {
                    company_id: record.company_id.clone(),
                    year: record.year,
                });
            }
            by_company
                .entry(record.company_id.clone())
                .or_default()
                .push(pos);
            company_ids.insert(record.company_id.clone());
            years.insert(record.year);
        }

        for positions in by_company.values_mut() {
            positions.sort_by_key(|&pos| records[pos].year);
        }

        log::debug!(
            "indexed {} records: {} companies, {} distinct years",
            records.len(),
            company_ids.len(),
            years.len()
        );

        Ok(Index {
            records,
            by_company,
            by_key,
            company_ids: company_ids.into_iter().collect(),
            years: years.into_iter().collect(),
        })
    }

    /// All records, in source order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Year-sorted positions of a company's records.
    pub(crate) fn positions(&self, company_id: &str) -> &[usize] {
        self.by_company
            .get(company_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn position(&self, company_id: &str, year: i32) -> Option<usize> {
        self.by_key.get(&(company_id.to_string(), year)).copied()
    }

    pub(crate) fn record_at(&self, pos: usize) -> &Record {
        &self.records[pos]
    }

    pub(crate) fn company_ids(&self) -> &[String] {
        &self.company_ids
    }

    pub(crate) fn years(&self) -> &[i32] {
        &self.years
    }
}

// ---------------------------------------------------------------------------
// Row → Record
// ---------------------------------------------------------------------------

fn parse_record(row_no: usize, row: &Row) -> Result<Record, MalformedDatasetError> {
    let mut keywords = KeywordCounts::default();
    for category in KeywordCategory::ALL {
        keywords.set(category, count_cell(row_no, row, category.column())?);
    }

    Ok(Record {
        company_id: id_cell(row_no, row, columns::COMPANY_ID)?,
        company_name: text_cell(row_no, row, columns::COMPANY_NAME)?,
        year: year_cell(row_no, row, columns::YEAR)?,
        digital_transformation_index: float_cell(
            row_no,
            row,
            columns::DIGITAL_TRANSFORMATION_INDEX,
        )?,
        technology_dimension: float_cell(row_no, row, columns::TECHNOLOGY_DIMENSION)?,
        application_dimension: float_cell(row_no, row, columns::APPLICATION_DIMENSION)?,
        keywords,
    })
}

fn cell<'a>(
    row_no: usize,
    row: &'a Row,
    column: &str,
) -> Result<&'a CellValue, MalformedDatasetError> {
    match row.get(column) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(MalformedDatasetError::MissingValue {
            row: row_no,
            column: column.to_string(),
        }),
    }
}

fn invalid(
    row: usize,
    column: &str,
    expected: &'static str,
    found: &CellValue,
) -> MalformedDatasetError {
    MalformedDatasetError::InvalidValue {
        row,
        column: column.to_string(),
        expected,
        found: found.to_string(),
    }
}

/// Company ids are text; integer ids (stock codes read as numbers) are
/// rendered in decimal.
fn id_cell(row_no: usize, row: &Row, column: &str) -> Result<String, MalformedDatasetError> {
    match cell(row_no, row, column)? {
        CellValue::String(s) => Ok(s.clone()),
        CellValue::Integer(i) => Ok(i.to_string()),
        other => Err(invalid(row_no, column, "an identifier", other)),
    }
}

fn text_cell(row_no: usize, row: &Row, column: &str) -> Result<String, MalformedDatasetError> {
    match cell(row_no, row, column)? {
        CellValue::String(s) => Ok(s.clone()),
        other => Ok(other.to_string()),
    }
}

fn year_cell(row_no: usize, row: &Row, column: &str) -> Result<i32, MalformedDatasetError> {
    let value = cell(row_no, row, column)?;
    value
        .as_i64()
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| invalid(row_no, column, "an integer year", value))
}

fn float_cell(row_no: usize, row: &Row, column: &str) -> Result<f64, MalformedDatasetError> {
    let value = cell(row_no, row, column)?;
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(row_no, column, "a finite number", value))
}

fn count_cell(row_no: usize, row: &Row, column: &str) -> Result<u64, MalformedDatasetError> {
    let value = cell(row_no, row, column)?;
    value
        .as_i64()
        .and_then(|c| u64::try_from(c).ok())
        .ok_or_else(|| invalid(row_no, column, "a non-negative count", value))
}

/// Distinct values per column, as shown in selection controls.
pub fn unique_values(table: &Table) -> BTreeMap<String, BTreeSet<CellValue>> {
    let mut unique: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();
    for row in &table.rows {
        for (col, val) in row {
            unique.entry(col.clone()).or_default().insert(val.clone());
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{row, table};

    #[test]
    fn builds_sorted_company_positions() {
        let t = table(vec![
            row("A", 2019, 20.0),
            row("B", 2018, 50.0),
            row("A", 2018, 10.0),
        ]);
        let index = Index::build(&t).unwrap();
        let years: Vec<i32> = index
            .positions("A")
            .iter()
            .map(|&p| index.record_at(p).year)
            .collect();
        assert_eq!(years, vec![2018, 2019]);
        assert_eq!(index.company_ids(), ["A", "B"]);
        assert_eq!(index.years(), [2018, 2019]);
        assert_eq!(index.position("B", 2018), Some(1));
    }

    #[test]
    fn missing_value_is_malformed() {
        let mut r = row("A", 2018, 10.0);
        r.remove("application_dimension");
        let t = table(vec![row("B", 2018, 1.0), r]);
        assert_eq!(
            Index::build(&t).unwrap_err(),
            MalformedDatasetError::MissingValue {
                row: 1,
                column: "application_dimension".into(),
            }
        );
    }

    #[test]
    fn missing_column_is_malformed() {
        let mut t = table(vec![row("A", 2018, 10.0)]);
        t.column_names.retain(|c| c != "year");
        assert_eq!(
            Index::build(&t).unwrap_err(),
            MalformedDatasetError::MissingColumn("year".into())
        );
    }

    #[test]
    fn non_numeric_metric_is_malformed() {
        let mut r = row("A", 2018, 10.0);
        r.insert(
            "technology_dimension".into(),
            CellValue::String("high".into()),
        );
        let err = Index::build(&table(vec![r])).unwrap_err();
        match err {
            MalformedDatasetError::InvalidValue { column, .. } => {
                assert_eq!(column, "technology_dimension")
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn negative_keyword_count_is_malformed() {
        let mut r = row("A", 2018, 10.0);
        r.insert("blockchain_frequency".into(), CellValue::Integer(-1));
        assert!(Index::build(&table(vec![r])).is_err());
    }

    #[test]
    fn duplicate_company_year_is_malformed() {
        let t = table(vec![row("A", 2018, 10.0), row("A", 2018, 11.0)]);
        assert_eq!(
            Index::build(&t).unwrap_err(),
            MalformedDatasetError::DuplicateKey {
                company_id: "A".into(),
                year: 2018,
            }
        );
    }

    #[test]
    fn float_years_and_integer_ids_are_accepted() {
        let mut r = row("A", 2018, 10.0);
        r.insert("year".into(), CellValue::Float(2020.0));
        r.insert("company_id".into(), CellValue::Integer(600000));
        let index = Index::build(&table(vec![r])).unwrap();
        assert_eq!(index.records()[0].year, 2020);
        assert_eq!(index.records()[0].company_id, "600000");
    }

    #[test]
    fn unique_values_per_column() {
        let t = table(vec![row("A", 2018, 1.0), row("A", 2019, 2.0)]);
        let unique = unique_values(&t);
        assert_eq!(unique["company_id"].len(), 1);
        assert_eq!(unique["year"].len(), 2);
    }
}
