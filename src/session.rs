use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::data::index::{unique_values, Index};
use crate::data::loader::load_file;
use crate::data::model::{KeywordCategory, Metric, Record, Table};
use crate::data::query::{self, Selection};
use crate::data::schema::ColumnMap;
use crate::error::MalformedDatasetError;
use crate::series::{build_series, dimension_scatter, ScatterPoint, Series};
use crate::stats::{
    histogram, summarize, AggregateStatistics, HistogramBin, Overview, DEFAULT_BINS,
};

// ---------------------------------------------------------------------------
// Session – dataset and index, loaded once
// ---------------------------------------------------------------------------

/// The loaded table and its index. Immutable for the life of the session;
/// every view is a pure function of the session and a [`Selection`].
pub struct Session {
    table: Table,
    index: Index,
}

impl Session {
    pub fn new(table: Table) -> Result<Self, MalformedDatasetError> {
        let index = Index::build(&table)?;
        Ok(Self { table, index })
    }

    /// Load `path` and index it. `mapping: None` detects the header preset.
    pub fn load(path: &Path, mapping: Option<&ColumnMap>) -> Result<Self> {
        let table = load_file(path, mapping)?;
        Ok(Self::new(table)?)
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Domains for the company / year selection controls.
    pub fn choices(&self) -> Choices<'_> {
        Choices {
            company_ids: query::distinct_company_ids(&self.index),
            years: query::distinct_years(&self.index),
        }
    }

    /// Row count and columns of the loaded table.
    pub fn structure(&self) -> TableStructure {
        let unique = unique_values(&self.table);
        TableStructure {
            row_count: self.table.len(),
            columns: self
                .table
                .column_names
                .iter()
                .map(|name| ColumnInfo {
                    name: name.clone(),
                    distinct_values: unique.get(name).map_or(0, |v| v.len()),
                })
                .collect(),
        }
    }

    /// Dataset-wide charts: index distribution and dimension scatter.
    pub fn distribution(&self) -> Distribution {
        let records = self.index.records();
        Distribution {
            index_histogram: histogram(records, Metric::DigitalTransformationIndex, DEFAULT_BINS),
            dimension_scatter: dimension_scatter(records),
        }
    }

    /// Everything the dashboard shows for one selection.
    pub fn view(&self, selection: &Selection) -> DashboardView {
        let history = query::history(&self.index, &selection.company_id);

        let detail = match selection.year {
            None => Detail::NotRequested,
            Some(year) => match query::point(&self.index, &selection.company_id, year) {
                Some(record) => Detail::Found(PointDetail::from_record(record)),
                None => Detail::Absent,
            },
        };

        DashboardView {
            selection: selection.clone(),
            overview: Overview::compute(&self.index),
            company_name: query::company_name(&self.index, &selection.company_id)
                .map(str::to_string),
            history_statistics: summarize(
                history.iter().copied(),
                Metric::DigitalTransformationIndex,
            ),
            series: build_series(history.iter().copied()),
            detail,
        }
    }
}

// ---------------------------------------------------------------------------
// View types handed to the presentation layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Choices<'a> {
    pub company_ids: &'a [String],
    pub years: &'a [i32],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub distinct_values: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableStructure {
    pub row_count: usize,
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub index_histogram: Vec<HistogramBin>,
    pub dimension_scatter: Vec<ScatterPoint>,
}

/// The selected company-year and its keyword breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointDetail {
    pub record: Record,
    pub frequencies: Vec<(KeywordCategory, u64)>,
}

impl PointDetail {
    fn from_record(record: &Record) -> Self {
        Self {
            record: record.clone(),
            frequencies: record.keywords.pairs(),
        }
    }
}

/// Point detail of a view, by whether a year was selected and found.
///
/// Serializes as `{"status": "not_requested"}`, `{"status": "absent"}` or
/// `{"status": "found", "record": ..., "frequencies": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Detail {
    /// All-years view: no year selected.
    NotRequested,
    /// A year was selected but the company has no record for it.
    Absent,
    Found(PointDetail),
}

impl Detail {
    pub fn found(&self) -> Option<&PointDetail> {
        match self {
            Detail::Found(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Outputs for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selection: Selection,
    pub overview: Overview,
    /// `None` when the company has no records.
    pub company_name: Option<String>,
    /// Statistics of the index over the company's full history.
    pub history_statistics: AggregateStatistics,
    pub series: Series,
    pub detail: Detail,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scenario_table;

    #[test]
    fn view_with_year_has_point_detail() {
        let session = Session::new(scenario_table()).unwrap();
        let view = session.view(&Selection::point("A", 2019));
        assert_eq!(view.company_name.as_deref(), Some("Company A"));
        assert_eq!(view.history_statistics.mean, Some(15.0));
        assert_eq!(view.series.len(), 2);
        let detail = view.detail.found().unwrap();
        assert_eq!(detail.record.year, 2019);
        assert_eq!(detail.frequencies, detail.record.keywords.pairs());
        assert_eq!(detail.frequencies[4], (KeywordCategory::DigitalTechnology, 5));
    }

    #[test]
    fn view_of_absent_point() {
        let session = Session::new(scenario_table()).unwrap();
        let view = session.view(&Selection::point("B", 2019));
        assert_eq!(view.detail, Detail::Absent);
        assert_eq!(view.series.years, vec![2018]);
    }

    #[test]
    fn all_years_view_has_no_detail() {
        let session = Session::new(scenario_table()).unwrap();
        let view = session.view(&Selection::company("A"));
        assert_eq!(view.detail, Detail::NotRequested);
    }

    #[test]
    fn detail_states_serialize_apart() {
        let session = Session::new(scenario_table()).unwrap();
        let status = |selection: Selection| {
            let json = serde_json::to_value(session.view(&selection).detail).unwrap();
            json["status"].clone()
        };
        assert_eq!(status(Selection::company("A")), "not_requested");
        assert_eq!(status(Selection::point("B", 2019)), "absent");
        assert_eq!(status(Selection::point("A", 2018)), "found");

        let view = session.view(&Selection::point("A", 2018));
        let found = serde_json::to_value(view.detail).unwrap();
        assert_eq!(found["record"]["year"], 2018);
    }

    #[test]
    fn unknown_company_view_is_empty_not_an_error() {
        let session = Session::new(scenario_table()).unwrap();
        let view = session.view(&Selection::point("Z", 2018));
        assert_eq!(view.company_name, None);
        assert_eq!(view.history_statistics, AggregateStatistics::default());
        assert!(view.series.is_empty());
        assert_eq!(view.overview.record_count, 3);
    }

    #[test]
    fn views_are_repeatable() {
        let session = Session::new(scenario_table()).unwrap();
        let selection = Selection::point("A", 2018);
        assert_eq!(session.view(&selection), session.view(&selection));
    }

    #[test]
    fn choices_and_structure() {
        let session = Session::new(scenario_table()).unwrap();
        let choices = session.choices();
        assert_eq!(choices.company_ids, ["A", "B"]);
        assert_eq!(choices.years, [2018, 2019]);
        let structure = session.structure();
        assert_eq!(structure.row_count, 3);
        assert_eq!(structure.columns.len(), 11);
        let year_col = structure.columns.iter().find(|c| c.name == "year").unwrap();
        assert_eq!(year_col.distinct_values, 2);
    }

    #[test]
    fn distribution_covers_all_records() {
        let session = Session::new(scenario_table()).unwrap();
        let dist = session.distribution();
        assert_eq!(dist.dimension_scatter.len(), 3);
        assert_eq!(
            dist.index_histogram.iter().map(|b| b.count).sum::<usize>(),
            3
        );
    }
}
