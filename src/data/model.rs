use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::UnknownMetric;

// ---------------------------------------------------------------------------
// Canonical column names
// ---------------------------------------------------------------------------

/// Column names the engine works with after the loader has applied the
/// [`ColumnMap`](super::schema::ColumnMap).
pub mod columns {
    pub const COMPANY_ID: &str = "company_id";
    pub const COMPANY_NAME: &str = "company_name";
    pub const YEAR: &str = "year";
    pub const DIGITAL_TRANSFORMATION_INDEX: &str = "digital_transformation_index";
    pub const TECHNOLOGY_DIMENSION: &str = "technology_dimension";
    pub const APPLICATION_DIMENSION: &str = "application_dimension";
    pub const AI_FREQUENCY: &str = "ai_frequency";
    pub const BIG_DATA_FREQUENCY: &str = "big_data_frequency";
    pub const CLOUD_COMPUTING_FREQUENCY: &str = "cloud_computing_frequency";
    pub const BLOCKCHAIN_FREQUENCY: &str = "blockchain_frequency";
    pub const DIGITAL_TECHNOLOGY_FREQUENCY: &str = "digital_technology_frequency";

    /// Every column a well-formed table must carry, in display order.
    pub const REQUIRED: [&str; 11] = [
        COMPANY_ID,
        COMPANY_NAME,
        YEAR,
        DIGITAL_TRANSFORMATION_INDEX,
        TECHNOLOGY_DIMENSION,
        APPLICATION_DIMENSION,
        AI_FREQUENCY,
        BIG_DATA_FREQUENCY,
        CLOUD_COMPUTING_FREQUENCY,
        BLOCKCHAIN_FREQUENCY,
        DIGITAL_TECHNOLOGY_FREQUENCY,
    ];
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a spreadsheet export carries.
/// Kept `Ord` so distinct values can live in a `BTreeSet`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell; `None` for text, booleans and nulls.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Integer view of the cell. Floats qualify only when they carry no
    /// fractional part (spreadsheet exports often store years as `2019.0`).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Float(v)
                if v.is_finite()
                    && v.fract() == 0.0
                    && *v >= i64::MIN as f64
                    && *v <= i64::MAX as f64 =>
            {
                Some(*v as i64)
            }
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Table – the dataset as loaded, before validation
// ---------------------------------------------------------------------------

/// One loaded row: canonical column name → value.
pub type Row = BTreeMap<String, CellValue>;

/// The raw, loosely-typed dataset handed over by the loader.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// All rows in source order.
    pub rows: Vec<Row>,
    /// Column names in source order.
    pub column_names: Vec<String>,
}

impl Table {
    /// Build a table from rows, collecting the column set when the source
    /// did not provide a header order (JSON records).
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        for row in &rows {
            for col in row.keys() {
                seen.insert(col.clone());
            }
        }
        Table {
            rows,
            column_names: seen.into_iter().collect(),
        }
    }

    /// Build a table whose column order is known up front (CSV / Parquet).
    pub fn with_columns(column_names: Vec<String>, rows: Vec<Row>) -> Self {
        Table { rows, column_names }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names.iter().any(|c| c == name)
    }
}

// ---------------------------------------------------------------------------
// Keyword categories
// ---------------------------------------------------------------------------

/// Technology categories whose mentions are counted in annual reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    ArtificialIntelligence,
    BigData,
    CloudComputing,
    Blockchain,
    DigitalTechnology,
}

impl KeywordCategory {
    /// Fixed display order.
    pub const ALL: [KeywordCategory; 5] = [
        KeywordCategory::ArtificialIntelligence,
        KeywordCategory::BigData,
        KeywordCategory::CloudComputing,
        KeywordCategory::Blockchain,
        KeywordCategory::DigitalTechnology,
    ];

    pub fn column(self) -> &'static str {
        match self {
            KeywordCategory::ArtificialIntelligence => columns::AI_FREQUENCY,
            KeywordCategory::BigData => columns::BIG_DATA_FREQUENCY,
            KeywordCategory::CloudComputing => columns::CLOUD_COMPUTING_FREQUENCY,
            KeywordCategory::Blockchain => columns::BLOCKCHAIN_FREQUENCY,
            KeywordCategory::DigitalTechnology => columns::DIGITAL_TECHNOLOGY_FREQUENCY,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KeywordCategory::ArtificialIntelligence => "AI",
            KeywordCategory::BigData => "big data",
            KeywordCategory::CloudComputing => "cloud computing",
            KeywordCategory::Blockchain => "blockchain",
            KeywordCategory::DigitalTechnology => "digital technology usage",
        }
    }
}

impl fmt::Display for KeywordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Keyword mention counts of one annual report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeywordCounts {
    pub artificial_intelligence: u64,
    pub big_data: u64,
    pub cloud_computing: u64,
    pub blockchain: u64,
    pub digital_technology: u64,
}

impl KeywordCounts {
    pub fn get(&self, category: KeywordCategory) -> u64 {
        match category {
            KeywordCategory::ArtificialIntelligence => self.artificial_intelligence,
            KeywordCategory::BigData => self.big_data,
            KeywordCategory::CloudComputing => self.cloud_computing,
            KeywordCategory::Blockchain => self.blockchain,
            KeywordCategory::DigitalTechnology => self.digital_technology,
        }
    }

    pub fn set(&mut self, category: KeywordCategory, count: u64) {
        let slot = match category {
            KeywordCategory::ArtificialIntelligence => &mut self.artificial_intelligence,
            KeywordCategory::BigData => &mut self.big_data,
            KeywordCategory::CloudComputing => &mut self.cloud_computing,
            KeywordCategory::Blockchain => &mut self.blockchain,
            KeywordCategory::DigitalTechnology => &mut self.digital_technology,
        };
        *slot = count;
    }

    /// Every category with its count, in [`KeywordCategory::ALL`] order.
    pub fn pairs(&self) -> Vec<(KeywordCategory, u64)> {
        KeywordCategory::ALL
            .into_iter()
            .map(|category| (category, self.get(category)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Record – one company-year observation
// ---------------------------------------------------------------------------

/// A validated company-year row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub company_id: String,
    pub company_name: String,
    pub year: i32,
    pub digital_transformation_index: f64,
    pub technology_dimension: f64,
    pub application_dimension: f64,
    pub keywords: KeywordCounts,
}

// ---------------------------------------------------------------------------
// Metric – a numeric attribute that can be summarized
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    DigitalTransformationIndex,
    TechnologyDimension,
    ApplicationDimension,
    Keyword(KeywordCategory),
}

impl Metric {
    /// Metrics drawn as time series on the trend chart.
    pub const TRACKED: [Metric; 3] = [
        Metric::DigitalTransformationIndex,
        Metric::TechnologyDimension,
        Metric::ApplicationDimension,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Metric::DigitalTransformationIndex => columns::DIGITAL_TRANSFORMATION_INDEX,
            Metric::TechnologyDimension => columns::TECHNOLOGY_DIMENSION,
            Metric::ApplicationDimension => columns::APPLICATION_DIMENSION,
            Metric::Keyword(category) => category.column(),
        }
    }

    /// Read this metric off a record.
    pub fn value(self, record: &Record) -> f64 {
        match self {
            Metric::DigitalTransformationIndex => record.digital_transformation_index,
            Metric::TechnologyDimension => record.technology_dimension,
            Metric::ApplicationDimension => record.application_dimension,
            Metric::Keyword(category) => record.keywords.get(category) as f64,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let metric = match s {
            columns::DIGITAL_TRANSFORMATION_INDEX => Metric::DigitalTransformationIndex,
            columns::TECHNOLOGY_DIMENSION => Metric::TechnologyDimension,
            columns::APPLICATION_DIMENSION => Metric::ApplicationDimension,
            other => KeywordCategory::ALL
                .into_iter()
                .find(|c| c.column() == other)
                .map(Metric::Keyword)
                .ok_or_else(|| UnknownMetric(other.to_string()))?,
        };
        Ok(metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_pairs_follow_category_order() {
        let mut counts = KeywordCounts::default();
        counts.set(KeywordCategory::BigData, 7);
        counts.set(KeywordCategory::DigitalTechnology, 11);
        assert_eq!(
            counts.pairs(),
            vec![
                (KeywordCategory::ArtificialIntelligence, 0),
                (KeywordCategory::BigData, 7),
                (KeywordCategory::CloudComputing, 0),
                (KeywordCategory::Blockchain, 0),
                (KeywordCategory::DigitalTechnology, 11),
            ]
        );
    }

    #[test]
    fn cell_integer_view_accepts_integral_floats() {
        assert_eq!(CellValue::Float(2019.0).as_i64(), Some(2019));
        assert_eq!(CellValue::Float(2019.5).as_i64(), None);
        assert_eq!(CellValue::Float(f64::NAN).as_i64(), None);
        assert_eq!(CellValue::String("2019".into()).as_i64(), None);
    }

    #[test]
    fn cell_ordering_groups_by_type() {
        let mut values = vec![
            CellValue::String("b".into()),
            CellValue::Integer(3),
            CellValue::Null,
            CellValue::Integer(1),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                CellValue::Null,
                CellValue::Integer(1),
                CellValue::Integer(3),
                CellValue::String("b".into()),
            ]
        );
    }

    #[test]
    fn metric_parses_from_column_name() {
        assert_eq!(
            "technology_dimension".parse::<Metric>(),
            Ok(Metric::TechnologyDimension)
        );
        assert_eq!(
            "blockchain_frequency".parse::<Metric>(),
            Ok(Metric::Keyword(KeywordCategory::Blockchain))
        );
        assert_eq!(
            "company_name".parse::<Metric>(),
            Err(UnknownMetric("company_name".into()))
        );
    }

    #[test]
    fn table_from_rows_collects_columns() {
        let mut a = Row::new();
        a.insert("year".into(), CellValue::Integer(2018));
        let mut b = Row::new();
        b.insert("company_id".into(), CellValue::String("A".into()));
        let table = Table::from_rows(vec![a, b]);
        assert_eq!(table.column_names, vec!["company_id", "year"]);
        assert!(table.has_column("year"));
        assert_eq!(table.len(), 2);
    }
}
