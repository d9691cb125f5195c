use serde::Serialize;

use crate::data::model::{Metric, Record};

// ---------------------------------------------------------------------------
// Series – trend chart input
// ---------------------------------------------------------------------------

/// Parallel per-metric sequences aligned with `years`: index `i` of every
/// vector refers to the same record.
///
/// Missing years stay missing; nothing is interpolated or zero-filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub years: Vec<i32>,
    pub digital_transformation_index: Vec<f64>,
    pub technology_dimension: Vec<f64>,
    pub application_dimension: Vec<f64>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Sequence of one tracked metric; `None` for metrics not charted.
    pub fn values(&self, metric: Metric) -> Option<&[f64]> {
        match metric {
            Metric::DigitalTransformationIndex => Some(&self.digital_transformation_index),
            Metric::TechnologyDimension => Some(&self.technology_dimension),
            Metric::ApplicationDimension => Some(&self.application_dimension),
            Metric::Keyword(_) => None,
        }
    }

    /// (year, value) points of one tracked metric.
    pub fn points(&self, metric: Metric) -> Vec<(i32, f64)> {
        self.values(metric)
            .map(|vals| self.years.iter().copied().zip(vals.iter().copied()).collect())
            .unwrap_or_default()
    }
}

/// Shape a year-ascending company history into chart series.
pub fn build_series<'a, I>(history: I) -> Series
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut series = Series::default();
    for record in history {
        series.years.push(record.year);
        series
            .digital_transformation_index
            .push(record.digital_transformation_index);
        series.technology_dimension.push(record.technology_dimension);
        series.application_dimension.push(record.application_dimension);
    }
    series
}

// ---------------------------------------------------------------------------
// Technology vs application scatter
// ---------------------------------------------------------------------------

/// One dot of the technology-vs-application scatter, with hover data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub technology_dimension: f64,
    pub application_dimension: f64,
    pub digital_transformation_index: f64,
    pub company_id: String,
    pub company_name: String,
    pub year: i32,
}

pub fn dimension_scatter<'a, I>(records: I) -> Vec<ScatterPoint>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .map(|r| ScatterPoint {
            technology_dimension: r.technology_dimension,
            application_dimension: r.application_dimension,
            digital_transformation_index: r.digital_transformation_index,
            company_id: r.company_id.clone(),
            company_name: r.company_name.clone(),
            year: r.year,
        })
        .collect()
}
