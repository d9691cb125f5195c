//! Descriptive statistics over record collections.
//!
//! Conventions are fixed here, not left to library defaults:
//! standard deviation is the sample (n − 1) estimator and percentiles
//! interpolate linearly between order statistics at rank `p · (n − 1)`.

use std::fmt;

use serde::Serialize;

use crate::data::index::Index;
use crate::data::model::{Metric, Record};
use crate::data::query;
use crate::error::UnknownMetric;

// ---------------------------------------------------------------------------
// AggregateStatistics
// ---------------------------------------------------------------------------

/// Seven-number summary of one metric. `None` marks a statistic that is
/// unavailable for the input (empty collection, or std-dev of one value).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AggregateStatistics {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub std_dev: Option<f64>,
    pub p25: Option<f64>,
    pub p75: Option<f64>,
}

impl AggregateStatistics {
    /// (label, value) pairs in display order.
    pub fn entries(&self) -> [(&'static str, Option<f64>); 7] {
        [
            ("mean", self.mean),
            ("median", self.median),
            ("max", self.max),
            ("min", self.min),
            ("std dev", self.std_dev),
            ("25th percentile", self.p25),
            ("75th percentile", self.p75),
        ]
    }
}

impl fmt::Display for AggregateStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (label, value)) in self.entries().iter().enumerate() {
            if i > 0 {
                write!(f, "  ")?;
            }
            write!(f, "{label}: {}", fmt_stat(*value))?;
        }
        Ok(())
    }
}

/// Two decimals, or `N/A` when unavailable.
pub fn fmt_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "N/A".to_string(),
    }
}

/// Summarize `metric` over any collection of records.
pub fn summarize<'a, I>(records: I, metric: Metric) -> AggregateStatistics
where
    I: IntoIterator<Item = &'a Record>,
{
    let values: Vec<f64> = records.into_iter().map(|r| metric.value(r)).collect();
    summarize_values(&values)
}

/// Same as [`summarize`], with the metric named by its column.
pub fn summarize_column<'a, I>(
    records: I,
    column: &str,
) -> Result<AggregateStatistics, UnknownMetric>
where
    I: IntoIterator<Item = &'a Record>,
{
    let metric: Metric = column.parse()?;
    Ok(summarize(records, metric))
}

pub fn summarize_values(values: &[f64]) -> AggregateStatistics {
    let n = values.len();
    if n == 0 {
        return AggregateStatistics::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mean = values.iter().sum::<f64>() / n as f64;
    let std_dev = if n > 1 {
        let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        Some((ss / (n - 1) as f64).sqrt())
    } else {
        None
    };

    AggregateStatistics {
        count: n,
        mean: Some(mean),
        median: percentile_sorted(&sorted, 0.50),
        max: sorted.last().copied(),
        min: sorted.first().copied(),
        std_dev,
        p25: percentile_sorted(&sorted, 0.25),
        p75: percentile_sorted(&sorted, 0.75),
    }
}

/// Linear-interpolation percentile of ascending `sorted`, `p` in `[0, 1]`.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }
    let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

// ---------------------------------------------------------------------------
// Overview – headline numbers over the whole dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub record_count: usize,
    pub company_count: usize,
    /// (first, last) year present.
    pub year_range: Option<(i32, i32)>,
    pub mean_index: Option<f64>,
    pub max_index: Option<f64>,
    pub min_index: Option<f64>,
}

impl Overview {
    pub fn compute(index: &Index) -> Self {
        let years = query::distinct_years(index);
        let stats = summarize(index.records(), Metric::DigitalTransformationIndex);
        Overview {
            record_count: index.len(),
            company_count: query::distinct_company_ids(index).len(),
            year_range: years.first().zip(years.last()).map(|(a, b)| (*a, *b)),
            mean_index: stats.mean,
            max_index: stats.max,
            min_index: stats.min,
        }
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Bin count used for the index distribution chart.
pub const DEFAULT_BINS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram of `metric` over `[min, max]`.
///
/// Bins are half-open except the last, which includes `max`. When every
/// value is equal a single bin holds them all.
pub fn histogram<'a, I>(records: I, metric: Metric, bins: usize) -> Vec<HistogramBin>
where
    I: IntoIterator<Item = &'a Record>,
{
    let values: Vec<f64> = records.into_iter().map(|r| metric.value(r)).collect();
    if bins == 0 || values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range == 0.0 {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = range / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &values {
        let slot = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[slot] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{record, scenario_index};

    #[test]
    fn two_value_summary() {
        let records = [record("A", 2018, 10.0), record("A", 2019, 20.0)];
        let s = summarize(&records, Metric::DigitalTransformationIndex);
        assert_eq!(s.count, 2);
        assert_eq!(s.mean, Some(15.0));
        assert_eq!(s.median, Some(15.0));
        assert_eq!(s.max, Some(20.0));
        assert_eq!(s.min, Some(10.0));
        assert!((s.std_dev.unwrap() - 7.0710678).abs() < 1e-6);
        assert_eq!(s.p25, Some(12.5));
        assert_eq!(s.p75, Some(17.5));
    }

    #[test]
    fn empty_summary_is_unavailable() {
        let s = summarize_values(&[]);
        assert_eq!(s.count, 0);
        assert!(s.entries().iter().all(|(_, v)| v.is_none()));
    }

    #[test]
    fn single_value_has_no_std_dev() {
        let s = summarize_values(&[4.5]);
        assert_eq!(s.std_dev, None);
        for (label, value) in s.entries() {
            if label != "std dev" {
                assert_eq!(value, Some(4.5), "{label}");
            }
        }
    }

    #[test]
    fn sample_std_dev_matches_known_value() {
        // population std of this set is 2.0; sample std is sqrt(32/7)
        let s = summarize_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((s.std_dev.unwrap() - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(s.median, Some(4.5));
    }

    #[test]
    fn percentile_interpolates_between_order_statistics() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile_sorted(&sorted, 0.25), Some(1.75));
        assert_eq!(percentile_sorted(&sorted, 0.75), Some(3.25));
        assert_eq!(percentile_sorted(&sorted, 1.0), Some(4.0));
        assert_eq!(percentile_sorted(&[], 0.5), None);
    }

    #[test]
    fn unknown_column_is_rejected() {
        let records = [record("A", 2018, 10.0)];
        assert!(summarize_column(&records, "company_name").is_err());
        let s = summarize_column(&records, "digital_transformation_index").unwrap();
        assert_eq!(s.mean, Some(10.0));
    }

    #[test]
    fn display_marks_unavailable() {
        let text = summarize_values(&[1.0]).to_string();
        assert!(text.contains("std dev: N/A"));
        assert!(text.contains("mean: 1.00"));
    }

    #[test]
    fn overview_of_scenario() {
        let o = Overview::compute(&scenario_index());
        assert_eq!(o.record_count, 3);
        assert_eq!(o.company_count, 2);
        assert_eq!(o.year_range, Some((2018, 2019)));
        assert_eq!(o.max_index, Some(50.0));
        assert_eq!(o.min_index, Some(10.0));
        assert!((o.mean_index.unwrap() - 80.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn overview_of_empty_index() {
        let o = Overview::compute(&Index::default());
        assert_eq!(o.record_count, 0);
        assert_eq!(o.year_range, None);
        assert_eq!(o.mean_index, None);
    }

    #[test]
    fn histogram_counts_every_value() {
        let records: Vec<Record> = (0..10)
            .map(|i| record("A", 2000 + i, i as f64))
            .collect();
        let bins = histogram(&records, Metric::DigitalTransformationIndex, 3);
        assert_eq!(bins.len(), 3);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 10);
        assert_eq!(bins[2].upper, 9.0);
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[2].count, 4);
    }

    #[test]
    fn histogram_degenerate_inputs() {
        let same = [record("A", 2018, 3.0), record("B", 2018, 3.0)];
        let bins = histogram(&same, Metric::DigitalTransformationIndex, DEFAULT_BINS);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
        assert!(histogram(&same, Metric::DigitalTransformationIndex, 0).is_empty());
        assert!(histogram(&Vec::<Record>::new(), Metric::DigitalTransformationIndex, 5).is_empty());
    }

    #[test]
    fn histogram_keeps_tiny_but_distinct_ranges() {
        let tiny = [record("A", 2018, 1e-17), record("B", 2018, 2e-17)];
        let bins = histogram(&tiny, Metric::DigitalTransformationIndex, DEFAULT_BINS);
        assert_eq!(bins.len(), DEFAULT_BINS);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[DEFAULT_BINS - 1].count, 1);
    }
}
