// Descriptive statistics over a whole dataset

use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::infer::{self, ColumnKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Summary of a numeric column. All fields are 0 when the column has no
/// valid value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation (denominator = count)
    pub std_dev: f64,
    /// Number of values the statistics were computed from
    pub count: usize,
}

impl NumericStats {
    /// Compute statistics from values sorted ascending.
    pub fn from_sorted(values: &[f64]) -> Self {
        let (Some(&min), Some(&max)) = (values.first(), values.last()) else {
            return NumericStats::default();
        };

        let count = values.len();
        let n = count as f64;
        let sum = values.iter().sum::<f64>();
        let mean = if sum.is_finite() {
            sum / n
        } else {
            running_mean(values)
        }
        .max(min)
        .min(max);

        let mid = count / 2;
        let median = if count % 2 == 0 {
            midpoint(values[mid - 1], values[mid])
        } else {
            values[mid]
        };

        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = if variance.is_finite() {
            variance.sqrt()
        } else {
            scaled_std_dev(values, mean, min.abs().max(max.abs()))
        };

        NumericStats {
            min,
            max,
            mean,
            median,
            std_dev,
            count,
        }
    }
}

/// Incremental mean for values whose plain sum overflows.
fn running_mean(values: &[f64]) -> f64 {
    values.iter().enumerate().fold(0.0, |mean, (i, &v)| {
        let k = (i + 1) as f64;
        mean + (v / k - mean / k)
    })
}

fn midpoint(a: f64, b: f64) -> f64 {
    let sum = a + b;
    if sum.is_finite() {
        sum / 2.0
    } else {
        a + (b / 2.0 - a / 2.0)
    }
}

/// Standard deviation computed on values divided by `scale`, so squared
/// deviations stay finite near `f64::MAX`.
fn scaled_std_dev(values: &[f64], mean: f64, scale: f64) -> f64 {
    if scale == 0.0 {
        return 0.0;
    }
    let scaled_mean = mean / scale;
    let variance = values
        .iter()
        .map(|v| (v / scale - scaled_mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    (scale * variance.sqrt()).min(max_spread(values))
}

/// Population std dev never exceeds half the range.
fn max_spread(values: &[f64]) -> f64 {
    match (values.first(), values.last()) {
        (Some(&lo), Some(&hi)) => hi / 2.0 - lo / 2.0,
        _ => 0.0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalStats {
    pub unique_values: usize,
    /// Number of non-missing values
    pub count: usize,
    /// Most frequent values, highest count first, ties in discovery order
    pub most_common: Vec<ValueCount>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    /// Total record count
    pub count: usize,
    pub numeric: IndexMap<String, NumericStats>,
    pub categorical: IndexMap<String, CategoricalStats>,
    pub missing_values: IndexMap<String, usize>,
}

impl StatsSummary {
    /// Share of missing values in a column, as a percentage.
    pub fn missing_percentage(&self, column: &str) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let missing = self.missing_values.get(column).copied().unwrap_or(0);
        missing as f64 / self.count as f64 * 100.0
    }

    /// Non-missing values counted for a column.
    pub fn valid_count(&self, column: &str) -> usize {
        if let Some(stats) = self.numeric.get(column) {
            stats.count
        } else if let Some(stats) = self.categorical.get(column) {
            stats.count
        } else {
            0
        }
    }
}

/// Summarize a dataset with the default configuration.
pub fn summarize(dataset: &Dataset) -> StatsSummary {
    summarize_with_config(dataset, &AnalysisConfig::default())
}

pub fn summarize_with_config(dataset: &Dataset, config: &AnalysisConfig) -> StatsSummary {
    let mut summary = StatsSummary {
        count: dataset.len(),
        ..Default::default()
    };

    for column in &dataset.columns {
        summary.missing_values.insert(column.clone(), 0);
    }

    for column in &dataset.columns {
        let kind = infer::classify(column, dataset, config.summary_sample_size);
        debug!(column = %column, ?kind, "classified column");

        match kind {
            ColumnKind::Numeric => {
                let (stats, missing) = numeric_column(dataset, column);
                summary.numeric.insert(column.clone(), stats);
                *summary.missing_values.entry(column.clone()).or_insert(0) += missing;
            }
            ColumnKind::Categorical => {
                let (stats, missing) = categorical_column(dataset, column, config.top_values);
                summary.categorical.insert(column.clone(), stats);
                *summary.missing_values.entry(column.clone()).or_insert(0) += missing;
            }
        }
    }

    info!(
        records = summary.count,
        numeric = summary.numeric.len(),
        categorical = summary.categorical.len(),
        "summarized dataset"
    );
    summary
}

/// Full scan of a numeric column. Values that do not coerce to a number are
/// counted as missing.
fn numeric_column(dataset: &Dataset, column: &str) -> (NumericStats, usize) {
    let mut values = dataset.numeric_values(column);
    let missing = dataset.len() - values.len();

    values.sort_by(f64::total_cmp);
    (NumericStats::from_sorted(&values), missing)
}

/// Full scan of a categorical column.
fn categorical_column(
    dataset: &Dataset,
    column: &str,
    top_values: usize,
) -> (CategoricalStats, usize) {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    let mut missing = 0;

    for value in dataset.column_values(column) {
        if value.is_missing() {
            missing += 1;
            continue;
        }
        *counts.entry(value.to_label()).or_insert(0) += 1;
    }

    let unique_values = counts.len();
    let count = counts.values().sum();
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    // Stable: equal counts stay in discovery order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let most_common = ranked
        .into_iter()
        .take(top_values)
        .map(|(value, count)| ValueCount { value, count })
        .collect();

    (
        CategoricalStats {
            unique_values,
            count,
            most_common,
        },
        missing,
    )
}
