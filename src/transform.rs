// Filtering, grouping and aggregation of a dataset into chart series

use crate::chart::{AggregateFn, ChartKind, ChartSpec, Filter, FilterOp};
use crate::config::AnalysisConfig;
use crate::dataset::{cell, Dataset, Record};
use crate::palette::ColorPalette;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Chart-ready data derived from a dataset and a spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum ChartSeries {
    /// Filtered records, verbatim, capped for rendering
    Table { rows: Vec<Record> },
    /// Raw numeric values; binning is left to the renderer
    Values { values: Vec<f64> },
    /// One value per label, for bar/line/pie-like charts
    Labeled {
        labels: Vec<String>,
        datasets: Vec<SeriesData>,
    },
    /// x/y pairs for scatter charts
    Points {
        label: String,
        points: Vec<Point>,
        color: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub values: Vec<f64>,
    /// One color per label
    pub background_colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    pub border_width: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl ChartSeries {
    /// The series returned when a spec cannot be shaped into anything.
    pub fn empty() -> Self {
        ChartSeries::Labeled {
            labels: Vec::new(),
            datasets: vec![SeriesData {
                label: Some("No data".to_string()),
                values: Vec::new(),
                background_colors: Vec::new(),
                border_color: None,
                border_width: 1,
            }],
        }
    }
}

/// Main entry point: filter, group and aggregate a dataset for one chart spec.
pub fn transform(dataset: &Dataset, spec: &ChartSpec) -> ChartSeries {
    transform_with_config(dataset, spec, &AnalysisConfig::default())
}

pub fn transform_with_config(
    dataset: &Dataset,
    spec: &ChartSpec,
    config: &AnalysisConfig,
) -> ChartSeries {
    // 1. Filter
    let rows = filter_records(dataset, &spec.filters);
    debug!(
        chart = %spec.kind,
        total = dataset.len(),
        kept = rows.len(),
        "filtered records"
    );

    // 2. Shape by chart kind
    if spec.kind == ChartKind::Table {
        return ChartSeries::Table {
            rows: rows.into_iter().take(config.table_row_limit).cloned().collect(),
        };
    }

    if spec.kind == ChartKind::Histogram {
        if let Some(x) = &spec.x_axis {
            let values = rows.iter().filter_map(|r| cell(r, x).as_number()).collect();
            return ChartSeries::Values { values };
        }
    }

    if let Some(group_col) = &spec.group_by {
        return grouped_series(&rows, group_col, spec);
    }

    if let (Some(x), Some(y)) = (&spec.x_axis, &spec.y_axis) {
        if spec.kind == ChartKind::Scatter {
            return scatter_series(&rows, x, y, spec);
        }
        return category_series(&rows, x, y, spec);
    }

    if matches!(spec.kind, ChartKind::Pie | ChartKind::Doughnut) {
        if let Some(first) = dataset.columns.first() {
            return value_count_series(&rows, first);
        }
    }

    debug!(chart = %spec.kind, "nothing to shape, returning empty series");
    ChartSeries::empty()
}

/// Keep records that satisfy every filter.
pub fn filter_records<'a>(dataset: &'a Dataset, filters: &[Filter]) -> Vec<&'a Record> {
    for filter in filters {
        if let FilterOp::Other(op) = &filter.operation {
            debug!(
                operator = %op,
                column = %filter.column,
                "unknown filter operator passes every record"
            );
        }
    }

    dataset
        .records
        .iter()
        .filter(|record| filters.iter().all(|f| matches_filter(record, f)))
        .collect()
}

fn matches_filter(record: &Record, filter: &Filter) -> bool {
    let value = cell(record, &filter.column);
    match &filter.operation {
        FilterOp::Equals => value == &filter.value,
        FilterOp::NotEquals => value != &filter.value,
        FilterOp::GreaterThan => compare_numbers(value, &filter.value, |a, b| a > b),
        FilterOp::LessThan => compare_numbers(value, &filter.value, |a, b| a < b),
        FilterOp::Contains => value
            .to_label()
            .to_lowercase()
            .contains(&filter.value.to_label().to_lowercase()),
        FilterOp::Other(_) => true,
    }
}

/// A side that does not coerce to a number fails the comparison.
fn compare_numbers(value: &Value, operand: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (value.as_number(), operand.as_number()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// Reduce a group to one number.
///
/// `values` already has missing entries read as 0, so `Min` can report 0 for
/// a group whose only real values are positive.
pub fn aggregate(function: AggregateFn, values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    match function {
        AggregateFn::Sum => values.iter().sum(),
        AggregateFn::Average => values.iter().sum::<f64>() / values.len() as f64,
        AggregateFn::Count => values.len() as f64,
        AggregateFn::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        AggregateFn::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Partition records by a column's label, first occurrence first.
fn partition<'a>(rows: &[&'a Record], column: &str) -> IndexMap<String, Vec<&'a Record>> {
    let mut groups: IndexMap<String, Vec<&Record>> = IndexMap::new();
    for row in rows {
        groups.entry(cell(row, column).to_label()).or_default().push(*row);
    }
    groups
}

fn grouped_series(rows: &[&Record], group_col: &str, spec: &ChartSpec) -> ChartSeries {
    let groups = partition(rows, group_col);

    let mut labels = Vec::with_capacity(groups.len());
    let mut values = Vec::with_capacity(groups.len());
    for (label, group_rows) in groups {
        let value = match &spec.aggregation {
            Some(agg) => {
                let numbers: Vec<f64> = group_rows
                    .iter()
                    .map(|r| cell(r, &agg.column).as_number_or_zero())
                    .collect();
                aggregate(agg.function, &numbers)
            }
            None => group_rows.len() as f64,
        };
        labels.push(label);
        values.push(value);
    }

    labeled(labels, values, Some(spec.title.clone()), &spec.kind)
}

fn category_series(rows: &[&Record], x: &str, y: &str, spec: &ChartSpec) -> ChartSeries {
    let function = spec
        .aggregation
        .as_ref()
        .map(|agg| agg.function)
        .unwrap_or(AggregateFn::Sum);

    let mut categories: IndexMap<String, Vec<f64>> = IndexMap::new();
    for row in rows {
        categories
            .entry(cell(row, x).to_label())
            .or_default()
            .push(cell(row, y).as_number_or_zero());
    }

    let (labels, values) = categories
        .into_iter()
        .map(|(label, ys)| (label, aggregate(function, &ys)))
        .unzip();

    labeled(labels, values, Some(y.to_string()), &spec.kind)
}

fn scatter_series(rows: &[&Record], x: &str, y: &str, spec: &ChartSpec) -> ChartSeries {
    let points = rows
        .iter()
        .map(|r| Point {
            x: cell(r, x).as_number_or_zero(),
            y: cell(r, y).as_number_or_zero(),
        })
        .collect();

    ChartSeries::Points {
        label: spec.title.clone(),
        points,
        color: ColorPalette::base().get_color(0),
    }
}

fn value_count_series(rows: &[&Record], column: &str) -> ChartSeries {
    let (labels, values) = partition(rows, column)
        .into_iter()
        .map(|(label, group)| (label, group.len() as f64))
        .unzip();

    labeled(labels, values, None, &ChartKind::Pie)
}

fn labeled(
    labels: Vec<String>,
    values: Vec<f64>,
    label: Option<String>,
    kind: &ChartKind,
) -> ChartSeries {
    let palette = ColorPalette::base();
    let border_color = (*kind == ChartKind::Line).then(|| palette.get_color(0));
    let background_colors = palette.colors(labels.len());

    ChartSeries::Labeled {
        labels,
        datasets: vec![SeriesData {
            label,
            values,
            background_colors,
            border_color,
            border_width: 1,
        }],
    }
}
