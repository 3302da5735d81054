// Chart recommendations from column classification

use crate::chart::{AggregateFn, Aggregation, ChartKind, ChartSpec};
use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::infer::{self, ColumnKind};
use chrono::Utc;
use tracing::{debug, info};

/// Suggest charts for a dataset with the default configuration.
pub fn suggest(dataset: &Dataset) -> Vec<ChartSpec> {
    suggest_with_config(dataset, &AnalysisConfig::default())
}

/// Ordered chart suggestions. A table of the raw data is always the last
/// entry, so the result is never empty.
pub fn suggest_with_config(dataset: &Dataset, config: &AnalysisConfig) -> Vec<ChartSpec> {
    let mut numeric = Vec::new();
    let mut categorical = Vec::new();
    for (column, kind) in infer::classify_columns(dataset, config.advisor_sample_size) {
        match kind {
            ColumnKind::Numeric => numeric.push(column),
            ColumnKind::Categorical => categorical.push(column),
        }
    }
    debug!(?numeric, ?categorical, "partitioned columns");

    let now = Utc::now();
    let spec = |kind: ChartKind, title: String| ChartSpec::created_at(kind, title, now);
    let mut suggestions = Vec::new();

    if let (Some(cat), Some(num)) = (categorical.first(), numeric.first()) {
        suggestions.push(
            spec(ChartKind::Bar, format!("{} by {}", cat, num))
                .with_x_axis(cat)
                .with_y_axis(num),
        );

        if dataset.len() > config.trend_min_rows {
            suggestions.push(
                spec(ChartKind::Line, format!("{} Trend by {}", num, cat))
                    .with_x_axis(cat)
                    .with_y_axis(num),
            );
        }
    }

    if let Some(cat) = categorical.first() {
        let aggregation = match numeric.first() {
            Some(num) => Aggregation::new(AggregateFn::Sum, num),
            None => Aggregation::new(AggregateFn::Count, cat),
        };
        suggestions.push(
            spec(ChartKind::Pie, format!("Distribution of {}", cat))
                .with_x_axis(cat)
                .with_y_axis(aggregation.column.clone())
                .with_aggregation(aggregation),
        );
    }

    if let [first, second, ..] = numeric.as_slice() {
        suggestions.push(
            spec(ChartKind::Scatter, format!("{} vs {}", first, second))
                .with_x_axis(first)
                .with_y_axis(second),
        );
        suggestions.push(
            spec(ChartKind::Histogram, format!("Distribution of {}", first)).with_x_axis(first),
        );
    }

    suggestions.push(spec(ChartKind::Table, "Data Table".to_string()));

    info!(count = suggestions.len(), "suggested charts");
    suggestions
}
