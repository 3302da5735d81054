use autochart::chart::{ChartKind, ChartSpec};
use autochart::dataset::{Dataset, Record};
use autochart::transform::ChartSeries;
use autochart::value::Value;
use autochart::{suggest, summarize, transform};
use proptest::prelude::*;

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1.0e6..1.0e6f64).prop_map(Value::Number),
        prop::num::f64::NORMAL.prop_map(Value::Number),
        "[a-c0-9.]{0,3}".prop_map(Value::Text),
    ]
}

/// Datasets of up to 4 columns and 40 rows; some records lack keys.
fn dataset_strategy() -> impl Strategy<Value = Dataset> {
    (1usize..=4).prop_flat_map(|width| {
        let columns: Vec<String> = (0..width).map(|i| format!("c{}", i)).collect();
        let row = prop::collection::vec(prop::option::weighted(0.9, value_strategy()), width);
        prop::collection::vec(row, 0..40).prop_map(move |rows| {
            let records = rows
                .into_iter()
                .map(|row| {
                    columns
                        .iter()
                        .zip(row)
                        .filter_map(|(c, v)| v.map(|v| (c.clone(), v)))
                        .collect::<Record>()
                })
                .collect();
            Dataset::new(columns.clone(), records)
        })
    })
}

proptest! {
    #[test]
    fn numeric_stats_are_ordered(data in dataset_strategy()) {
        let summary = summarize(&data);
        for stats in summary.numeric.values() {
            prop_assert!(stats.min <= stats.median);
            prop_assert!(stats.median <= stats.max);
            prop_assert!(stats.min <= stats.mean + 1e-6 && stats.mean <= stats.max + 1e-6);
            prop_assert!(stats.std_dev >= 0.0);
            prop_assert!(stats.mean.is_finite());
            prop_assert!(stats.median.is_finite());
            prop_assert!(stats.std_dev.is_finite());
        }
    }

    #[test]
    fn missing_plus_valid_is_record_count(data in dataset_strategy()) {
        let summary = summarize(&data);
        for column in &data.columns {
            let missing = summary.missing_values[column];
            prop_assert_eq!(missing + summary.valid_count(column), data.len());
            prop_assert!(missing <= data.len());
        }
    }

    #[test]
    fn every_column_is_classified_once(data in dataset_strategy()) {
        let summary = summarize(&data);
        for column in &data.columns {
            let numeric = summary.numeric.contains_key(column);
            let categorical = summary.categorical.contains_key(column);
            prop_assert!(numeric != categorical);
        }
    }

    #[test]
    fn most_common_is_sorted_and_bounded(data in dataset_strategy()) {
        let summary = summarize(&data);
        for stats in summary.categorical.values() {
            prop_assert!(stats.most_common.len() <= 5);
            prop_assert!(stats.most_common.len() <= stats.unique_values);
            prop_assert!(stats.most_common.windows(2).all(|w| w[0].count >= w[1].count));
        }
    }

    #[test]
    fn suggestions_end_with_table(data in dataset_strategy()) {
        let specs = suggest(&data);
        prop_assert!(!specs.is_empty());
        prop_assert_eq!(&specs[specs.len() - 1].kind, &ChartKind::Table);
    }

    #[test]
    fn transform_never_panics_on_suggestions(data in dataset_strategy()) {
        for spec in suggest(&data) {
            match transform(&data, &spec) {
                ChartSeries::Labeled { labels, datasets } => {
                    for dataset in datasets {
                        prop_assert_eq!(dataset.values.len(), labels.len());
                        prop_assert_eq!(dataset.background_colors.len(), labels.len());
                    }
                }
                ChartSeries::Table { rows } => prop_assert!(rows.len() <= 100),
                ChartSeries::Values { values } => prop_assert!(values.len() <= data.len()),
                ChartSeries::Points { points, .. } => prop_assert_eq!(points.len(), data.len()),
            }
        }
    }

    #[test]
    fn group_counts_cover_every_record(data in dataset_strategy()) {
        let spec = ChartSpec::new(ChartKind::Bar, "counts").with_group_by("c0");
        if let ChartSeries::Labeled { datasets, .. } = transform(&data, &spec) {
            let total: f64 = datasets[0].values.iter().sum();
            prop_assert_eq!(total as usize, data.len());
        }
    }
}
