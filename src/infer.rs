// Sample-based column type inference

use crate::dataset::Dataset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Tally of a column sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleVotes {
    /// Records inspected: `min(sample_size, len)`
    pub sampled: usize,
    /// Non-missing values that coerce to a number
    pub numeric: usize,
    /// Missing values met in the sample
    pub missing: usize,
}

impl SampleVotes {
    /// Numeric wins only with a strict majority of the whole sample.
    pub fn kind(&self) -> ColumnKind {
        if self.numeric * 2 > self.sampled {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }
}

/// Count numeric votes over the first `sample_size` records of a column.
pub fn sample_votes(column: &str, dataset: &Dataset, sample_size: usize) -> SampleVotes {
    let sampled = sample_size.min(dataset.len());
    let mut votes = SampleVotes {
        sampled,
        ..Default::default()
    };

    for value in dataset.column_values(column).take(sampled) {
        if value.is_missing() {
            votes.missing += 1;
        } else if value.as_number().is_some() {
            votes.numeric += 1;
        }
    }

    votes
}

/// Classify a column from a sample. Cheap by intent: only the first
/// `sample_size` records are read, so a column can be misclassified when
/// its head is unrepresentative.
pub fn classify(column: &str, dataset: &Dataset, sample_size: usize) -> ColumnKind {
    sample_votes(column, dataset, sample_size).kind()
}

/// Classify every column, keeping column order.
pub fn classify_columns(dataset: &Dataset, sample_size: usize) -> Vec<(String, ColumnKind)> {
    dataset
        .columns
        .iter()
        .map(|column| (column.clone(), classify(column, dataset, sample_size)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;
    use crate::value::Value;

    fn single_column(values: Vec<Value>) -> Dataset {
        let records = values
            .into_iter()
            .map(|v| {
                let mut record = Record::new();
                record.insert("col".to_string(), v);
                record
            })
            .collect();
        Dataset::new(vec!["col".to_string()], records)
    }

    #[test]
    fn test_classify_half_numeric_is_categorical() {
        let data = single_column(vec!["1".into(), "2".into(), "x".into(), "y".into()]);
        assert_eq!(classify("col", &data, 4), ColumnKind::Categorical);
    }

    #[test]
    fn test_classify_three_of_four_numeric_strings() {
        let data = single_column(vec!["1".into(), "2".into(), "3".into(), "x".into()]);
        assert_eq!(classify("col", &data, 4), ColumnKind::Numeric);
    }

    #[test]
    fn test_classify_numeric_strings() {
        let data = single_column(vec!["1".into(), "2".into(), "3".into(), "4".into()]);
        assert_eq!(classify("col", &data, 4), ColumnKind::Numeric);
    }

    #[test]
    fn test_classify_native_numbers() {
        let data = single_column(vec![Value::Number(1.0), Value::Number(2.5)]);
        assert_eq!(classify("col", &data, 10), ColumnKind::Numeric);
    }

    #[test]
    fn test_classify_all_missing_is_categorical() {
        let data = single_column(vec![Value::Null, "".into(), Value::Null]);
        assert_eq!(classify("col", &data, 10), ColumnKind::Categorical);
    }

    #[test]
    fn test_classify_empty_dataset_is_categorical() {
        let data = Dataset::new(vec!["col".to_string()], vec![]);
        assert_eq!(classify("col", &data, 10), ColumnKind::Categorical);
    }

    #[test]
    fn test_missing_values_still_count_in_sample_size() {
        // 2 numeric of 4 sampled is not a majority even though both non-missing values are numeric
        let data = single_column(vec![
            Value::Number(1.0),
            Value::Null,
            Value::Number(2.0),
            "".into(),
        ]);
        let votes = sample_votes("col", &data, 10);
        assert_eq!(votes, SampleVotes { sampled: 4, numeric: 2, missing: 2 });
        assert_eq!(votes.kind(), ColumnKind::Categorical);
    }

    #[test]
    fn test_sample_is_limited_to_head() {
        let mut values: Vec<Value> = vec!["a".into(); 10];
        values.extend(vec![Value::Number(1.0); 30]);
        let data = single_column(values);
        assert_eq!(classify("col", &data, 10), ColumnKind::Categorical);
        assert_eq!(classify("col", &data, 40), ColumnKind::Numeric);
    }

    #[test]
    fn test_classify_columns_keeps_order() {
        let mut record = Record::new();
        record.insert("name".to_string(), "a".into());
        record.insert("age".to_string(), Value::Number(3.0));
        let data = Dataset::new(vec!["name".to_string(), "age".to_string()], vec![record]);
        let kinds = classify_columns(&data, 20);
        assert_eq!(
            kinds,
            vec![
                ("name".to_string(), ColumnKind::Categorical),
                ("age".to_string(), ColumnKind::Numeric),
            ]
        );
    }
}
