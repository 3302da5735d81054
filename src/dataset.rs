// Normalized tabular data handed to the analysis core

use crate::value::Value;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One row: column name -> value, in the order the keys were read.
pub type Record = IndexMap<String, Value>;

static MISSING: Value = Value::Null;

/// Column names plus the records that carry them.
///
/// Column names are unique and ordered by discovery. A record may lack keys;
/// a lookup of an absent key reads as `Value::Null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Dataset { columns, records }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Value of `column` in the record at `row`, `Null` when absent.
    pub fn value(&self, row: usize, column: &str) -> &Value {
        self.records
            .get(row)
            .map(|record| cell(record, column))
            .unwrap_or(&MISSING)
    }

    /// All values of a column, one per record.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.records.iter().map(move |record| cell(record, column))
    }

    /// Numeric values of a column with missing and unparseable entries dropped.
    pub fn numeric_values(&self, column: &str) -> Vec<f64> {
        self.column_values(column)
            .filter_map(Value::as_number)
            .collect()
    }
}

/// Look up a column in a record, `Null` when the key is absent.
pub fn cell<'a>(record: &'a Record, column: &str) -> &'a Value {
    record.get(column).unwrap_or(&MISSING)
}

/// Encoding an upload was parsed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    /// Match a file name's extension, case-insensitively.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }
}

/// An uploaded file after ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFile {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub format: FileFormat,
    pub dataset: Dataset,
    pub date_added: DateTime<Utc>,
}

impl DataFile {
    pub fn new(name: impl Into<String>, format: FileFormat, dataset: Dataset) -> Self {
        DataFile {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            format,
            dataset,
            date_added: Utc::now(),
        }
    }
}
