// Tunable limits for inference, summaries, suggestions and ingestion

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest upload accepted by the ingestor (500 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Records sampled when classifying columns for the summary
    pub summary_sample_size: usize,
    /// Records sampled when classifying columns for chart suggestions
    pub advisor_sample_size: usize,
    /// Number of most frequent values kept per categorical column
    pub top_values: usize,
    /// A trend (line) chart is suggested only above this many records
    pub trend_min_rows: usize,
    /// Rows returned for a table chart
    pub table_row_limit: usize,
    pub max_upload_bytes: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            summary_sample_size: 10,
            advisor_sample_size: 20,
            top_values: 5,
            trend_min_rows: 5,
            table_row_limit: 100,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AnalysisConfig {
    /// Load a JSON config file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }
}
