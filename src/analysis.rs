// Summary and suggestions computed together, optionally off the caller's thread

use crate::advisor;
use crate::chart::ChartSpec;
use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::stats::{self, StatsSummary};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: StatsSummary,
    pub suggestions: Vec<ChartSpec>,
}

pub fn analyze(dataset: &Dataset) -> Analysis {
    analyze_with_config(dataset, &AnalysisConfig::default())
}

pub fn analyze_with_config(dataset: &Dataset, config: &AnalysisConfig) -> Analysis {
    Analysis {
        summary: stats::summarize_with_config(dataset, config),
        suggestions: advisor::suggest_with_config(dataset, config),
    }
}

/// Run the analysis on a worker thread. The work always runs to completion;
/// a caller that no longer needs it can drop the handle.
pub fn analyze_in_background(dataset: Arc<Dataset>) -> JoinHandle<Analysis> {
    analyze_in_background_with_config(dataset, AnalysisConfig::default())
}

pub fn analyze_in_background_with_config(
    dataset: Arc<Dataset>,
    config: AnalysisConfig,
) -> JoinHandle<Analysis> {
    debug!(records = dataset.len(), "starting background analysis");
    thread::spawn(move || analyze_with_config(&dataset, &config))
}
