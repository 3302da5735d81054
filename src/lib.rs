// Library exports for autochart

pub mod advisor;
pub mod analysis;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod infer;
pub mod ingest;
pub mod logging;
pub mod palette;
pub mod session;
pub mod stats;
pub mod transform;
pub mod value;

// Entry points consumed by presentation code
pub use advisor::{suggest, suggest_with_config};
pub use stats::{summarize, summarize_with_config};
pub use transform::{transform, transform_with_config};
