use anyhow::{anyhow, Context, Result};
use autochart::analysis;
use autochart::chart::{ChartKind, ChartSpec};
use autochart::config::AnalysisConfig;
use autochart::dataset::DataFile;
use autochart::graph::{self, GraphConfig, DEFAULT_BINS};
use autochart::ingest;
use autochart::logging;
use autochart::session::Session;
use autochart::{suggest_with_config, summarize_with_config, transform_with_config};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "autochart")]
#[command(about = "Summarize CSV/JSON data and suggest charts for it", long_about = None)]
struct Args {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help = "Increase log verbosity (-v info, -vv debug)"
    )]
    verbose: u8,

    #[arg(long = "config", global = true, help = "JSON file overriding analysis settings")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print descriptive statistics as JSON
    Summary { file: PathBuf },

    /// Print suggested chart specs as JSON
    Suggest { file: PathBuf },

    /// Print statistics and suggestions together
    Analyze { file: PathBuf },

    /// Print the chart-ready series for one chart as JSON
    Chart {
        #[command(flatten)]
        target: ChartTarget,
    },

    /// Draw one chart as PNG to stdout
    Render {
        #[command(flatten)]
        target: ChartTarget,

        #[arg(long = "width", default_value = "800", help = "Output width in pixels")]
        width: u32,

        #[arg(long = "height", default_value = "600", help = "Output height in pixels")]
        height: u32,

        #[arg(long = "bins", default_value_t = DEFAULT_BINS, help = "Histogram bin count")]
        bins: usize,
    },
}

#[derive(clap::Args, Debug)]
struct ChartTarget {
    file: PathBuf,

    #[arg(
        long = "index",
        conflicts_with = "spec",
        help = "Suggested chart to use (0-based, default 0)"
    )]
    index: Option<usize>,

    #[arg(long = "spec", help = "Chart spec JSON file to use instead of a suggestion")]
    spec: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose)?;

    let config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };

    match args.command {
        Command::Summary { file } => {
            let data_file = load(&file, &config)?;
            write_json(&summarize_with_config(&data_file.dataset, &config))
        }
        Command::Suggest { file } => {
            let data_file = load(&file, &config)?;
            write_json(&suggest_with_config(&data_file.dataset, &config))
        }
        Command::Analyze { file } => {
            let data_file = load(&file, &config)?;
            write_json(&analysis::analyze_with_config(&data_file.dataset, &config))
        }
        Command::Chart { target } => {
            let (data_file, spec) = resolve_chart(&target, &config)?;
            write_json(&transform_with_config(&data_file.dataset, &spec, &config))
        }
        Command::Render {
            target,
            width,
            height,
            bins,
        } => {
            let (data_file, spec) = resolve_chart(&target, &config)?;
            let series = transform_with_config(&data_file.dataset, &spec, &config);

            let y_label = match spec.kind {
                ChartKind::Histogram => "count".to_string(),
                _ => spec.y_axis.clone().unwrap_or_default(),
            };
            let graph_config = GraphConfig {
                title: Some(spec.title.clone()),
                x_label: spec.x_axis.clone().unwrap_or_default(),
                y_label,
                width,
                height,
                bins,
            };

            let png_bytes = graph::render_series(&series, &spec.kind, &graph_config)
                .with_context(|| format!("Failed to render chart '{}'", spec.title))?;
            write_bytes(&png_bytes)
        }
    }
}

fn load(path: &Path, config: &AnalysisConfig) -> Result<DataFile> {
    ingest::parse_path_with_config(path, config)
        .with_context(|| format!("Failed to load '{}'", path.display()))
}

/// Load the file and pick the chart: an explicit spec file, or one of the
/// suggestions cached for the file.
fn resolve_chart(target: &ChartTarget, config: &AnalysisConfig) -> Result<(DataFile, ChartSpec)> {
    let data_file = load(&target.file, config)?;

    if let Some(spec_path) = &target.spec {
        let text = std::fs::read_to_string(spec_path)
            .with_context(|| format!("Failed to read chart spec '{}'", spec_path.display()))?;
        let spec: ChartSpec = serde_json::from_str(&text).context("Failed to parse chart spec")?;
        warn_unknown_columns(&data_file, &spec);
        return Ok((data_file, spec));
    }

    let mut session = Session::new();
    let file_id = data_file.id.clone();
    session.add_file(data_file);
    let active = session
        .active_file()
        .ok_or_else(|| anyhow!("No active file after loading '{}'", target.file.display()))?;
    let suggestions = suggest_with_config(&active.dataset, config);
    session.cache_chart_specs(&file_id, suggestions);

    let index = target.index.unwrap_or(0);
    let specs = session.chart_specs(&file_id).unwrap_or_default();
    let spec = specs.get(index).cloned().ok_or_else(|| {
        anyhow!(
            "Chart index {} out of range ({} suggestions available)",
            index,
            specs.len()
        )
    })?;
    info!(index, chart = %spec.kind, title = %spec.title, "selected suggested chart");

    let data_file = session
        .remove_file(&file_id)
        .ok_or_else(|| anyhow!("File '{}' left the session", target.file.display()))?;
    Ok((data_file, spec))
}

/// A spec naming columns the file lacks still transforms; the columns read as null.
fn warn_unknown_columns(data_file: &DataFile, spec: &ChartSpec) {
    let referenced = [&spec.x_axis, &spec.y_axis, &spec.group_by]
        .into_iter()
        .flatten()
        .chain(spec.aggregation.iter().map(|a| &a.column))
        .chain(spec.filters.iter().map(|f| &f.column));

    for column in referenced {
        if !data_file.dataset.has_column(column) {
            warn!(
                column = %column,
                file = %data_file.name,
                "chart spec references an unknown column"
            );
        }
    }
}

fn write_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value).context("Failed to write JSON to stdout")?;
    writeln!(handle).context("Failed to write to stdout")?;
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

fn write_bytes(bytes: &[u8]) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(bytes)
        .context("Failed to write PNG to stdout")?;
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}
