// PNG rendering of chart series with plotters

use crate::chart::ChartKind;
use crate::palette::{parse_color, ColorPalette};
use crate::transform::{ChartSeries, Point};
use anyhow::{bail, Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

pub const DEFAULT_BINS: usize = 10;

pub struct GraphConfig {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
    /// Bin count for histograms
    pub bins: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig {
            title: None,
            x_label: String::new(),
            y_label: String::new(),
            width: 800,
            height: 600,
            bins: DEFAULT_BINS,
        }
    }
}

/// One histogram bin, `[start, end)` except the last which also holds the max.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    pub fn label(&self) -> String {
        format!("{:.1}-{:.1}", self.start, self.end)
    }
}

/// Split values into `bins` equal-width bins between their min and max.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() {
        return Vec::new();
    }
    let bins = bins.max(1);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;

    let mut result: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &value in values {
        // The max lands in the last bin; this also covers a zero width
        let index = if value == max {
            bins - 1
        } else {
            ((value - min) / width).floor() as usize
        };
        if let Some(bin) = result.get_mut(index) {
            bin.count += 1;
        }
    }

    result
}

/// Draw a chart series to PNG bytes.
pub fn render_series(
    series: &ChartSeries,
    kind: &ChartKind,
    config: &GraphConfig,
) -> Result<Vec<u8>> {
    match series {
        ChartSeries::Table { .. } => bail!("Table charts cannot be rendered as an image"),
        ChartSeries::Values { values } => {
            let bins = histogram_bins(values, config.bins);
            if bins.is_empty() {
                bail!("Cannot create graph with no data points");
            }
            let labels = bins.iter().map(Bin::label).collect();
            let heights = bins.iter().map(|b| b.count as f64).collect();
            let color = ColorPalette::base().get_color(0);
            let colors = vec![color; bins.len()];
            draw_png(config, |root| draw_bars(root, config, labels, heights, &colors))
        }
        ChartSeries::Labeled { labels, datasets } => {
            let Some(data) = datasets.first().filter(|d| !d.values.is_empty()) else {
                bail!("Cannot create graph with no data points");
            };
            if *kind == ChartKind::Line {
                let color = data
                    .border_color
                    .clone()
                    .unwrap_or_else(|| ColorPalette::base().get_color(0));
                draw_png(config, |root| draw_line(root, config, labels, &data.values, &color))
            } else {
                draw_png(config, |root| {
                    draw_bars(
                        root,
                        config,
                        labels.clone(),
                        data.values.clone(),
                        &data.background_colors,
                    )
                })
            }
        }
        ChartSeries::Points { points, color, .. } => {
            if points.is_empty() {
                bail!("Cannot create graph with no data points");
            }
            draw_png(config, |root| draw_points(root, config, points, color))
        }
    }
}

/// Render into an RGB buffer, then encode it as PNG.
fn draw_png<F>(config: &GraphConfig, draw: F) -> Result<Vec<u8>>
where
    F: FnOnce(&DrawingArea<BitMapBackend, Shift>) -> Result<()>,
{
    let mut buffer = vec![0u8; (config.width * config.height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (config.width, config.height))
            .into_drawing_area();

        root.fill(&WHITE).context("Failed to fill background")?;
        draw(&root)?;
        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, config.width, config.height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

fn draw_bars(
    root: &DrawingArea<BitMapBackend, Shift>,
    config: &GraphConfig,
    labels: Vec<String>,
    heights: Vec<f64>,
    colors: &[String],
) -> Result<()> {
    let n = heights.len();
    let x_range = -0.5..(n as f64 - 0.5);
    let y_min = heights.iter().copied().fold(0.0, f64::min);
    let y_max = heights.iter().copied().fold(0.0, f64::max);
    let y_range = padded_range(y_min, y_max);

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(config.title.as_deref().unwrap_or(""), ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .context("Failed to build chart")?;

    let category_label = |x: &f64| category_at(&labels, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&category_label)
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .draw()
        .context("Failed to draw mesh")?;

    chart
        .draw_series(heights.iter().enumerate().map(|(i, &h)| {
            let x = i as f64;
            let color = colors.get(i).map(|c| to_rgba(c)).unwrap_or_else(|| BLUE.mix(0.8));
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, h)], color.filled())
        }))
        .context("Failed to draw bar series")?;

    Ok(())
}

fn draw_line(
    root: &DrawingArea<BitMapBackend, Shift>,
    config: &GraphConfig,
    labels: &[String],
    values: &[f64],
    color: &str,
) -> Result<()> {
    let n = values.len();
    let x_range = -0.5..(n as f64 - 0.5);
    let y_min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let y_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(config.title.as_deref().unwrap_or(""), ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, padded_range(y_min, y_max))
        .context("Failed to build chart")?;

    let category_label = |x: &f64| category_at(labels, *x);
    chart
        .configure_mesh()
        .x_labels(n)
        .x_label_formatter(&category_label)
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .draw()
        .context("Failed to draw mesh")?;

    let points: Vec<(f64, f64)> = values.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect();
    let color = to_rgba(color);

    chart
        .draw_series(LineSeries::new(points.clone(), &color))
        .context("Failed to draw line series")?;
    chart
        .draw_series(points.into_iter().map(|p| Circle::new(p, 3, color.filled())))
        .context("Failed to draw line markers")?;

    Ok(())
}

fn draw_points(
    root: &DrawingArea<BitMapBackend, Shift>,
    config: &GraphConfig,
    points: &[Point],
    color: &str,
) -> Result<()> {
    let x_min = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let x_max = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let y_min = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let y_max = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(config.title.as_deref().unwrap_or(""), ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(padded_range(x_min, x_max), padded_range(y_min, y_max))
        .context("Failed to build chart")?;

    chart
        .configure_mesh()
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .draw()
        .context("Failed to draw mesh")?;

    let color = to_rgba(color);
    chart
        .draw_series(points.iter().map(|p| Circle::new((p.x, p.y), 4, color.filled())))
        .context("Failed to draw point series")?;

    Ok(())
}

/// 5% padding on each side; a flat range is widened by 1.
fn padded_range(min: f64, max: f64) -> Range<f64> {
    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}

fn category_at(labels: &[String], x: f64) -> String {
    let rounded = x.round();
    if rounded < 0.0 || (x - rounded).abs() > 1e-6 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

fn to_rgba(color: &str) -> RGBAColor {
    match parse_color(color) {
        Some((r, g, b, a)) => RGBColor(r, g, b).mix(a),
        None => BLUE.mix(0.8),
    }
}
