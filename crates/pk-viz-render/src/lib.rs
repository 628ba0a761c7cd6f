//! # pk-viz-render
//!
//! Static rendering of [`pk_viz::ChartSpec`] charts to SVG (and PNG with the
//! `png` feature), themed through a YAML-overridable [`config::VizConfig`].

#![warn(clippy::all)]

pub mod canvas;
pub mod color;
pub mod config;
pub mod header;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;
pub mod theme;

use config::VizConfig;
use pk_viz::{ChartSpec, Page, SlotId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown output format: {0}")]
    UnknownFormat(String),
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Render a chart to an SVG string.
pub fn render_svg(chart: &ChartSpec, config: &VizConfig) -> Result<String> {
    plots::chart::render(chart, config)
}

/// Render a serialized chart (as written by `pkviz render --format spec`).
pub fn render_spec_json(chart_json: &str, config: &VizConfig) -> Result<String> {
    let chart: ChartSpec = serde_json::from_str(chart_json)?;
    render_svg(&chart, config)
}

/// Render a chart to bytes in `format` (`svg`, or `png` with the feature).
pub fn render_to_bytes(chart: &ChartSpec, format: &str, config: &VizConfig) -> Result<Vec<u8>> {
    let svg = render_svg(chart, config)?;
    match format {
        "svg" => Ok(svg.into_bytes()),
        #[cfg(feature = "png")]
        "png" => output::png::svg_to_png(&svg, config.output.dpi),
        other => Err(RenderError::UnknownFormat(other.to_string())),
    }
}

/// Render a chart to a file; the format follows the extension.
pub fn render_to_file(chart: &ChartSpec, path: &std::path::Path, config: &VizConfig) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("svg");
    if ext == "svg" {
        return output::svg::save_svg(&render_svg(chart, config)?, path);
    }
    let bytes = render_to_bytes(chart, ext, config)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// SVG for every chart slot of `page`, in slot order.
pub fn render_page(page: &Page, config: &VizConfig) -> Result<Vec<(SlotId, String)>> {
    page.charts()
        .map(|(slot, chart)| {
            tracing::debug!(%slot, series = chart.series.len(), "rendering slot");
            Ok((slot.clone(), render_svg(chart, config)?))
        })
        .collect()
}
