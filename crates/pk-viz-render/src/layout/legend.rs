use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub kind: LegendKind,
}

pub enum LegendKind {
    FilledRect,
    /// Line swatch with an optional dash pattern.
    Line(Option<&'static str>),
    Marker,
    LineMarker(Option<&'static str>),
}

/// Legend box width for `entries`; zero when there is nothing to show.
pub fn legend_width(canvas: &Canvas, entries: &[LegendEntry], config: &VizConfig) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let style = TextStyle { size: config.font.size * 0.9, ..Default::default() };
    let max_w = entries
        .iter()
        .map(|e| canvas.measure_text(&e.label, &style).width)
        .fold(0.0_f64, f64::max);
    PADDING + SWATCH_W + GAP + max_w + PADDING
}

const SWATCH_W: f64 = 18.0;
const GAP: f64 = 6.0;
const PADDING: f64 = 6.0;

/// Draw a legend to the right of the plot area.
pub fn draw_legend(canvas: &mut Canvas, area: &PlotArea, entries: &[LegendEntry], config: &VizConfig) {
    if entries.is_empty() {
        return;
    }

    let font_size = config.font.size;
    let row_height = font_size + 5.0;
    let swatch_h = font_size - 2.0;

    let text_style = TextStyle {
        size: font_size * 0.9,
        color: config.colors.foreground,
        baseline: TextBaseline::Central,
        ..Default::default()
    };

    let legend_w = legend_width(canvas, entries, config);
    let legend_h = PADDING + entries.len() as f64 * row_height + PADDING;

    let lx = area.right() + 8.0;
    let ly = area.top;

    if config.legend.frame {
        let bg_style = Style {
            fill: config.colors.background,
            stroke: Some(config.colors.foreground.with_alpha(0.3)),
            stroke_width: 0.5,
            opacity: 1.0,
        };
        canvas.rect(lx, ly, legend_w, legend_h, &bg_style);
    }

    for (i, entry) in entries.iter().enumerate() {
        let ey = ly + PADDING + i as f64 * row_height + row_height / 2.0;
        let sx = lx + PADDING;

        match &entry.kind {
            LegendKind::FilledRect => {
                canvas.rect(sx, ey - swatch_h / 2.0, SWATCH_W, swatch_h, &Style::filled(entry.color));
            }
            LegendKind::Line(dash) => {
                let ls = LineStyle { color: entry.color, width: 1.5, dash: *dash };
                canvas.line(sx, ey, sx + SWATCH_W, ey, &ls);
            }
            LegendKind::Marker => {
                canvas.marker(sx + SWATCH_W / 2.0, ey, &MarkerStyle { color: entry.color, ..Default::default() });
            }
            LegendKind::LineMarker(dash) => {
                let ls = LineStyle { color: entry.color, width: 1.5, dash: *dash };
                canvas.line(sx, ey, sx + SWATCH_W, ey, &ls);
                canvas.marker(sx + SWATCH_W / 2.0, ey, &MarkerStyle { color: entry.color, ..Default::default() });
            }
        }

        canvas.text(sx + SWATCH_W + GAP, ey, &entry.label, &text_style);
    }
}
