//! Generic [`ChartSpec`] → SVG renderer.

use pk_viz::spec::{
    Annotation, AxisScale, AxisSpec, ChartSpec, Datum, Ref, Series, SeriesKind,
};

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::header::draw_title;
use crate::layout::axes::Axis;
use crate::layout::legend::{LegendEntry, LegendKind, draw_legend, legend_width};
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::{draw_axes, draw_zero_line};
use crate::primitives::*;
use crate::{RenderError, Result};

/// Fraction of a category band covered by a bar.
const BAR_FILL: f64 = 0.8;

/// Render a chart to an SVG document.
pub fn render(chart: &ChartSpec, config: &VizConfig) -> Result<String> {
    let x_axis = build_x_axis(chart, config)?;
    let y_axis = build_y_axis(chart, config)?;

    let palette = config.palette_colors();
    let colors: Vec<Color> =
        chart.series.iter().enumerate().map(|(i, s)| series_color(s, i, &palette)).collect();

    let legend = if config.legend.show && chart.layout.show_legend {
        legend_entries(chart, &colors)
    } else {
        Vec::new()
    };

    let mut canvas = Canvas::new(config.figure.width, config.figure.height)
        .with_background(config.colors.background)
        .with_font_family(config.font.family.clone());

    let lw = legend_width(&canvas, &legend, config);
    let area = PlotArea::auto(&canvas, &y_axis, &x_axis, !chart.layout.title.is_empty(), lw, config);

    if let Some(bg) = config.colors.plot_background {
        canvas.rect(area.left, area.top, area.width, area.height, &Style::filled(bg));
    }

    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);
    if chart.layout.y_axis.zero_line {
        draw_zero_line(&mut canvas, &area, &y_axis, config);
    }

    canvas.push_clip(area.left, area.top, area.width, area.height);

    for shape in &chart.layout.shapes {
        let style = LineStyle::from_spec(&shape.line, config.colors.foreground);
        let (x0, y0) = to_pixel(&area, &x_axis, &y_axis, shape.x0, shape.y0);
        let (x1, y1) = to_pixel(&area, &x_axis, &y_axis, shape.x1, shape.y1);
        canvas.line(x0, y0, x1, y1, &style);
    }

    for (series, &color) in chart.series.iter().zip(&colors) {
        draw_series(&mut canvas, &area, &x_axis, &y_axis, series, color);
    }

    canvas.pop_clip();

    for ann in &chart.layout.annotations {
        draw_annotation(&mut canvas, &area, &x_axis, &y_axis, ann, config);
    }

    draw_title(&mut canvas, &area, &chart.layout.title, config);
    draw_legend(&mut canvas, &area, &legend, config);

    Ok(canvas.finish_svg())
}

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

fn build_x_axis(chart: &ChartSpec, config: &VizConfig) -> Result<Axis> {
    let spec = &chart.layout.x_axis;
    let categorical = spec.scale == AxisScale::Category
        || chart.series.iter().any(|s| s.x.iter().any(|d| matches!(d, Datum::Category(_))));
    if categorical {
        let mut names: Vec<String> = Vec::new();
        for d in chart.series.iter().flat_map(|s| &s.x) {
            let name = match d {
                Datum::Category(s) => s.clone(),
                Datum::Number(x) => format!("{x}"),
            };
            if !names.contains(&name) {
                names.push(name);
            }
        }
        if names.is_empty() {
            return Err(RenderError::Layout("chart has no x values".into()));
        }
        return Ok(Axis::category(names).with_label(&spec.title));
    }

    let mut values: Vec<f64> =
        chart.series.iter().flat_map(|s| s.x.iter().filter_map(Datum::as_f64)).collect();
    values.extend(chart.layout.shapes.iter().flat_map(|s| [s.x0, s.x1]));
    numeric_axis(spec, values, config)
}

fn build_y_axis(chart: &ChartSpec, config: &VizConfig) -> Result<Axis> {
    let mut values: Vec<f64> = Vec::new();
    for s in &chart.series {
        values.extend(&s.y);
        if let Some(err) = &s.error_y {
            for (i, &y) in s.y.iter().enumerate() {
                values.push(y + err.plus_at(i).unwrap_or(0.0));
                values.push(y - err.minus_at(i).unwrap_or(0.0));
            }
        }
        if s.kind == SeriesKind::Bar {
            values.push(0.0);
        }
    }
    values.extend(chart.layout.shapes.iter().flat_map(|s| [s.y0, s.y1]));
    numeric_axis(&chart.layout.y_axis, values, config)
}

fn numeric_axis(spec: &AxisSpec, values: Vec<f64>, config: &VizConfig) -> Result<Axis> {
    let log = spec.scale == AxisScale::Log;
    let usable: Vec<f64> =
        values.into_iter().filter(|v| v.is_finite() && (!log || *v > 0.0)).collect();

    let axis = match spec.range {
        Some([lo, hi]) if log => Axis::auto_log(lo, hi),
        Some([lo, hi]) => Axis::ranged(lo, hi, config.axes.target_ticks),
        None => {
            if usable.is_empty() {
                return Err(RenderError::Layout(format!("axis '{}' has no drawable values", spec.title)));
            }
            let lo = usable.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = usable.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if log { Axis::auto_log(lo, hi) } else { Axis::auto_linear(lo, hi, config.axes.target_ticks) }
        }
    };
    Ok(axis.with_label(&spec.title))
}

fn to_pixel(area: &PlotArea, x_axis: &Axis, y_axis: &Axis, x: f64, y: f64) -> (f64, f64) {
    (x_axis.data_to_pixel(x, area.left, area.right()), y_axis.data_to_pixel(y, area.bottom(), area.top))
}

fn x_position(axis: &Axis, d: &Datum) -> Option<f64> {
    match d {
        Datum::Number(x) if axis.is_category() => axis.category_index(&format!("{x}")),
        Datum::Number(x) => Some(*x),
        Datum::Category(name) => axis.category_index(name),
    }
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

fn series_color(series: &Series, index: usize, palette: &[Color]) -> Color {
    let explicit = series
        .line
        .as_ref()
        .and_then(|l| l.color)
        .or_else(|| series.marker.as_ref().and_then(|m| m.color.as_ref()).and_then(|c| c.at(0)));
    match explicit {
        Some(c) => c.into(),
        None if palette.is_empty() => Color::rgb(99, 110, 250),
        None => palette[index % palette.len()],
    }
}

fn legend_entries(chart: &ChartSpec, colors: &[Color]) -> Vec<LegendEntry> {
    chart
        .series
        .iter()
        .zip(colors)
        .filter(|(s, _)| s.show_legend)
        .filter_map(|(s, &color)| {
            let label = s.name.clone()?;
            let dash = s.line.as_ref().and_then(|l| dash_pattern(l.dash));
            let kind = match s.kind {
                SeriesKind::Bar => LegendKind::FilledRect,
                SeriesKind::Lines => LegendKind::Line(dash),
                SeriesKind::Markers => LegendKind::Marker,
                SeriesKind::LinesMarkers => LegendKind::LineMarker(dash),
            };
            Some(LegendEntry { label, color, kind })
        })
        .collect()
}

fn draw_series(canvas: &mut Canvas, area: &PlotArea, x_axis: &Axis, y_axis: &Axis, series: &Series, color: Color) {
    let points: Vec<Option<(f64, f64)>> = series
        .x
        .iter()
        .zip(&series.y)
        .map(|(d, &y)| {
            let x = x_position(x_axis, d)?;
            (x_axis.accepts(x) && y_axis.accepts(y)).then(|| to_pixel(area, x_axis, y_axis, x, y))
        })
        .collect();

    let marker = series.marker.as_ref();

    if series.kind == SeriesKind::Bar {
        draw_bars(canvas, area, x_axis, y_axis, series, &points, color);
        return;
    }

    if series.kind.has_lines() {
        let style = match &series.line {
            Some(line) => LineStyle::from_spec(line, color),
            None => LineStyle::solid(color, 2.0),
        };
        // Gaps (dropped points) split the polyline.
        for run in points.split(Option::is_none) {
            let run: Vec<(f64, f64)> = run.iter().flatten().copied().collect();
            canvas.polyline(&run, &style);
        }
    }

    if let Some(err) = &series.error_y {
        for (i, (p, &y)) in points.iter().zip(&series.y).enumerate() {
            let Some((px, _)) = p else { continue };
            let hi = y + err.plus_at(i).unwrap_or(0.0);
            let lo = y - err.minus_at(i).unwrap_or(0.0);
            let lo = if y_axis.log { lo.max(y_axis.min) } else { lo };
            let py_hi = y_axis.data_to_pixel(hi, area.bottom(), area.top);
            let py_lo = y_axis.data_to_pixel(lo, area.bottom(), area.top);
            let bar_color = MarkerStyle::point(marker, i, color).color;
            canvas.error_bar(*px, py_lo, py_hi, err.cap_width * 2.0, &LineStyle::solid(bar_color, err.thickness));
        }
    }

    if series.kind.has_markers() {
        for (i, p) in points.iter().enumerate() {
            if let Some((px, py)) = p {
                canvas.marker(*px, *py, &MarkerStyle::point(marker, i, color));
            }
        }
    }
}

fn draw_bars(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    series: &Series,
    points: &[Option<(f64, f64)>],
    color: Color,
) {
    let bands = if x_axis.is_category() { x_axis.categories.len() } else { series.x.len() };
    let bar_w = BAR_FILL * area.width / bands.max(1) as f64;
    let base = if y_axis.log { y_axis.min } else { 0.0_f64.clamp(y_axis.min, y_axis.max) };
    let base_px = y_axis.data_to_pixel(base, area.bottom(), area.top);

    let marker = series.marker.as_ref();
    let outline = marker.and_then(|m| m.line.as_ref());

    for (i, p) in points.iter().enumerate() {
        let Some((px, py)) = p else { continue };
        let point = MarkerStyle::point(marker, i, color);
        let (top, height) = if *py < base_px { (*py, base_px - py) } else { (base_px, py - base_px) };
        let style = Style::bar(point.color, outline, point.opacity);
        canvas.rect(px - bar_w / 2.0, top, bar_w, height, &style);
    }
}

// ---------------------------------------------------------------------------
// Annotations
// ---------------------------------------------------------------------------

fn draw_annotation(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    ann: &Annotation,
    config: &VizConfig,
) {
    let (px, anchor) = match ann.x_ref {
        Ref::Paper => (area.paper_to_pixel(ann.x, 0.0).0, TextAnchor::for_paper_x(ann.x)),
        Ref::Data => (x_axis.data_to_pixel(ann.x, area.left, area.right()), TextAnchor::Middle),
    };
    let (py, from_top) = match ann.y_ref {
        Ref::Paper => (area.paper_to_pixel(0.0, ann.y).1, ann.y > 2.0 / 3.0),
        Ref::Data => (y_axis.data_to_pixel(ann.y, area.bottom(), area.top), false),
    };

    let style = TextStyle {
        size: config.font.size,
        color: ann.color.map(Color::from).unwrap_or(config.colors.foreground),
        anchor,
        baseline: TextBaseline::Central,
        ..Default::default()
    };

    let line_h = config.font.size * 1.3;
    let block_h = line_h * ann.lines.len() as f64;
    let block_top = if from_top { py } else { py - block_h / 2.0 };

    if ann.boxed {
        let pad = 4.0;
        let width = ann.lines.iter().map(|l| canvas.measure_text(l, &style).width).fold(0.0_f64, f64::max);
        let left = match anchor {
            TextAnchor::Start => px,
            TextAnchor::Middle => px - width / 2.0,
            TextAnchor::End => px - width,
        };
        let bg = Style {
            fill: Some(config.colors.annotation_background),
            stroke: Some(config.colors.annotation_border),
            stroke_width: 1.0,
            opacity: 1.0,
        };
        canvas.rect(left - pad, block_top - pad, width + 2.0 * pad, block_h + 2.0 * pad, &bg);
    }

    for (i, line) in ann.lines.iter().enumerate() {
        canvas.text(px, block_top + line_h * (i as f64 + 0.5), line, &style);
    }
}
