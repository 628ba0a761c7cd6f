use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Draw axis lines, ticks, grid, tick labels and axis titles.
pub fn draw_axes(canvas: &mut Canvas, area: &PlotArea, x_axis: &Axis, y_axis: &Axis, config: &VizConfig) {
    let fg = config.colors.foreground;
    let frame_style = LineStyle::solid(fg, 0.8);
    let tick_style_line = LineStyle::solid(fg, 0.6);

    let inward = config.axes.tick_direction == "in";
    let tl = config.axes.tick_length;
    let grid_style = LineStyle::solid(config.grid.color.with_alpha(config.grid.alpha), 0.6);

    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), &frame_style);
    canvas.line(area.left, area.top, area.left, area.bottom(), &frame_style);
    if config.axes.show_top_ticks {
        canvas.line(area.left, area.top, area.right(), area.top, &frame_style);
    }
    if config.axes.show_right_ticks {
        canvas.line(area.right(), area.top, area.right(), area.bottom(), &frame_style);
    }

    let tick_label_style = TextStyle {
        size: config.font.tick_size,
        color: fg,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Hanging,
        ..Default::default()
    };

    // --- X axis ticks ---
    for (i, &val) in x_axis.tick_positions.iter().enumerate() {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if px < area.left - 0.5 || px > area.right() + 0.5 {
            continue;
        }

        if config.grid.show {
            canvas.line(px, area.top, px, area.bottom(), &grid_style);
        }

        let dir = if inward { -1.0 } else { 1.0 };
        canvas.line(px, area.bottom(), px, area.bottom() + dir * tl, &tick_style_line);
        if config.axes.show_top_ticks {
            canvas.line(px, area.top, px, area.top - dir * tl, &tick_style_line);
        }

        if let Some(label) = x_axis.tick_labels.get(i) {
            let label_y = if inward { area.bottom() + 3.0 } else { area.bottom() + tl + 3.0 };
            canvas.text(px, label_y, label, &tick_label_style);
        }
    }

    // --- Y axis ticks ---
    let y_tick_label_style = TextStyle {
        size: config.font.tick_size,
        color: fg,
        anchor: TextAnchor::End,
        baseline: TextBaseline::Central,
        ..Default::default()
    };

    for (i, &val) in y_axis.tick_positions.iter().enumerate() {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }

        if config.grid.show {
            canvas.line(area.left, py, area.right(), py, &grid_style);
        }

        let dir = if inward { 1.0 } else { -1.0 };
        canvas.line(area.left, py, area.left + dir * tl, py, &tick_style_line);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), py, area.right() - dir * tl, py, &tick_style_line);
        }

        if let Some(label) = y_axis.tick_labels.get(i) {
            let label_x = if inward { area.left - 4.0 } else { area.left - tl - 4.0 };
            canvas.text(label_x, py, label, &y_tick_label_style);
        }
    }

    // Log axes get unlabelled minor ticks.
    for &val in &y_axis.minor_ticks {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }
        let dir = if inward { 1.0 } else { -1.0 };
        canvas.line(area.left, py, area.left + dir * tl * 0.6, py, &tick_style_line);
    }

    // --- Axis titles ---
    let label_style = TextStyle {
        size: config.font.label_size,
        color: fg,
        anchor: TextAnchor::Middle,
        ..Default::default()
    };

    if !x_axis.label.is_empty() {
        let offset = if inward { 0.0 } else { tl };
        let label_y = area.bottom() + offset + config.font.tick_size + config.font.label_size + 10.0;
        canvas.text(area.left + area.width / 2.0, label_y, &x_axis.label, &label_style);
    }

    if !y_axis.label.is_empty() {
        let max_tick_w = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &y_tick_label_style).width)
            .fold(0.0_f64, f64::max);
        let label_x = area.left - tl - max_tick_w - 12.0;
        let label_y = area.top + area.height / 2.0;
        canvas.text_rotated(label_x, label_y, &y_axis.label, &label_style, -90.0);
    }
}

/// Horizontal line at y = 0 when it lies inside the axis range.
pub fn draw_zero_line(canvas: &mut Canvas, area: &PlotArea, y_axis: &Axis, config: &VizConfig) {
    if y_axis.log || y_axis.min > 0.0 || y_axis.max < 0.0 {
        return;
    }
    let py = y_axis.data_to_pixel(0.0, area.bottom(), area.top);
    canvas.line(area.left, py, area.right(), py, &LineStyle::solid(config.colors.zero_line, 1.5));
}
