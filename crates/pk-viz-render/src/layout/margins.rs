use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::primitives::TextStyle;

/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Compute margins from axis labels, title and legend width.
    pub fn auto(
        canvas: &Canvas,
        y_axis: &Axis,
        x_axis: &Axis,
        has_title: bool,
        legend_width: f64,
        config: &VizConfig,
    ) -> Self {
        let tick_style = TextStyle { size: config.font.tick_size, ..Default::default() };

        // Left: y tick labels + rotated axis label
        let max_tick_w = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &tick_style).width)
            .fold(0.0_f64, f64::max);
        let mut left = 15.0 + max_tick_w + config.axes.tick_length + 6.0;
        if !y_axis.label.is_empty() {
            left += config.font.label_size + 8.0;
        }

        // Bottom: x tick labels + axis label
        let mut bottom = 15.0 + config.font.tick_size + config.axes.tick_length + 6.0;
        if !x_axis.label.is_empty() {
            bottom += config.font.label_size + 8.0;
        }

        let top = if has_title { config.font.title_size * 1.4 + 16.0 } else { 15.0 };

        let right = if legend_width > 0.0 { legend_width + 20.0 } else { 20.0 };

        let width = canvas.width - left - right;
        let height = canvas.height - top - bottom;

        Self { left, top, width: width.max(50.0), height: height.max(50.0) }
    }

    /// Where `(fx, fy)` in paper fractions lands; `fy = 1` is the top edge.
    pub fn paper_to_pixel(&self, fx: f64, fy: f64) -> (f64, f64) {
        (self.left + fx * self.width, self.bottom() - fy * self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_narrows_plot() {
        let canvas = Canvas::new(640.0, 400.0);
        let config = VizConfig::default();
        let x = Axis::auto_linear(0.0, 10.0, 6).with_label("Time (h)");
        let y = Axis::auto_linear(0.0, 10.0, 6).with_label("Concentration");
        let plain = PlotArea::auto(&canvas, &y, &x, true, 0.0, &config);
        let with_legend = PlotArea::auto(&canvas, &y, &x, true, 90.0, &config);
        assert!(with_legend.width < plain.width);
        assert!(plain.right() < 640.0 && plain.bottom() < 400.0);
    }

    #[test]
    fn paper_coordinates() {
        let area = PlotArea { left: 10.0, top: 20.0, width: 100.0, height: 50.0 };
        assert_eq!(area.paper_to_pixel(0.0, 1.0), (10.0, 20.0));
        assert_eq!(area.paper_to_pixel(1.0, 0.0), (110.0, 70.0));
    }
}
