//! Drawing styles and their mapping from the chart model.

use pk_viz::spec;

use crate::color::Color;

/// SVG `stroke-dasharray` for a chart dash kind.
pub fn dash_pattern(dash: spec::Dash) -> Option<&'static str> {
    match dash {
        spec::Dash::Solid => None,
        spec::Dash::Dash => Some("6 3"),
        spec::Dash::Dot => Some("2 2"),
    }
}

/// Fill + stroke for rectangles, bars and markers.
#[derive(Debug, Clone)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self { fill: None, stroke: None, stroke_width: 1.0, opacity: 1.0 }
    }
}

impl Style {
    pub fn filled(color: Color) -> Self {
        Self { fill: Some(color), ..Default::default() }
    }

    /// Bar body. The outline defaults to the opaque fill color.
    pub fn bar(fill: Color, outline: Option<&spec::LineStyle>, opacity: f64) -> Self {
        Self {
            fill: Some(fill),
            stroke: outline.map(|l| l.color.map_or(fill.with_alpha(1.0), Color::from)),
            stroke_width: outline.map_or(0.0, |l| l.width),
            opacity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    pub dash: Option<&'static str>,
}

impl LineStyle {
    pub fn solid(color: Color, width: f64) -> Self {
        Self { color, width, dash: None }
    }

    pub fn dashed(color: Color, width: f64) -> Self {
        Self { color, width, dash: dash_pattern(spec::Dash::Dash) }
    }

    pub fn from_dash(color: Color, width: f64, dash: spec::Dash) -> Self {
        Self { color, width, dash: dash_pattern(dash) }
    }

    /// Chart line style; `fallback` applies when the line has no color.
    pub fn from_spec(line: &spec::LineStyle, fallback: Color) -> Self {
        Self::from_dash(line.color.map_or(fallback, Color::from), line.width, line.dash)
    }
}

#[derive(Debug, Clone)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    pub weight: FontWeight,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 10.0,
            color: Color::rgb(0, 0, 0),
            weight: FontWeight::Regular,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(&self) -> &str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }

    /// Plotly's `xanchor: auto` for a paper-relative x position.
    pub fn for_paper_x(x: f64) -> Self {
        if x < 1.0 / 3.0 {
            Self::Start
        } else if x > 2.0 / 3.0 {
            Self::End
        } else {
            Self::Middle
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Central,
    Hanging,
}

impl TextBaseline {
    pub fn as_str(&self) -> &str {
        match self {
            TextBaseline::Alphabetic => "auto",
            TextBaseline::Central => "central",
            TextBaseline::Hanging => "hanging",
        }
    }
}

/// Circular data marker. `size` is the diameter, as in Plotly.
#[derive(Debug, Clone)]
pub struct MarkerStyle {
    pub size: f64,
    pub color: Color,
    pub opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self { size: 6.0, color: Color::rgb(0, 0, 0), opacity: 1.0 }
    }
}

impl MarkerStyle {
    /// Marker of point `index`; per-point colors override `fallback`.
    pub fn point(marker: Option<&spec::Marker>, index: usize, fallback: Color) -> Self {
        let Some(m) = marker else {
            return Self { color: fallback, ..Default::default() };
        };
        let color = m.color.as_ref().and_then(|c| c.at(index)).map_or(fallback, Color::from);
        Self { size: m.size, color, opacity: m.opacity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pk_viz::spec::{Marker, colors};

    #[test]
    fn dash_kinds_map_to_patterns() {
        assert_eq!(dash_pattern(spec::Dash::Solid), None);
        assert_eq!(LineStyle::from_spec(&spec::LineStyle::dashed(2.0, colors::RED), Color::default()).dash, Some("6 3"));
    }

    #[test]
    fn per_point_marker_colors() {
        let m = Marker::sized(10.0).per_point(vec![colors::GREEN, colors::RED]);
        let fallback = Color::rgb(1, 2, 3);
        assert_eq!(MarkerStyle::point(Some(&m), 1, fallback).color, Color::from(colors::RED));
        assert_eq!(MarkerStyle::point(Some(&m), 5, fallback).color, fallback);
        assert_eq!(MarkerStyle::point(None, 0, fallback).size, 6.0);
    }

    #[test]
    fn paper_anchor_follows_position() {
        assert_eq!(TextAnchor::for_paper_x(0.05), TextAnchor::Start);
        assert_eq!(TextAnchor::for_paper_x(0.5), TextAnchor::Middle);
        assert_eq!(TextAnchor::for_paper_x(0.9), TextAnchor::End);
    }
}
