//! Declarative chart description (series + layout).
//!
//! A [`ChartSpec`] is backend-neutral: `pk_viz::plotly` turns it into a
//! Plotly.js figure, `pk-viz-render` draws it to SVG.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Schema tag written into every serialized chart.
pub const CHART_SCHEMA_VERSION: &str = "pkviz_chart_v0";

/// RGBA color, serialized as a CSS `rgba(r, g, b, a)` string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

impl FromStr for Rgba {
    type Err = String;

    /// Accepts `rgba(r, g, b, a)`, `rgb(r, g, b)` and `#rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(format!("bad hex color: {s}"));
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("bad hex color {s}: {e}"))
            };
            return Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, 1.0));
        }
        let inner = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| format!("unrecognized color: {s}"))?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() < 3 || parts.len() > 4 {
            return Err(format!("unrecognized color: {s}"));
        }
        let channel = |p: &str| p.parse::<u8>().map_err(|e| format!("bad channel {p}: {e}"));
        let a = match parts.get(3) {
            Some(p) => p.parse::<f64>().map_err(|e| format!("bad alpha {p}: {e}"))?,
            None => 1.0,
        };
        Ok(Self::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, a))
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Fixed palette shared by the builders.
pub mod colors {
    use super::Rgba;

    /// Observed data / "not significant" / bioequivalent.
    pub const GREEN: Rgba = Rgba::new(99, 255, 132, 1.0);
    /// Regression lines, residuals, "significant", not bioequivalent.
    pub const RED: Rgba = Rgba::new(255, 99, 132, 1.0);
    /// Model-fit curve.
    pub const PURPLE: Rgba = Rgba::new(132, 99, 255, 1.0);
    pub const BLUE: Rgba = Rgba::new(99, 132, 255, 1.0);
    pub const GREY: Rgba = Rgba::new(200, 200, 200, 1.0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);
}

/// X value: numeric or categorical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Datum {
    Number(f64),
    Category(String),
}

impl Datum {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(x) => Some(*x),
            Self::Category(_) => None,
        }
    }
}

impl From<f64> for Datum {
    fn from(x: f64) -> Self {
        Self::Number(x)
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Self::Category(s.to_string())
    }
}

impl From<String> for Datum {
    fn from(s: String) -> Self {
        Self::Category(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    #[serde(rename = "markers")]
    Markers,
    #[serde(rename = "lines")]
    Lines,
    #[serde(rename = "lines+markers")]
    LinesMarkers,
    #[serde(rename = "bar")]
    Bar,
}

impl SeriesKind {
    pub fn has_markers(&self) -> bool {
        matches!(self, Self::Markers | Self::LinesMarkers)
    }

    pub fn has_lines(&self) -> bool {
        matches!(self, Self::Lines | Self::LinesMarkers)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dash {
    #[default]
    Solid,
    Dash,
    Dot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba>,
    #[serde(default)]
    pub dash: Dash,
}

impl LineStyle {
    pub fn solid(width: f64) -> Self {
        Self { width, color: None, dash: Dash::Solid }
    }

    pub fn dashed(width: f64, color: Rgba) -> Self {
        Self { width, color: Some(color), dash: Dash::Dash }
    }

    pub fn colored(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_dash(mut self, dash: Dash) -> Self {
        self.dash = dash;
        self
    }
}

/// One color for the whole series or one per point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkerColor {
    Uniform(Rgba),
    PerPoint(Vec<Rgba>),
}

impl MarkerColor {
    /// Color of point `i`, if one is specified.
    pub fn at(&self, i: usize) -> Option<Rgba> {
        match self {
            Self::Uniform(c) => Some(*c),
            Self::PerPoint(cs) => cs.get(i).copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<MarkerColor>,
    #[serde(default = "one")]
    pub opacity: f64,
    /// Outline (bars).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
}

fn one() -> f64 {
    1.0
}

impl Marker {
    pub fn sized(size: f64) -> Self {
        Self { size, color: None, opacity: 1.0, line: None }
    }

    pub fn colored(mut self, color: Rgba) -> Self {
        self.color = Some(MarkerColor::Uniform(color));
        self
    }

    pub fn per_point(mut self, colors: Vec<Rgba>) -> Self {
        self.color = Some(MarkerColor::PerPoint(colors));
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn outlined(mut self, line: LineStyle) -> Self {
        self.line = Some(line);
        self
    }
}

/// Vertical error bars, given as magnitudes relative to `y`.
///
/// `minus == None` means symmetric bars of size `plus`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBars {
    pub plus: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minus: Option<Vec<f64>>,
    pub thickness: f64,
    /// Cap width in pixels.
    pub cap_width: f64,
}

impl ErrorBars {
    pub fn symmetric(values: Vec<f64>) -> Self {
        Self { plus: values, minus: None, thickness: 1.5, cap_width: 5.0 }
    }

    pub fn asymmetric(plus: Vec<f64>, minus: Vec<f64>) -> Self {
        Self { plus, minus: Some(minus), thickness: 2.0, cap_width: 4.0 }
    }

    /// Lower magnitude of point `i`.
    pub fn minus_at(&self, i: usize) -> Option<f64> {
        match &self.minus {
            Some(m) => m.get(i).copied(),
            None => self.plus.get(i).copied(),
        }
    }

    pub fn plus_at(&self, i: usize) -> Option<f64> {
        self.plus.get(i).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: Vec<Datum>,
    pub y: Vec<f64>,
    pub kind: SeriesKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_y: Option<ErrorBars>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_group: Option<String>,
    #[serde(default = "yes")]
    pub show_legend: bool,
}

fn yes() -> bool {
    true
}

impl Series {
    pub fn new(kind: SeriesKind, x: Vec<Datum>, y: Vec<f64>) -> Self {
        Self {
            name: None,
            x,
            y,
            kind,
            marker: None,
            line: None,
            error_y: None,
            legend_group: None,
            show_legend: true,
        }
    }

    /// Numeric x values.
    pub fn numeric(kind: SeriesKind, x: &[f64], y: &[f64]) -> Self {
        Self::new(kind, x.iter().copied().map(Datum::Number).collect(), y.to_vec())
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_error_y(mut self, error_y: ErrorBars) -> Self {
        self.error_y = Some(error_y);
        self
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.legend_group = Some(group.into());
        self
    }

    pub fn hide_legend(mut self) -> Self {
        self.show_legend = false;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    #[default]
    Linear,
    Log,
    Category,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub title: String,
    #[serde(default)]
    pub scale: AxisScale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(default)]
    pub zero_line: bool,
}

impl AxisSpec {
    pub fn titled(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Default::default() }
    }

    pub fn with_scale(mut self, scale: AxisScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_range(mut self, lo: f64, hi: f64) -> Self {
        self.range = Some([lo, hi]);
        self
    }

    pub fn with_zero_line(mut self) -> Self {
        self.zero_line = true;
        self
    }
}

/// Coordinate system of an annotation anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ref {
    /// Fraction of the plot area, `0..1`.
    #[default]
    Paper,
    /// Axis data units.
    Data,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub lines: Vec<String>,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub x_ref: Ref,
    #[serde(default)]
    pub y_ref: Ref,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba>,
    /// Draw a translucent box behind the text.
    #[serde(default)]
    pub boxed: bool,
}

impl Annotation {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Straight line segment in data coordinates (reference lines).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub line: LineStyle,
}

impl Shape {
    pub fn hline(y: f64, x0: f64, x1: f64, line: LineStyle) -> Self {
        Self { x0, y0: y, x1, y1: y, line }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: String,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<Shape>,
    #[serde(default = "yes")]
    pub show_legend: bool,
}

impl Layout {
    pub fn new(title: impl Into<String>, x_axis: AxisSpec, y_axis: AxisSpec) -> Self {
        Self {
            title: title.into(),
            x_axis,
            y_axis,
            annotations: Vec::new(),
            shapes: Vec::new(),
            show_legend: true,
        }
    }
}

/// A complete chart: ordered series plus layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub schema_version: String,
    pub series: Vec<Series>,
    pub layout: Layout,
}

impl ChartSpec {
    pub fn new(series: Vec<Series>, layout: Layout) -> Self {
        Self { schema_version: CHART_SCHEMA_VERSION.to_string(), series, layout }
    }

    /// Same chart with a log-scaled y-axis and a new title.
    pub fn semilog(&self, title: impl Into<String>) -> Self {
        let mut out = self.clone();
        out.layout.title = title.into();
        out.layout.y_axis.scale = AxisScale::Log;
        out
    }
}
