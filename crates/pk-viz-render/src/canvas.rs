use std::fmt::Write as FmtWrite;

use crate::color::Color;
use crate::primitives::*;
use crate::text::{TextMetrics, measure_styled};

/// An SVG element stored for deferred rendering.
#[derive(Debug, Clone)]
enum SvgElement {
    Rect { x: f64, y: f64, w: f64, h: f64, style: Style },
    Line { x1: f64, y1: f64, x2: f64, y2: f64, style: LineStyle },
    Polyline { points: Vec<(f64, f64)>, style: LineStyle },
    Text { x: f64, y: f64, content: String, style: TextStyle, rotate: Option<f64> },
    Circle { cx: f64, cy: f64, r: f64, style: Style },
    OpenGroup { clip_id: String },
    CloseGroup,
}

/// Immediate-mode SVG canvas. Coordinates in points (1pt = 1/72").
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    background: Option<Color>,
    font_family: String,
    elements: Vec<SvgElement>,
    defs: Vec<String>,
    clip_depth: usize,
    next_clip_id: usize,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: Some(Color::rgb(255, 255, 255)),
            font_family: "sans-serif".into(),
            elements: Vec::new(),
            defs: Vec::new(),
            clip_depth: 0,
            next_clip_id: 0,
        }
    }

    /// `None` leaves the background transparent.
    pub fn with_background(mut self, color: Option<Color>) -> Self {
        self.background = color;
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    // --- Drawing primitives ---

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: &Style) {
        self.push(SvgElement::Rect { x, y, w, h, style: style.clone() });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &LineStyle) {
        self.push(SvgElement::Line { x1, y1, x2, y2, style: style.clone() });
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], style: &LineStyle) {
        if points.len() < 2 {
            return;
        }
        self.push(SvgElement::Polyline { points: points.to_vec(), style: style.clone() });
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        self.push(SvgElement::Text {
            x,
            y,
            content: content.to_string(),
            style: style.clone(),
            rotate: None,
        });
    }

    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, angle: f64) {
        self.push(SvgElement::Text {
            x,
            y,
            content: content.to_string(),
            style: style.clone(),
            rotate: Some(angle),
        });
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, style: &Style) {
        self.push(SvgElement::Circle { cx, cy, r, style: style.clone() });
    }

    /// Error bar: vertical line + optional horizontal caps.
    pub fn error_bar(&mut self, x: f64, y_lo: f64, y_hi: f64, cap_width: f64, style: &LineStyle) {
        self.line(x, y_lo, x, y_hi, style);
        if cap_width > 0.0 {
            let half = cap_width / 2.0;
            self.line(x - half, y_lo, x + half, y_lo, style);
            self.line(x - half, y_hi, x + half, y_hi, style);
        }
    }

    /// Filled circular data marker.
    pub fn marker(&mut self, x: f64, y: f64, marker: &MarkerStyle) {
        if marker.opacity <= 0.0 {
            return;
        }
        let style = Style {
            fill: Some(marker.color),
            stroke: Some(marker.color),
            stroke_width: 0.5,
            opacity: marker.opacity,
        };
        self.circle(x, y, marker.size / 2.0, &style);
    }

    // --- Clip paths ---

    /// Clip subsequent elements to a rectangle until [`Canvas::pop_clip`].
    pub fn push_clip(&mut self, x: f64, y: f64, w: f64, h: f64) -> String {
        let id = format!("clip{}", self.next_clip_id);
        self.next_clip_id += 1;
        self.defs.push(format!(
            r#"<clipPath id="{id}"><rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" /></clipPath>"#
        ));
        self.push(SvgElement::OpenGroup { clip_id: id.clone() });
        self.clip_depth += 1;
        id
    }

    pub fn pop_clip(&mut self) {
        if self.clip_depth > 0 {
            self.clip_depth -= 1;
            self.push(SvgElement::CloseGroup);
        }
    }

    // --- Text measurement ---

    pub fn measure_text(&self, content: &str, style: &TextStyle) -> TextMetrics {
        measure_styled(content, style)
    }

    // --- SVG output ---

    fn push(&mut self, elem: SvgElement) {
        self.elements.push(elem);
    }

    pub fn finish_svg(&self) -> String {
        let mut out = String::with_capacity(32 * 1024);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        );

        if !self.defs.is_empty() {
            out.push_str("<defs>\n");
            for d in &self.defs {
                out.push_str(d);
                out.push('\n');
            }
            out.push_str("</defs>\n");
        }

        if let Some(bg) = &self.background {
            let _ = writeln!(
                out,
                r#"<rect width="{}" height="{}" fill="{}" />"#,
                self.width,
                self.height,
                bg.to_svg_fill()
            );
        }

        for elem in &self.elements {
            self.render_element(&mut out, elem);
        }
        for _ in 0..self.clip_depth {
            out.push_str("</g>\n");
        }

        out.push_str("</svg>\n");
        out
    }

    fn render_element(&self, out: &mut String, elem: &SvgElement) {
        match elem {
            SvgElement::Rect { x, y, w, h, style } => {
                let _ = write!(out, r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}""#);
                write_style_attrs(out, style);
                out.push_str(" />\n");
            }
            SvgElement::Line { x1, y1, x2, y2, style } => {
                let _ = write!(out, r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}""#);
                write_line_attrs(out, style);
                out.push_str(" />\n");
            }
            SvgElement::Polyline { points, style } => {
                out.push_str(r#"<polyline points=""#);
                for (i, (x, y)) in points.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    let _ = write!(out, "{x:.2},{y:.2}");
                }
                out.push_str(r#"" fill="none""#);
                write_line_attrs(out, style);
                out.push_str(" />\n");
            }
            SvgElement::Text { x, y, content, style, rotate } => {
                let _ = write!(out, r#"<text x="{x:.2}" y="{y:.2}""#);
                let _ = write!(out, r#" font-family="{}" font-size="{:.1}""#, self.font_family, style.size);
                let _ = write!(out, r#" fill="{}""#, style.color.to_svg_fill());
                let _ = write!(out, r#" text-anchor="{}""#, style.anchor.as_str());
                let _ = write!(out, r#" dominant-baseline="{}""#, style.baseline.as_str());
                if style.weight == FontWeight::Bold {
                    out.push_str(r#" font-weight="bold""#);
                }
                if let Some(angle) = rotate {
                    let _ = write!(out, r#" transform="rotate({angle:.1},{x:.2},{y:.2})""#);
                }
                out.push('>');
                escape_into(out, content);
                out.push_str("</text>\n");
            }
            SvgElement::Circle { cx, cy, r, style } => {
                let _ = write!(out, r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}""#);
                write_style_attrs(out, style);
                out.push_str(" />\n");
            }
            SvgElement::OpenGroup { clip_id } => {
                let _ = writeln!(out, r#"<g clip-path="url(#{clip_id})">"#);
            }
            SvgElement::CloseGroup => out.push_str("</g>\n"),
        }
    }
}

fn escape_into(out: &mut String, content: &str) {
    for ch in content.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn write_style_attrs(out: &mut String, style: &Style) {
    match &style.fill {
        Some(fill) => {
            let _ = write!(out, r#" fill="{}""#, fill.to_svg_fill());
        }
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = &style.stroke {
        let _ = write!(out, r#" stroke="{}""#, stroke.to_svg_fill());
        let _ = write!(out, r#" stroke-width="{:.2}""#, style.stroke_width);
    }
    if (style.opacity - 1.0).abs() > 1e-4 {
        let _ = write!(out, r#" opacity="{:.3}""#, style.opacity);
    }
}

fn write_line_attrs(out: &mut String, style: &LineStyle) {
    let _ = write!(out, r#" stroke="{}""#, style.color.to_svg_fill());
    let _ = write!(out, r#" stroke-width="{:.2}""#, style.width);
    if let Some(dash) = &style.dash {
        let _ = write!(out, r#" stroke-dasharray="{dash}""#);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_canvas() {
        let svg = Canvas::new(100.0, 50.0).finish_svg();
        assert!(svg.contains("width=\"100\""));
        assert!(svg.contains("height=\"50\""));
        assert!(svg.contains(r##"fill="#ffffff""##));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn transparent_background() {
        let svg = Canvas::new(10.0, 10.0).with_background(None).finish_svg();
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn text_is_escaped() {
        let mut c = Canvas::new(200.0, 100.0).with_font_family("Helvetica");
        c.text(10.0, 20.0, "a < b & c", &TextStyle::default());
        let svg = c.finish_svg();
        assert!(svg.contains("a &lt; b &amp; c"));
        assert!(svg.contains(r#"font-family="Helvetica""#));
    }

    #[test]
    fn clip_groups_balance() {
        let mut c = Canvas::new(100.0, 100.0);
        c.push_clip(0.0, 0.0, 50.0, 50.0);
        c.line(0.0, 0.0, 10.0, 10.0, &LineStyle::dashed(Color::rgb(1, 2, 3), 1.0));
        let unclosed = c.finish_svg();
        assert_eq!(unclosed.matches("<g ").count(), unclosed.matches("</g>").count());
        c.pop_clip();
        c.pop_clip();
        let svg = c.finish_svg();
        assert!(svg.contains(r#"clip-path="url(#clip0)""#));
        assert!(svg.contains(r#"stroke-dasharray="6 3""#));
        assert_eq!(svg.matches("</g>").count(), 1);
    }

    #[test]
    fn invisible_markers_are_dropped() {
        let mut c = Canvas::new(10.0, 10.0).with_background(None);
        c.marker(1.0, 1.0, &MarkerStyle { opacity: 0.0, ..Default::default() });
        assert!(!c.finish_svg().contains("<circle"));
    }
}
