use std::fmt;

use pk_viz::Rgba;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb`; malformed channels read as 0.
    pub fn hex(s: &str) -> Self {
        let s = s.strip_prefix('#').unwrap_or(s);
        let channel = |i: usize| s.get(i..i + 2).and_then(|c| u8::from_str_radix(c, 16).ok()).unwrap_or(0);
        Self { r: channel(0), g: channel(2), b: channel(4), a: 1.0 }
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn to_svg_fill(&self) -> String {
        if (self.a - 1.0).abs() < 1e-6 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Self {
        Self::rgba(c.r, c.g, c.b, c.a.clamp(0.0, 1.0))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl<'de> Deserialize<'de> for Color {
    /// Accepts `#rrggbb` and CSS `rgb()/rgba()` strings.
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.trim_start().starts_with("rgb") {
            let c: Rgba = s.parse().map_err(serde::de::Error::custom)?;
            return Ok(c.into());
        }
        Ok(Color::hex(&s))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

// --- Palettes (series without an explicit color) ---

/// Plotly's default trace colors.
pub const PLOTLY: &[&str] = &[
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

pub const TABLEAU10: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

pub const OKABE_ITO: &[&str] =
    &["#0072b2", "#d55e00", "#56b4e9", "#e69f00", "#f0e442", "#009e73", "#cc79a7"];

pub fn palette_colors(name: &str) -> Vec<Color> {
    let strs = match name {
        "tableau10" => TABLEAU10,
        "okabe_ito" => OKABE_ITO,
        _ => PLOTLY,
    };
    strs.iter().map(|s| Color::hex(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        let c = Color::hex("#636EFA");
        assert_eq!((c.r, c.g, c.b), (0x63, 0x6e, 0xfa));
        assert_eq!(Color::hex("#12"), Color::rgb(0x12, 0, 0));
    }

    #[test]
    fn svg_fill_alpha() {
        assert_eq!(Color::rgb(99, 132, 255).to_svg_fill(), "#6384ff");
        assert_eq!(Color::rgb(99, 132, 255).with_alpha(0.7).to_svg_fill(), "rgba(99,132,255,0.700)");
    }

    #[test]
    fn from_chart_color() {
        let c: Color = Rgba::new(255, 99, 132, 0.7).into();
        assert_eq!(c, Color::rgba(255, 99, 132, 0.7));
    }

    #[test]
    fn yaml_accepts_css() {
        let c: Color = serde_yaml_ng::from_str("\"rgba(0, 0, 0, 0.7)\"").unwrap();
        assert_eq!(c, Color::rgba(0, 0, 0, 0.7));
        let h: Color = serde_yaml_ng::from_str("\"#111111\"").unwrap();
        assert_eq!(h, Color::rgb(17, 17, 17));
    }

    #[test]
    fn palette_lookup() {
        assert_eq!(palette_colors("plotly").len(), 10);
        assert_eq!(palette_colors("okabe_ito").len(), 7);
        assert_eq!(palette_colors("unknown").len(), 10);
    }
}
