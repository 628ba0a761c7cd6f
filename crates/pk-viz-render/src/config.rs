use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::theme::BuiltinTheme;

/// Top-level rendering configuration (YAML or programmatic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub theme: String,
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub colors: ColorsConfig,
    pub palette: String,
    pub legend: LegendConfig,
    pub output: OutputConfig,
}

impl Default for VizConfig {
    fn default() -> Self {
        BuiltinTheme::Dark.base_config()
    }
}

impl VizConfig {
    pub fn palette_colors(&self) -> Vec<Color> {
        crate::color::palette_colors(&self.palette)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self { width: 640.0, height: 400.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    pub size: f64,
    pub title_size: f64,
    pub label_size: f64,
    pub tick_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "'Open Sans', verdana, arial, sans-serif".into(),
            size: 10.0,
            title_size: 14.0,
            label_size: 11.0,
            tick_size: 9.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_direction: String,
    pub show_top_ticks: bool,
    pub show_right_ticks: bool,
    pub tick_length: f64,
    /// Target number of major ticks on linear axes.
    pub target_ticks: usize,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_direction: "out".into(),
            show_top_ticks: false,
            show_right_ticks: false,
            tick_length: 4.0,
            target_ticks: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub alpha: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: true, color: Color::hex("#283442"), alpha: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    /// Figure background; `None` renders transparent.
    pub background: Option<Color>,
    /// Plot-area background.
    pub plot_background: Option<Color>,
    /// Text, ticks and frame.
    pub foreground: Color,
    pub zero_line: Color,
    pub annotation_background: Color,
    pub annotation_border: Color,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            background: Some(Color::hex("#111111")),
            plot_background: Some(Color::hex("#111111")),
            foreground: Color::hex("#f2f5fa"),
            zero_line: Color::hex("#283442"),
            annotation_background: Color::rgba(0, 0, 0, 0.7),
            annotation_border: Color::rgba(255, 255, 255, 0.5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    pub show: bool,
    pub frame: bool,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self { show: true, frame: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: String,
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: "svg".into(), dpi: 144 }
    }
}

/// Resolve a VizConfig from a theme name and optional YAML overrides.
///
/// Theme priority: `theme` argument, then the YAML `theme:` key, then dark.
/// Keys present in the YAML replace the theme's values; absent keys keep them.
pub fn resolve_config(theme: Option<&str>, user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    let config_err = |e: serde_yaml_ng::Error| crate::RenderError::Config(e.to_string());

    let user: Option<serde_yaml_ng::Value> =
        user_yaml.map(serde_yaml_ng::from_str::<serde_yaml_ng::Value>).transpose().map_err(config_err)?;
    let yaml_theme = user.as_ref().and_then(|u| u.get("theme")).and_then(|t| t.as_str());
    let theme_name = theme.or(yaml_theme).unwrap_or("dark");
    let base = BuiltinTheme::parse(theme_name)
        .ok_or_else(|| crate::RenderError::Config(format!("unknown theme: {theme_name}")))?
        .base_config();

    let Some(user) = user.filter(|u| !u.is_null()) else {
        return Ok(base);
    };
    let mut merged = serde_yaml_ng::to_value(&base).map_err(config_err)?;
    merge(&mut merged, user);
    let mut config: VizConfig = serde_yaml_ng::from_value(merged).map_err(config_err)?;
    config.theme = base.theme;
    Ok(config)
}

/// Recursive mapping overlay: `over` wins on leaves.
fn merge(base: &mut serde_yaml_ng::Value, over: serde_yaml_ng::Value) {
    use serde_yaml_ng::Value;
    match (base, over) {
        (Value::Mapping(b), Value::Mapping(o)) => {
            for (k, v) in o {
                match b.get_mut(&k) {
                    Some(slot) => merge(slot, v),
                    None => {
                        b.insert(k, v);
                    }
                }
            }
        }
        (slot, v) => *slot = v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_dark() {
        let c = resolve_config(None, None).unwrap();
        assert_eq!(c.theme, "dark");
        assert_eq!(c, VizConfig::default());
    }

    #[test]
    fn yaml_overrides_keep_theme_values() {
        let yaml = "theme: light\nfigure:\n  width: 800\ngrid:\n  show: false\n";
        let c = resolve_config(None, Some(yaml)).unwrap();
        let light = BuiltinTheme::Light.base_config();
        assert_eq!(c.theme, "light");
        assert_eq!(c.figure.width, 800.0);
        assert_eq!(c.figure.height, light.figure.height);
        assert!(!c.grid.show);
        assert_eq!(c.colors.foreground, light.colors.foreground);
    }

    #[test]
    fn explicit_theme_beats_yaml() {
        let c = resolve_config(Some("minimal"), Some("theme: light\n")).unwrap();
        assert_eq!(c.theme, "minimal");
    }

    #[test]
    fn bad_yaml_is_config_error() {
        assert!(matches!(
            resolve_config(None, Some("figure: [1, 2")),
            Err(crate::RenderError::Config(_))
        ));
        assert!(matches!(resolve_config(Some("neon"), None), Err(crate::RenderError::Config(_))));
    }

    #[test]
    fn colors_roundtrip_through_yaml() {
        let yaml = "colors:\n  annotation_background: \"rgba(0, 0, 0, 0.5)\"\n  background: null\n";
        let c = resolve_config(None, Some(yaml)).unwrap();
        assert_eq!(c.colors.annotation_background, Color::rgba(0, 0, 0, 0.5));
        assert!(c.colors.background.is_none());
    }
}
