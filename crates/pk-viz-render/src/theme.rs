use crate::color::Color;
use crate::config::*;

/// Built-in theme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTheme {
    /// Matches Plotly's `plotly_dark` template.
    Dark,
    Light,
    Minimal,
}

impl BuiltinTheme {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dark" | "plotly_dark" => Some(Self::Dark),
            "light" | "plotly_white" => Some(Self::Light),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    pub fn base_config(self) -> VizConfig {
        match self {
            Self::Dark => dark(),
            Self::Light => light(),
            Self::Minimal => minimal(),
        }
    }
}

fn dark() -> VizConfig {
    VizConfig {
        theme: "dark".into(),
        figure: FigureConfig::default(),
        font: FontConfig::default(),
        axes: AxesConfig::default(),
        grid: GridConfig::default(),
        colors: ColorsConfig::default(),
        palette: "plotly".into(),
        legend: LegendConfig::default(),
        output: OutputConfig::default(),
    }
}

fn light() -> VizConfig {
    VizConfig {
        theme: "light".into(),
        grid: GridConfig { show: true, color: Color::hex("#E2E8F0"), alpha: 1.0 },
        colors: ColorsConfig {
            background: Some(Color::rgb(255, 255, 255)),
            plot_background: Some(Color::rgb(255, 255, 255)),
            foreground: Color::hex("#2a3f5f"),
            zero_line: Color::hex("#94A3B8"),
            annotation_background: Color::rgba(255, 255, 255, 0.85),
            annotation_border: Color::rgba(42, 63, 95, 0.5),
        },
        legend: LegendConfig { show: true, frame: true },
        ..dark()
    }
}

fn minimal() -> VizConfig {
    VizConfig {
        theme: "minimal".into(),
        figure: FigureConfig { width: 480.0, height: 320.0 },
        font: FontConfig { size: 9.0, title_size: 11.0, label_size: 10.0, tick_size: 8.0, ..FontConfig::default() },
        axes: AxesConfig { tick_direction: "in".into(), tick_length: 3.0, target_ticks: 5, ..AxesConfig::default() },
        grid: GridConfig { show: false, ..GridConfig::default() },
        palette: "okabe_ito".into(),
        ..light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!(BuiltinTheme::parse("PLOTLY_DARK"), Some(BuiltinTheme::Dark));
        assert_eq!(BuiltinTheme::parse("light"), Some(BuiltinTheme::Light));
        assert_eq!(BuiltinTheme::parse("atlas"), None);
    }

    #[test]
    fn minimal_inherits_light_colors() {
        let m = BuiltinTheme::Minimal.base_config();
        assert_eq!(m.colors, BuiltinTheme::Light.base_config().colors);
        assert!(!m.grid.show);
        assert_eq!(m.theme, "minimal");
    }
}
