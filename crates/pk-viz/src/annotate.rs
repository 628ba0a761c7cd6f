//! Diagnostic text boxes (λz / R² / t½, slope).

use pk_core::RegressionDiagnostic;

use crate::spec::{Annotation, Ref, colors};

/// Placeholder for a diagnostic that could not be computed.
pub const NOT_AVAILABLE: &str = "N/A";

/// Four decimals, or `N/A` when absent or non-finite.
pub fn format_or_na(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.4}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Lines of the NCA elimination-phase box.
pub fn elimination_lines(diag: &RegressionDiagnostic) -> Vec<String> {
    vec![
        format!("λz = {}", format_or_na(diag.lambda_z)),
        format!("R² = {}", format_or_na(diag.r_squared)),
        format!("t½ = {} h", format_or_na(diag.half_life)),
    ]
}

/// Lines of the statistics regression box.
pub fn regression_lines(diag: &RegressionDiagnostic) -> Vec<String> {
    vec![
        format!("Slope = {}", format_or_na(diag.slope)),
        format!("R² = {}", format_or_na(diag.r_squared)),
        format!("t½ = {} h", format_or_na(diag.half_life)),
    ]
}

/// Boxed annotation in the top-left corner of the plot area.
pub fn diagnostic_box(lines: Vec<String>) -> Annotation {
    Annotation {
        lines,
        x: 0.05,
        y: 0.95,
        x_ref: Ref::Paper,
        y_ref: Ref::Paper,
        color: Some(colors::WHITE),
        boxed: true,
    }
}
