//! Per-analysis result records as produced by the PK analysis server.
//!
//! Every numeric field the server may omit (or emit as `null`) is an
//! `Option`; the chart builders decide what an absent value means.

use serde::{Deserialize, Serialize};

/// Concentration-time profile: index-aligned `times` / `concentrations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectProfile {
    /// Sampling times (h).
    pub times: Vec<f64>,
    /// Concentrations aligned with `times`.
    pub concentrations: Vec<f64>,
}

impl SubjectProfile {
    pub fn new(times: Vec<f64>, concentrations: Vec<f64>) -> Self {
        Self { times, concentrations }
    }

    /// Whether both sequences have the same length.
    pub fn is_aligned(&self) -> bool {
        self.times.len() == self.concentrations.len()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Regression diagnostics. `None` means "not computable" (e.g. too few
/// terminal points), never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegressionDiagnostic {
    #[serde(default)]
    pub slope: Option<f64>,
    #[serde(default)]
    pub r_squared: Option<f64>,
    #[serde(default)]
    pub half_life: Option<f64>,
    #[serde(default)]
    pub lambda_z: Option<f64>,
}

/// One subject of an NCA result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NcaSubject {
    #[serde(default)]
    pub times: Option<Vec<f64>>,
    #[serde(default)]
    pub concentrations: Option<Vec<f64>>,
    #[serde(default)]
    pub lambda_z: Option<f64>,
    #[serde(default)]
    pub r_squared: Option<f64>,
    #[serde(default)]
    pub half_life: Option<f64>,
    /// Points `(t, C)` on the fitted terminal-phase regression line.
    #[serde(default)]
    pub adjusted_points: Option<Vec<(f64, f64)>>,
    #[serde(default)]
    pub tmax: Option<f64>,
    #[serde(default)]
    pub cmax: Option<f64>,
    #[serde(default)]
    pub auc_last: Option<f64>,
    #[serde(default)]
    pub auc_inf: Option<f64>,
    #[serde(default)]
    pub mrt: Option<f64>,
}

impl NcaSubject {
    /// Observed profile, when both arrays are present.
    pub fn profile(&self) -> Option<SubjectProfile> {
        match (&self.times, &self.concentrations) {
            (Some(t), Some(c)) => Some(SubjectProfile::new(t.clone(), c.clone())),
            _ => None,
        }
    }

    pub fn diagnostic(&self) -> RegressionDiagnostic {
        RegressionDiagnostic {
            slope: self.lambda_z.map(|l| -l),
            r_squared: self.r_squared,
            half_life: self.half_life,
            lambda_z: self.lambda_z,
        }
    }
}

/// Goodness-of-fit block of a compartmental subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoodnessOfFit {
    #[serde(default)]
    pub residuals: Option<Vec<f64>>,
    #[serde(default)]
    pub r_squared: Option<f64>,
    #[serde(default)]
    pub rmse: Option<f64>,
    #[serde(default)]
    pub aic: Option<f64>,
}

/// One subject of a compartmental fit. A subject whose fit failed carries
/// only `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompartmentalSubject {
    #[serde(default)]
    pub observed_times: Option<Vec<f64>>,
    #[serde(default)]
    pub observed_concentrations: Option<Vec<f64>>,
    #[serde(default)]
    pub predicted_times: Option<Vec<f64>>,
    #[serde(default)]
    pub predicted_concentrations: Option<Vec<f64>>,
    #[serde(default)]
    pub goodness_of_fit: Option<GoodnessOfFit>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CompartmentalSubject {
    /// Names of the four fit arrays that are absent.
    pub fn missing_fit_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.observed_times.is_none() {
            missing.push("observed_times");
        }
        if self.observed_concentrations.is_none() {
            missing.push("observed_concentrations");
        }
        if self.predicted_times.is_none() {
            missing.push("predicted_times");
        }
        if self.predicted_concentrations.is_none() {
            missing.push("predicted_concentrations");
        }
        missing
    }

    pub fn residuals(&self) -> Option<&[f64]> {
        self.goodness_of_fit.as_ref()?.residuals.as_deref()
    }
}

/// Raw bioequivalence entry as sent over the wire. Parameters the server could
/// not assess carry `error` and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BioequivalenceEntry {
    #[serde(default)]
    pub ratio: Option<f64>,
    #[serde(default)]
    pub ci_lower: Option<f64>,
    #[serde(default)]
    pub ci_upper: Option<f64>,
    #[serde(default)]
    pub is_bioequivalent: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl BioequivalenceEntry {
    /// Complete record, or `None` when the entry is an error or lacks a bound.
    pub fn record(&self) -> Option<BioequivalenceRecord> {
        if self.error.is_some() {
            return None;
        }
        Some(BioequivalenceRecord {
            ratio: self.ratio?,
            ci_lower: self.ci_lower?,
            ci_upper: self.ci_upper?,
            is_bioequivalent: self.is_bioequivalent,
        })
    }
}

/// Test/Reference ratio (%) with its confidence interval. `ci_lower <= ratio
/// <= ci_upper` is trusted as sent by the server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BioequivalenceRecord {
    pub ratio: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub is_bioequivalent: bool,
}

/// Summary statistics at one sampling time (t-test or ANOVA).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimePointResult {
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub std: Option<f64>,
    #[serde(default)]
    pub sem: Option<f64>,
    #[serde(default)]
    pub significant: bool,
    #[serde(default)]
    pub p_value: Option<f64>,
    /// ANOVA reports the group count per time point.
    #[serde(default)]
    pub n_subjects: Option<u32>,
}

/// Per-subject log-linear regression.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegressionSubject {
    #[serde(default)]
    pub slope: Option<f64>,
    #[serde(default)]
    pub r_squared: Option<f64>,
    #[serde(default)]
    pub half_life: Option<f64>,
    #[serde(default)]
    pub times: Option<Vec<f64>>,
    #[serde(default)]
    pub observed: Option<Vec<f64>>,
    #[serde(default)]
    pub predicted: Option<Vec<f64>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RegressionSubject {
    pub fn diagnostic(&self) -> RegressionDiagnostic {
        RegressionDiagnostic {
            slope: self.slope,
            r_squared: self.r_squared,
            half_life: self.half_life,
            lambda_z: self.slope.map(|s| -s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nca_subject_tolerates_nulls() {
        let json = r#"{"times":[0,1,2],"concentrations":[0,5,2.5],"lambda_z":null,
                       "half_life":null,"adjusted_points":[[1,5.0],[2,2.5]]}"#;
        let s: NcaSubject = serde_json::from_str(json).unwrap();
        assert_eq!(s.profile().unwrap().len(), 3);
        assert!(s.diagnostic().half_life.is_none());
        assert_eq!(s.adjusted_points.as_ref().unwrap()[1], (2.0, 2.5));
    }

    #[test]
    fn compartmental_missing_fields_are_listed() {
        let s: CompartmentalSubject =
            serde_json::from_str(r#"{"observed_times":[1],"predicted_times":[1]}"#).unwrap();
        assert_eq!(s.missing_fit_fields(), vec!["observed_concentrations", "predicted_concentrations"]);
        assert!(s.residuals().is_none());
    }

    #[test]
    fn bioequivalence_error_entries_have_no_record() {
        let e: BioequivalenceEntry =
            serde_json::from_str(r#"{"error":"Insufficient data for parameter cmax"}"#).unwrap();
        assert!(e.record().is_none());

        let ok: BioequivalenceEntry = serde_json::from_str(
            r#"{"ratio":98.1,"ci_lower":90.2,"ci_upper":106.7,"is_bioequivalent":true}"#,
        )
        .unwrap();
        let r = ok.record().unwrap();
        assert!(r.is_bioequivalent);
        approx::assert_abs_diff_eq!(r.ci_upper, 106.7);
    }

    #[test]
    fn regression_subject_slope_maps_to_lambda() {
        let s = RegressionSubject { slope: Some(-0.25), ..Default::default() };
        approx::assert_abs_diff_eq!(s.diagnostic().lambda_z.unwrap(), 0.25);
    }
}
