//! Closed analysis-result model.
//!
//! The wire carries the analysis type as a free string (`"NCA"`, ...) and the
//! statistics sub-type as `stat_type`. Both are decoded into closed enums here
//! so that dispatch downstream is an exhaustive `match`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::subject_map::SubjectMap;
use crate::types::{
    BioequivalenceEntry, CompartmentalSubject, NcaSubject, RegressionSubject, TimePointResult,
};
use crate::Result;

/// Analysis families understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisKind {
    #[serde(rename = "NCA")]
    Nca,
    Compartmental,
    Bioequivalence,
    Statistics,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 4] =
        [Self::Nca, Self::Compartmental, Self::Bioequivalence, Self::Statistics];

    /// Parse the server's `type` string. Unknown strings yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NCA" => Some(Self::Nca),
            "Compartmental" => Some(Self::Compartmental),
            "Bioequivalence" => Some(Self::Bioequivalence),
            "Statistics" => Some(Self::Statistics),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nca => "NCA",
            Self::Compartmental => "Compartmental",
            Self::Bioequivalence => "Bioequivalence",
            Self::Statistics => "Statistics",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which per-time-point test produced a [`TimeResults`] payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeTest {
    Ttest,
    Anova,
}

impl TimeTest {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ttest => "T-test",
            Self::Anova => "ANOVA",
        }
    }
}

/// Per-time-point summary statistics, keyed by the stringified time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeResults {
    #[serde(default)]
    pub n_subjects: Option<u32>,
    #[serde(default)]
    pub time_results: SubjectMap<TimePointResult>,
}

/// Per-subject regression results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegressionResults {
    #[serde(default)]
    pub n_subjects: Option<u32>,
    #[serde(default)]
    pub regression_results: SubjectMap<RegressionSubject>,
}

/// Statistics payload, tagged on the wire by `stat_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stat_type", rename_all = "lowercase")]
pub enum StatisticsResult {
    Ttest(TimeResults),
    Anova(TimeResults),
    Regression(RegressionResults),
    /// A failed run stored as `{"error": ...}`, or a `stat_type` with no charts.
    #[serde(skip)]
    Unrendered { stat_type: Option<String>, error: Option<String> },
}

impl StatisticsResult {
    const RENDERED: [&'static str; 3] = ["ttest", "anova", "regression"];

    /// Decode a statistics payload. Only a known `stat_type` is decoded
    /// strictly; anything else becomes [`StatisticsResult::Unrendered`].
    pub fn from_value(data: serde_json::Value) -> Result<Self> {
        let text = |key: &str| data.get(key).and_then(serde_json::Value::as_str).map(str::to_string);
        let stat_type = text("stat_type");
        let error = text("error");
        match stat_type {
            Some(tag) if Self::RENDERED.contains(&tag.as_str()) => Ok(serde_json::from_value(data)?),
            stat_type => Ok(Self::Unrendered { stat_type, error }),
        }
    }

    /// Split into the mutually exclusive builder inputs.
    pub fn view(&self) -> StatisticsView<'_> {
        match self {
            Self::Ttest(r) => StatisticsView::Time(TimeTest::Ttest, r),
            Self::Anova(r) => StatisticsView::Time(TimeTest::Anova, r),
            Self::Regression(r) => StatisticsView::Regression(r),
            Self::Unrendered { stat_type, error } => {
                StatisticsView::Unrendered { stat_type: stat_type.as_deref(), error: error.as_deref() }
            }
        }
    }
}

/// Borrowed view of a [`StatisticsResult`] grouped by builder.
#[derive(Debug, Clone, Copy)]
pub enum StatisticsView<'a> {
    Time(TimeTest, &'a TimeResults),
    Regression(&'a RegressionResults),
    Unrendered { stat_type: Option<&'a str>, error: Option<&'a str> },
}

/// A decoded analysis result.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Nca(SubjectMap<NcaSubject>),
    Compartmental(SubjectMap<CompartmentalSubject>),
    Bioequivalence(SubjectMap<BioequivalenceEntry>),
    Statistics(StatisticsResult),
}

impl AnalysisResult {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            Self::Nca(_) => AnalysisKind::Nca,
            Self::Compartmental(_) => AnalysisKind::Compartmental,
            Self::Bioequivalence(_) => AnalysisKind::Bioequivalence,
            Self::Statistics(_) => AnalysisKind::Statistics,
        }
    }

    /// Decode the `data` member of an analysis envelope for a known kind.
    pub fn decode(kind: AnalysisKind, data: serde_json::Value) -> Result<Self> {
        Ok(match kind {
            AnalysisKind::Nca => Self::Nca(serde_json::from_value(data)?),
            AnalysisKind::Compartmental => Self::Compartmental(serde_json::from_value(data)?),
            AnalysisKind::Bioequivalence => Self::Bioequivalence(serde_json::from_value(data)?),
            AnalysisKind::Statistics => Self::Statistics(StatisticsResult::from_value(data)?),
        })
    }
}
