//! Named rendering targets of the analysis and dataset pages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const RESIDUALS_PREFIX: &str = "residualsPlot-";

/// Element id of a chart or message slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlotId {
    ConcTimeLinear,
    ConcTimeSemilog,
    EliminationPlot,
    ModelFitPlot,
    ModelFitSemilog,
    /// One per compartmental subject.
    ResidualsPlot(String),
    BioequivalencePlot,
    ProfilesPlot,
    TimeResultsPlot,
    RegressionPlot,
    HalfLifePlot,
    DataPreview,
    DataPlotPreview,
    /// Container receiving analysis fetch errors.
    AnalysisPlots,
}

impl SlotId {
    /// Every slot with a fixed id (all but the per-subject residual slots).
    pub const FIXED: [SlotId; 13] = [
        Self::ConcTimeLinear,
        Self::ConcTimeSemilog,
        Self::EliminationPlot,
        Self::ModelFitPlot,
        Self::ModelFitSemilog,
        Self::BioequivalencePlot,
        Self::ProfilesPlot,
        Self::TimeResultsPlot,
        Self::RegressionPlot,
        Self::HalfLifePlot,
        Self::DataPreview,
        Self::DataPlotPreview,
        Self::AnalysisPlots,
    ];

    pub fn residuals(subject: impl Into<String>) -> Self {
        Self::ResidualsPlot(subject.into())
    }

    /// DOM element id.
    pub fn element_id(&self) -> String {
        match self {
            Self::ResidualsPlot(subject) => format!("{RESIDUALS_PREFIX}{subject}"),
            other => other.fixed_id().to_string(),
        }
    }

    fn fixed_id(&self) -> &'static str {
        match self {
            Self::ConcTimeLinear => "concTimeLinear",
            Self::ConcTimeSemilog => "concTimeSemilog",
            Self::EliminationPlot => "eliminationPlot",
            Self::ModelFitPlot => "modelFitPlot",
            Self::ModelFitSemilog => "modelFitSemilog",
            Self::ResidualsPlot(_) => "residualsPlot",
            Self::BioequivalencePlot => "bioequivalencePlot",
            Self::ProfilesPlot => "profilesPlot",
            Self::TimeResultsPlot => "timeResultsPlot",
            Self::RegressionPlot => "regressionPlot",
            Self::HalfLifePlot => "halfLifePlot",
            Self::DataPreview => "dataPreview",
            Self::DataPlotPreview => "dataPlotPreview",
            Self::AnalysisPlots => "analysisPlots",
        }
    }

    /// Whether the slot holds a chart (as opposed to a table or message area).
    pub fn is_chart(&self) -> bool {
        !matches!(self, Self::DataPreview | Self::AnalysisPlots)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResidualsPlot(subject) => write!(f, "{RESIDUALS_PREFIX}{subject}"),
            other => f.write_str(other.fixed_id()),
        }
    }
}

impl FromStr for SlotId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(subject) = s.strip_prefix(RESIDUALS_PREFIX) {
            if subject.is_empty() {
                return Err(format!("slot id needs a subject: {s}"));
            }
            return Ok(Self::ResidualsPlot(subject.to_string()));
        }
        Self::FIXED
            .iter()
            .find(|slot| slot.fixed_id() == s)
            .cloned()
            .ok_or_else(|| format!("unknown slot id: {s}"))
    }
}

impl Serialize for SlotId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
