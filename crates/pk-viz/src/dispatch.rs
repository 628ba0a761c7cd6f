//! Analysis type → builders → slots.

use pk_core::{AnalysisResult, DatasetProfile, DecodedAnalysis, PreviewRow, StatisticsView};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bioequivalence::{self, ProfilePair};
use crate::page::{InlineMessage, RenderSurface};
use crate::skip::{Built, SkipReason};
use crate::slot::SlotId;
use crate::{compartmental, concentration, statistics};

pub const NO_PREVIEW_DATA: &str = "No data available for preview";
pub const NO_PLOT_DATA: &str = "No plot data available";

/// Inputs besides the payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    /// Profiles for the bioequivalence overlay; without them `profilesPlot`
    /// is left alone.
    pub profiles: Option<ProfilePair>,
    /// Subject for the elimination, model-fit and regression charts. `None`
    /// selects the first subject.
    pub subject: Option<String>,
}

impl RenderContext {
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_profiles(mut self, profiles: ProfilePair) -> Self {
        self.profiles = Some(profiles);
        self
    }
}

/// A slot that was hosted but left unrendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSlot {
    pub slot: SlotId,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// What one dispatch did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    pub rendered: Vec<SlotId>,
    pub skipped: Vec<SkippedSlot>,
}

impl RenderReport {
    pub fn skip_reason(&self, slot: &SlotId) -> Option<&SkipReason> {
        self.skipped.iter().find(|s| &s.slot == slot).map(|s| &s.reason)
    }

    /// Append another report's entries.
    pub fn merge(&mut self, other: RenderReport) {
        if self.analysis.is_none() {
            self.analysis = other.analysis;
        }
        self.rendered.extend(other.rendered);
        self.skipped.extend(other.skipped);
    }

    fn place<S: RenderSurface + ?Sized>(&mut self, surface: &mut S, slot: SlotId, build: impl FnOnce() -> Built) {
        if !surface.has_slot(&slot) {
            debug!(slot = %slot, "slot not hosted");
            return;
        }
        match build() {
            Ok(chart) => {
                surface.render(&slot, chart);
                debug!(slot = %slot, "chart rendered");
                self.rendered.push(slot);
            }
            Err(reason) => {
                warn!(slot = %slot, %reason, "chart skipped");
                self.skipped.push(SkippedSlot { slot, reason });
            }
        }
    }
}

/// Build every chart for `result` and place it on `surface`.
pub fn dispatch<S: RenderSurface + ?Sized>(
    result: &AnalysisResult,
    ctx: &RenderContext,
    surface: &mut S,
) -> RenderReport {
    let mut report = RenderReport { analysis: Some(result.kind().to_string()), ..Default::default() };
    let subject = ctx.subject.as_deref();
    debug!(analysis = %result.kind(), "dispatching analysis result");

    match result {
        AnalysisResult::Nca(subjects) => {
            let profiles = concentration::nca_profiles(subjects);
            report.place(surface, SlotId::ConcTimeLinear, || concentration::concentration_linear(&profiles));
            report.place(surface, SlotId::ConcTimeSemilog, || concentration::concentration_semilog(&profiles));
            report.place(surface, SlotId::EliminationPlot, || concentration::elimination_phase(subjects, subject));
        }
        AnalysisResult::Compartmental(subjects) => {
            report.place(surface, SlotId::ModelFitPlot, || compartmental::model_fit(subjects, subject));
            report.place(surface, SlotId::ModelFitSemilog, || {
                compartmental::model_fit_semilog(subjects, subject)
            });
            for (id, s) in subjects.iter() {
                report.place(surface, SlotId::residuals(id), || compartmental::residuals(id, s));
            }
        }
        AnalysisResult::Bioequivalence(entries) => {
            report.place(surface, SlotId::BioequivalencePlot, || bioequivalence::ratio_chart(entries));
            match &ctx.profiles {
                Some(pair) => {
                    report.place(surface, SlotId::ProfilesPlot, || bioequivalence::profile_overlay(pair))
                }
                None => debug!("no test/reference profiles supplied"),
            }
        }
        AnalysisResult::Statistics(stats) => match stats.view() {
            StatisticsView::Time(test, results) => {
                report.place(surface, SlotId::TimeResultsPlot, || {
                    statistics::time_results_chart(test, results)
                });
            }
            StatisticsView::Regression(results) => {
                report.place(surface, SlotId::RegressionPlot, || {
                    statistics::regression_chart(results, subject)
                });
                if results.regression_results.len() > 1 {
                    report.place(surface, SlotId::HalfLifePlot, || statistics::half_life_chart(results));
                }
            }
            StatisticsView::Unrendered { stat_type, error: Some(error) } => {
                warn!(stat_type = stat_type.unwrap_or("none"), %error, "statistics run failed; no charts");
            }
            StatisticsView::Unrendered { stat_type, error: None } => {
                debug!(stat_type = stat_type.unwrap_or("none"), "no charts for statistics type");
            }
        },
    }
    report
}

/// [`dispatch`] for a decoded envelope; unsupported types are a no-op.
pub fn dispatch_decoded<S: RenderSurface + ?Sized>(
    decoded: &DecodedAnalysis,
    ctx: &RenderContext,
    surface: &mut S,
) -> RenderReport {
    match decoded {
        DecodedAnalysis::Supported(result) => dispatch(result, ctx, surface),
        DecodedAnalysis::Unsupported(kind) => {
            debug!(analysis = %kind, "no charts for analysis type");
            RenderReport { analysis: Some(kind.clone()), ..Default::default() }
        }
    }
}

/// Dataset preview table into `dataPreview`.
pub fn render_preview<S: RenderSurface + ?Sized>(rows: Vec<PreviewRow>, surface: &mut S) {
    let slot = SlotId::DataPreview;
    if !surface.has_slot(&slot) {
        return;
    }
    if rows.is_empty() {
        surface.show_message(&slot, InlineMessage::info(NO_PREVIEW_DATA));
    } else {
        surface.show_table(&slot, rows);
    }
}

/// Dataset concentration-time chart into `dataPlotPreview`.
pub fn render_dataset<S: RenderSurface + ?Sized>(rows: &[DatasetProfile], surface: &mut S) -> RenderReport {
    let mut report = RenderReport::default();
    let slot = SlotId::DataPlotPreview;
    if rows.is_empty() {
        if surface.has_slot(&slot) {
            surface.show_message(&slot, InlineMessage::info(NO_PLOT_DATA));
        }
        return report;
    }
    let profiles = concentration::dataset_profiles(rows);
    report.place(surface, slot, || concentration::concentration_linear(&profiles));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;
    use pk_core::{
        AnalysisKind, CompartmentalSubject, RegressionResults, RegressionSubject, StatisticsResult,
        SubjectMap, SubjectProfile,
    };
    use serde_json::json;

    fn nca() -> AnalysisResult {
        AnalysisResult::decode(
            AnalysisKind::Nca,
            json!({
                "S1": {"times": [0, 1, 2], "concentrations": [0, 5, 2.5],
                       "lambda_z": 0.69, "r_squared": 0.99, "half_life": 1.0,
                       "adjusted_points": [[1, 5], [2, 2.5]]},
                "S2": {"times": [0, 1, 2], "concentrations": [0, 4, 2]},
                "summary": {"cmax_mean": 4.5}
            }),
        )
        .unwrap()
    }

    #[test]
    fn nca_fills_three_slots() {
        let mut page = Page::accept_all();
        let report = dispatch(&nca(), &RenderContext::default(), &mut page);
        assert_eq!(
            report.rendered,
            vec![SlotId::ConcTimeLinear, SlotId::ConcTimeSemilog, SlotId::EliminationPlot]
        );
        assert!(report.skipped.is_empty());
        assert_eq!(page.chart(&SlotId::ConcTimeLinear).unwrap().series.len(), 2);
    }

    #[test]
    fn selected_subject_without_points_is_reported() {
        let mut page = Page::accept_all();
        let ctx = RenderContext::default().with_subject("S2");
        let report = dispatch(&nca(), &ctx, &mut page);
        assert!(matches!(
            report.skip_reason(&SlotId::EliminationPlot),
            Some(SkipReason::MissingFields { subject, .. }) if subject == "S2"
        ));
        assert!(page.get(&SlotId::EliminationPlot).is_none());
    }

    #[test]
    fn missing_slot_is_silent() {
        let mut page = Page::with_slots([SlotId::ConcTimeSemilog]);
        let report = dispatch(&nca(), &RenderContext::default(), &mut page);
        assert_eq!(report.rendered, vec![SlotId::ConcTimeSemilog]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn compartmental_missing_prediction_skips_fit_only() {
        let mut subjects = SubjectMap::new();
        subjects.insert(
            "S1",
            CompartmentalSubject {
                observed_times: Some(vec![1.0, 2.0]),
                observed_concentrations: Some(vec![3.0, 2.0]),
                predicted_times: Some(vec![1.0, 2.0]),
                goodness_of_fit: Some(pk_core::GoodnessOfFit {
                    residuals: Some(vec![0.1, -0.1]),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let mut page = Page::accept_all();
        let report = dispatch(&AnalysisResult::Compartmental(subjects), &RenderContext::default(), &mut page);
        assert!(page.get(&SlotId::ModelFitPlot).is_none());
        assert!(report.skip_reason(&SlotId::ModelFitPlot).is_some());
        assert!(page.chart(&SlotId::residuals("S1")).is_some());
    }

    #[test]
    fn profiles_need_context() {
        let entries = AnalysisResult::decode(
            AnalysisKind::Bioequivalence,
            json!({"cmax": {"ratio": 100.0, "ci_lower": 95.0, "ci_upper": 105.0, "is_bioequivalent": true}}),
        )
        .unwrap();
        let mut page = Page::accept_all();
        dispatch(&entries, &RenderContext::default(), &mut page);
        assert!(page.get(&SlotId::ProfilesPlot).is_none());

        let mut pair = ProfilePair::default();
        pair.test.insert("1", SubjectProfile::new(vec![0.0, 1.0], vec![0.0, 1.0]));
        let report = dispatch(&entries, &RenderContext::default().with_profiles(pair), &mut page);
        assert_eq!(report.rendered, vec![SlotId::BioequivalencePlot, SlotId::ProfilesPlot]);
    }

    #[test]
    fn single_regression_subject_has_no_half_life_chart() {
        let mut map = SubjectMap::new();
        map.insert(
            "A",
            RegressionSubject {
                half_life: Some(5.2),
                times: Some(vec![1.0]),
                observed: Some(vec![2.0]),
                predicted: Some(vec![2.0]),
                ..Default::default()
            },
        );
        let result = AnalysisResult::Statistics(StatisticsResult::Regression(RegressionResults {
            n_subjects: Some(1),
            regression_results: map,
        }));
        let mut page = Page::accept_all();
        let report = dispatch(&result, &RenderContext::default(), &mut page);
        assert_eq!(report.rendered, vec![SlotId::RegressionPlot]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn unsupported_type_is_noop() {
        let mut page = Page::accept_all();
        let report =
            dispatch_decoded(&DecodedAnalysis::Unsupported("DataProcessing".into()), &RenderContext::default(), &mut page);
        assert!(report.rendered.is_empty());
        assert_eq!(page.iter().count(), 0);
    }

    #[test]
    fn failed_statistics_run_is_noop() {
        let result = AnalysisResult::decode(
            AnalysisKind::Statistics,
            json!({"error": "Insufficient common time points for t-test analysis"}),
        )
        .unwrap();
        let mut page = Page::accept_all();
        let report = dispatch(&result, &RenderContext::default(), &mut page);
        assert_eq!(report.analysis.as_deref(), Some("Statistics"));
        assert!(report.rendered.is_empty());
        assert!(report.skipped.is_empty());
        assert_eq!(page.iter().count(), 0);
    }

    #[test]
    fn empty_dataset_shows_info() {
        let mut page = Page::accept_all();
        render_dataset(&[], &mut page);
        render_preview(vec![], &mut page);
        assert_eq!(page.message(&SlotId::DataPlotPreview).unwrap().text, NO_PLOT_DATA);
        assert_eq!(page.message(&SlotId::DataPreview).unwrap().text, NO_PREVIEW_DATA);
    }

    #[test]
    fn report_json_flattens_reason() {
        let report = RenderReport {
            analysis: Some("NCA".into()),
            rendered: vec![SlotId::ConcTimeLinear],
            skipped: vec![SkippedSlot { slot: SlotId::EliminationPlot, reason: SkipReason::NoData }],
        };
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["skipped"][0]["slot"], "eliminationPlot");
        assert_eq!(v["skipped"][0]["reason"], "no_data");
        let back: RenderReport = serde_json::from_value(v).unwrap();
        assert_eq!(back, report);
    }
}
