//! `pkviz render`: offline rendering of a saved analysis envelope.

use std::path::Path;

use anyhow::{Context, Result};
use pk_core::{AnalysisEnvelope, SubjectMap, SubjectProfile};
use pk_viz::{InlineMessage, Page, ProfilePair, RenderContext, RenderReport, RenderSurface, SlotId};

use crate::output::write_page;
use crate::{ChartArgs, OutputArgs};

const ANALYSIS_FAILED: &str = "Error loading analysis results";
const ALL_RESIDUALS: &str = "residualsPlot-*";

pub fn cmd_render(input: &Path, chart: &ChartArgs, out: &OutputArgs) -> Result<()> {
    let text = std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let envelope: AnalysisEnvelope =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", input.display()))?;

    let ctx = build_context(chart)?;
    let mut page = build_page(&chart.slots)?;

    let report = match envelope.decode(ANALYSIS_FAILED) {
        Ok(decoded) => pk_viz::dispatch_decoded(&decoded, &ctx, &mut page),
        Err(err) => {
            tracing::error!(error = %err, "analysis envelope rejected");
            let text = match err {
                pk_core::Error::Envelope(_) => ANALYSIS_FAILED.to_string(),
                other => format!("Error: {other}"),
            };
            if page.has_slot(&SlotId::AnalysisPlots) {
                page.show_message(&SlotId::AnalysisPlots, InlineMessage::error(text));
            }
            RenderReport::default()
        }
    };

    let written = write_page(&page, &report, out)?;
    println!("{}", serde_json::to_string_pretty(&summary(&report, written.len()))?);
    Ok(())
}

/// Profiles, selected subject.
pub fn build_context(chart: &ChartArgs) -> Result<RenderContext> {
    let mut ctx = RenderContext::default();
    if let Some(subject) = &chart.subject {
        ctx = ctx.with_subject(subject.clone());
    }
    if let (Some(test), Some(reference)) = (&chart.test, &chart.reference) {
        ctx = ctx.with_profiles(ProfilePair { test: read_profiles(test)?, reference: read_profiles(reference)? });
    }
    Ok(ctx)
}

fn read_profiles(path: &Path) -> Result<SubjectMap<SubjectProfile>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing profiles {}", path.display()))
}

/// Page hosting `slots`, or every slot when none are named.
pub fn build_page(slots: &[String]) -> Result<Page> {
    if slots.is_empty() {
        return Ok(Page::accept_all());
    }
    let mut ids = Vec::new();
    let mut all_residuals = false;
    for s in slots {
        if s == ALL_RESIDUALS {
            all_residuals = true;
            continue;
        }
        ids.push(s.parse::<SlotId>().map_err(anyhow::Error::msg)?);
    }
    let page = Page::with_slots(ids);
    Ok(if all_residuals { page.with_all_residuals() } else { page })
}

pub fn summary(report: &RenderReport, files: usize) -> serde_json::Value {
    serde_json::json!({
        "analysis": report.analysis,
        "rendered": report.rendered.len(),
        "skipped": report.skipped.len(),
        "files": files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pk_viz::Hosted;

    #[test]
    fn empty_slot_list_hosts_everything() {
        assert_eq!(build_page(&[]).unwrap().hosted(), &Hosted::Any);
    }

    #[test]
    fn residual_wildcard_hosts_all_subjects() {
        let page = build_page(&["modelFitPlot".into(), "residualsPlot-*".into()]).unwrap();
        assert!(page.has_slot(&SlotId::ModelFitPlot));
        assert!(page.has_slot(&SlotId::residuals("S9")));
        assert!(!page.has_slot(&SlotId::ConcTimeLinear));
    }

    #[test]
    fn unknown_slot_is_an_error() {
        let err = build_page(&["nope".into()]).unwrap_err();
        assert!(err.to_string().contains("unknown slot id"));
    }
}
