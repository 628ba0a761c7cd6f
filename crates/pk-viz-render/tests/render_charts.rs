use std::path::PathBuf;

use pk_core::{AnalysisEnvelope, SubjectMap, SubjectProfile};
use pk_viz::{Page, ProfilePair, RenderContext, SlotId, dispatch_decoded};
use pk_viz_render::config::resolve_config;
use pk_viz_render::{render_page, render_spec_json, render_to_bytes};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

fn page_for(envelope: &str, ctx: &RenderContext) -> Page {
    let env: AnalysisEnvelope = serde_json::from_str(&fixture(envelope)).unwrap();
    let decoded = env.decode("Error loading analysis results").unwrap();
    let mut page = Page::accept_all();
    dispatch_decoded(&decoded, ctx, &mut page);
    page
}

fn rendered(envelope: &str, ctx: &RenderContext) -> Vec<(SlotId, String)> {
    render_page(&page_for(envelope, ctx), &resolve_config(None, None).unwrap()).unwrap()
}

fn svg_for<'a>(out: &'a [(SlotId, String)], slot: &SlotId) -> &'a str {
    out.iter().find(|(s, _)| s == slot).map(|(_, svg)| svg.as_str()).unwrap()
}

#[test]
fn nca_page_renders_three_svgs() {
    let out = rendered("nca_envelope.json", &RenderContext::default());
    let slots: Vec<_> = out.iter().map(|(s, _)| s.clone()).collect();
    assert_eq!(slots, vec![SlotId::ConcTimeLinear, SlotId::ConcTimeSemilog, SlotId::EliminationPlot]);
    for (_, svg) in &out {
        assert!(svg.starts_with("<svg") && svg.trim_end().ends_with("</svg>"));
    }
    let elim = svg_for(&out, &SlotId::EliminationPlot);
    assert!(elim.contains("λz = 0.2228"));
    assert!(elim.contains("Concentration (log scale)"));
}

#[test]
fn compartmental_residuals_only_for_complete_subjects() {
    let out = rendered("compartmental_envelope.json", &RenderContext::default());
    assert!(out.iter().any(|(s, _)| *s == SlotId::residuals("S1")));
    assert!(!out.iter().any(|(s, _)| *s == SlotId::residuals("S3")));
    assert!(svg_for(&out, &SlotId::residuals("S1")).contains("Zero Line"));
}

#[test]
fn bioequivalence_limits_and_overlay() {
    let test: SubjectMap<SubjectProfile> = serde_json::from_str(&fixture("test_profiles.json")).unwrap();
    let reference: SubjectMap<SubjectProfile> =
        serde_json::from_str(&fixture("reference_profiles.json")).unwrap();
    let ctx = RenderContext::default().with_profiles(ProfilePair { test, reference });
    let out = rendered("bioequivalence_envelope.json", &ctx);

    let be = svg_for(&out, &SlotId::BioequivalencePlot);
    assert!(be.contains(">80%<") && be.contains(">125%<"));
    assert!(be.contains("cmax") && !be.contains("auc_inf"));
    assert!(svg_for(&out, &SlotId::ProfilesPlot).contains("Test 1"));
}

#[test]
fn statistics_time_results_render_error_bars() {
    let out = rendered("statistics_ttest_envelope.json", &RenderContext::default());
    let svg = svg_for(&out, &SlotId::TimeResultsPlot);
    assert!(svg.contains("T-test Results by Time Point"));
    assert!(svg.matches("<line").count() > 3);
}

#[test]
fn light_theme_and_yaml_overrides_apply() {
    let config = resolve_config(Some("light"), Some("figure:\n  width: 800\n")).unwrap();
    let page = page_for("statistics_regression_envelope.json", &RenderContext::default());
    let out = render_page(&page, &config).unwrap();
    let svg = svg_for(&out, &SlotId::RegressionPlot);
    assert!(svg.contains(r#"width="800""#));
    assert!(svg.contains("Slope = "));
}

#[test]
fn chart_json_roundtrips_through_renderer() {
    let page = page_for("nca_envelope.json", &RenderContext::default());
    let chart = page.chart(&SlotId::ConcTimeLinear).unwrap();
    let json = serde_json::to_string(chart).unwrap();
    let svg = render_spec_json(&json, &resolve_config(None, None).unwrap()).unwrap();
    assert!(svg.contains("Subject 101"));
}

#[test]
fn unknown_output_format_is_rejected() {
    let page = page_for("nca_envelope.json", &RenderContext::default());
    let chart = page.chart(&SlotId::ConcTimeLinear).unwrap();
    let err = render_to_bytes(chart, "bmp", &resolve_config(None, None).unwrap()).unwrap_err();
    assert!(err.to_string().contains("bmp"));
}

#[test]
fn malformed_color_in_chart_json_is_a_deserialize_error() {
    let page = page_for("bioequivalence_envelope.json", &RenderContext::default());
    let chart = page.chart(&SlotId::BioequivalencePlot).unwrap();
    let json = serde_json::to_string(chart).unwrap();
    let start = json.find("\"rgba(").unwrap();
    let end = start + 1 + json[start + 1..].find('"').unwrap();
    let broken = format!("{}\"#aé123{}", &json[..start], &json[end..]);

    let err = render_spec_json(&broken, &resolve_config(None, None).unwrap()).unwrap_err();
    assert!(matches!(err, pk_viz_render::RenderError::Deserialize(_)), "got {err}");
}
