//! Bioequivalence: T/R ratio with 90% CI, and the test/reference overlay.

use pk_core::{BioequivalenceEntry, BioequivalenceRecord, SubjectMap, SubjectProfile};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::skip::{Built, SkipReason, check_aligned};
use crate::spec::{
    Annotation, AxisScale, AxisSpec, ChartSpec, Dash, Datum, ErrorBars, Layout, LineStyle, Marker,
    Ref, Series, SeriesKind, Shape, colors,
};

pub const RATIO_TITLE: &str = "Bioequivalence Assessment";
pub const PROFILES_TITLE: &str = "Test vs. Reference Profiles";

/// Acceptance limits of the ratio, in percent.
pub const LOWER_LIMIT: f64 = 80.0;
pub const UPPER_LIMIT: f64 = 125.0;
pub const UNITY: f64 = 100.0;

/// Visible ratio range.
pub const Y_RANGE: [f64; 2] = [70.0, 135.0];

/// Test and reference concentration profiles for the overlay chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePair {
    pub test: SubjectMap<SubjectProfile>,
    pub reference: SubjectMap<SubjectProfile>,
}

/// Complete records in document order. Error entries are dropped silently,
/// entries lacking a number are dropped with a warning.
pub fn records(entries: &SubjectMap<BioequivalenceEntry>) -> Vec<(&str, BioequivalenceRecord)> {
    entries
        .iter()
        .filter_map(|(param, entry)| {
            if entry.error.is_some() {
                return None;
            }
            let record = entry.record();
            if record.is_none() {
                warn!(subject = %param, "bioequivalence entry lacks ratio or CI bound");
            }
            record.map(|r| (param, r))
        })
        .collect()
}

/// One point per parameter with asymmetric CI error bars and the 80/100/125
/// reference lines.
pub fn ratio_chart(entries: &SubjectMap<BioequivalenceEntry>) -> Built {
    let records = records(entries);
    if records.is_empty() {
        return Err(SkipReason::NoData);
    }
    let x: Vec<Datum> = records.iter().map(|(p, _)| Datum::from(*p)).collect();
    let ratios: Vec<f64> = records.iter().map(|(_, r)| r.ratio).collect();
    let up: Vec<f64> = records.iter().map(|(_, r)| r.ci_upper - r.ratio).collect();
    let down: Vec<f64> = records.iter().map(|(_, r)| r.ratio - r.ci_lower).collect();
    let point_colors = records
        .iter()
        .map(|(_, r)| if r.is_bioequivalent { colors::GREEN } else { colors::RED })
        .collect();

    let series = vec![
        Series::new(SeriesKind::Markers, x.clone(), ratios.clone())
            .named("Ratio")
            .with_marker(Marker::sized(12.0).per_point(point_colors)),
        Series::new(SeriesKind::Markers, x, ratios)
            .with_marker(Marker::sized(12.0).with_opacity(0.0))
            .with_error_y(ErrorBars::asymmetric(up, down))
            .hide_legend(),
    ];

    let x_end = records.len() as f64 - 0.5;
    let limit = LineStyle::dashed(2.0, colors::RED.with_alpha(0.7));
    let mut layout = Layout::new(
        RATIO_TITLE,
        AxisSpec::titled("Parameter").with_scale(AxisScale::Category),
        AxisSpec::titled("Test/Reference Ratio (%)").with_range(Y_RANGE[0], Y_RANGE[1]),
    );
    layout.shapes = vec![
        Shape::hline(LOWER_LIMIT, -0.5, x_end, limit.clone()),
        Shape::hline(UPPER_LIMIT, -0.5, x_end, limit),
        Shape::hline(UNITY, -0.5, x_end, LineStyle::solid(1.0).colored(colors::GREY.with_alpha(0.5))),
    ];
    layout.annotations = [(LOWER_LIMIT, "80%"), (UPPER_LIMIT, "125%")]
        .into_iter()
        .map(|(y, label)| Annotation {
            lines: vec![label.to_string()],
            x: -0.1,
            y,
            x_ref: Ref::Paper,
            y_ref: Ref::Data,
            color: Some(colors::RED),
            boxed: false,
        })
        .collect();
    Ok(ChartSpec::new(series, layout))
}

/// Test profiles solid, reference profiles dotted, grouped in the legend.
pub fn profile_overlay(pair: &ProfilePair) -> Built {
    let mut series = Vec::with_capacity(pair.test.len() + pair.reference.len());
    let groups = [("Test", "test", Dash::Solid, &pair.test), ("Ref", "reference", Dash::Dot, &pair.reference)];
    for (prefix, group, dash, profiles) in groups {
        for (id, p) in profiles.iter() {
            if let Err(reason) = check_aligned(id, p.times.len(), p.concentrations.len()) {
                warn!(subject = %id, %reason, "profile excluded from test/reference overlay");
                continue;
            }
            series.push(
                Series::numeric(SeriesKind::LinesMarkers, &p.times, &p.concentrations)
                    .named(format!("{prefix} {id}"))
                    .with_marker(Marker::sized(6.0))
                    .with_line(LineStyle::solid(1.0).with_dash(dash))
                    .in_group(group),
            );
        }
    }
    if series.is_empty() {
        return Err(SkipReason::NoData);
    }
    Ok(ChartSpec::new(
        series,
        Layout::new(PROFILES_TITLE, AxisSpec::titled("Time (h)"), AxisSpec::titled("Concentration")),
    ))
}
