//! Concentration-time family: linear, semi-log and elimination phase.
//!
//! Also used for the dataset plot, which has the same per-subject shape.

use pk_core::{DatasetProfile, NcaSubject, SubjectMap, SubjectProfile};
use tracing::warn;

use crate::annotate::{diagnostic_box, elimination_lines};
use crate::skip::{Built, SkipReason, check_aligned, select_subject};
use crate::spec::{AxisScale, AxisSpec, ChartSpec, Layout, LineStyle, Marker, Series, SeriesKind, colors};

pub const LINEAR_TITLE: &str = "Concentration vs. Time";
pub const SEMILOG_TITLE: &str = "Semi-log Concentration vs. Time";
pub const ELIMINATION_TITLE: &str = "Elimination Phase";

/// Observed profiles of the NCA subjects that carry both arrays.
pub fn nca_profiles(subjects: &SubjectMap<NcaSubject>) -> SubjectMap<SubjectProfile> {
    subjects
        .iter()
        .filter_map(|(id, s)| match s.profile() {
            Some(p) => Some((id.to_string(), p)),
            None => {
                warn!(subject = %id, "NCA subject has no concentration profile");
                None
            }
        })
        .collect()
}

/// Dataset plot rows keyed by subject. A repeated id replaces the earlier row.
pub fn dataset_profiles(rows: &[DatasetProfile]) -> SubjectMap<SubjectProfile> {
    let mut out = SubjectMap::new();
    for row in rows {
        out.insert(
            row.subject_id.clone(),
            SubjectProfile::new(row.times.clone(), row.concentrations.clone()),
        );
    }
    out
}

/// One `lines+markers` series per subject, linear axes.
pub fn concentration_linear(profiles: &SubjectMap<SubjectProfile>) -> Built {
    let mut series = Vec::with_capacity(profiles.len());
    let mut rejected = None;
    for (id, p) in profiles.iter() {
        if let Err(reason) = check_aligned(id, p.times.len(), p.concentrations.len()) {
            warn!(subject = %id, %reason, "profile excluded from concentration-time chart");
            rejected.get_or_insert(reason);
            continue;
        }
        series.push(
            Series::numeric(SeriesKind::LinesMarkers, &p.times, &p.concentrations)
                .named(format!("Subject {id}"))
                .with_marker(Marker::sized(8.0)),
        );
    }
    if series.is_empty() {
        return Err(rejected.unwrap_or(SkipReason::NoData));
    }
    Ok(ChartSpec::new(
        series,
        Layout::new(LINEAR_TITLE, AxisSpec::titled("Time (h)"), AxisSpec::titled("Concentration")),
    ))
}

/// Same series as [`concentration_linear`] on a log y-axis.
pub fn concentration_semilog(profiles: &SubjectMap<SubjectProfile>) -> Built {
    concentration_linear(profiles).map(|chart| chart.semilog(SEMILOG_TITLE))
}

/// Observed points and the terminal-phase regression line of one subject.
///
/// Skipped when the subject has no `adjusted_points`.
pub fn elimination_phase(subjects: &SubjectMap<NcaSubject>, selected: Option<&str>) -> Built {
    let (id, subject) = select_subject(subjects, selected)?;
    let mut missing = Vec::new();
    if subject.times.is_none() {
        missing.push("times");
    }
    if subject.concentrations.is_none() {
        missing.push("concentrations");
    }
    if subject.adjusted_points.is_none() {
        missing.push("adjusted_points");
    }
    let (Some(times), Some(conc), Some(points)) =
        (&subject.times, &subject.concentrations, &subject.adjusted_points)
    else {
        return Err(SkipReason::missing(id, &missing));
    };
    check_aligned(id, times.len(), conc.len())?;

    let (fit_t, fit_c): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
    let series = vec![
        Series::numeric(SeriesKind::Markers, times, conc)
            .named("Observed")
            .with_marker(Marker::sized(10.0)),
        Series::numeric(SeriesKind::Lines, &fit_t, &fit_c)
            .named("λz Regression")
            .with_line(LineStyle::dashed(2.0, colors::RED)),
    ];
    let mut layout = Layout::new(
        ELIMINATION_TITLE,
        AxisSpec::titled("Time (h)"),
        AxisSpec::titled("Concentration (log scale)").with_scale(AxisScale::Log),
    );
    layout.annotations.push(diagnostic_box(elimination_lines(&subject.diagnostic())));
    Ok(ChartSpec::new(series, layout))
}
