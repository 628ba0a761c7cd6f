//! Compartmental fit: observed vs. predicted overlay and residual scatter.

use pk_core::{CompartmentalSubject, SubjectMap};

use crate::skip::{Built, SkipReason, check_aligned, select_subject};
use crate::spec::{AxisSpec, ChartSpec, Datum, Layout, LineStyle, Marker, Series, SeriesKind, colors};

/// Observed markers and the model curve for one subject.
pub fn model_fit(subjects: &SubjectMap<CompartmentalSubject>, selected: Option<&str>) -> Built {
    let (id, subject) = select_subject(subjects, selected)?;
    let (Some(obs_t), Some(obs_c), Some(pred_t), Some(pred_c)) = (
        &subject.observed_times,
        &subject.observed_concentrations,
        &subject.predicted_times,
        &subject.predicted_concentrations,
    ) else {
        return Err(SkipReason::missing(id, &subject.missing_fit_fields()));
    };
    check_aligned(id, obs_t.len(), obs_c.len())?;
    check_aligned(id, pred_t.len(), pred_c.len())?;

    let series = vec![
        Series::numeric(SeriesKind::Markers, obs_t, obs_c)
            .named("Observed")
            .with_marker(Marker::sized(10.0).colored(colors::GREEN)),
        Series::numeric(SeriesKind::Lines, pred_t, pred_c)
            .named("Model Fit")
            .with_line(LineStyle::solid(2.0).colored(colors::PURPLE)),
    ];
    Ok(ChartSpec::new(
        series,
        Layout::new(
            format!("Model Fit - Subject {id}"),
            AxisSpec::titled("Time (h)"),
            AxisSpec::titled("Concentration"),
        ),
    ))
}

/// [`model_fit`] on a log y-axis, title suffixed ` (Semi-log)`.
pub fn model_fit_semilog(subjects: &SubjectMap<CompartmentalSubject>, selected: Option<&str>) -> Built {
    model_fit(subjects, selected).map(|chart| {
        let title = format!("{} (Semi-log)", chart.layout.title);
        chart.semilog(title)
    })
}

/// Residuals against observation index `1..=N` with a dashed zero line.
pub fn residuals(id: &str, subject: &CompartmentalSubject) -> Built {
    let residuals = subject
        .residuals()
        .ok_or_else(|| SkipReason::missing(id, &["goodness_of_fit.residuals"]))?;
    if residuals.is_empty() {
        return Err(SkipReason::NoData);
    }
    let n = residuals.len();
    let index: Vec<Datum> = (1..=n).map(|i| Datum::Number(i as f64)).collect();
    let series = vec![
        Series::new(SeriesKind::Markers, index, residuals.to_vec())
            .named("Residuals")
            .with_marker(Marker::sized(10.0).colored(colors::RED)),
        Series::numeric(SeriesKind::Lines, &[1.0, n as f64], &[0.0, 0.0])
            .named("Zero Line")
            .with_line(LineStyle::dashed(1.0, colors::GREY.with_alpha(0.8))),
    ];
    Ok(ChartSpec::new(
        series,
        Layout::new(
            format!("Residuals Plot - Subject {id}"),
            AxisSpec::titled("Observation"),
            AxisSpec::titled("Residual").with_zero_line(),
        ),
    ))
}
