//! Statistics: per-time-point means, per-subject regression, half-life bars.

use pk_core::{RegressionResults, TimeResults, TimeTest};
use tracing::warn;

use crate::annotate::{diagnostic_box, regression_lines};
use crate::skip::{Built, SkipReason, check_aligned, select_subject};
use crate::spec::{
    AxisScale, AxisSpec, ChartSpec, Datum, ErrorBars, Layout, LineStyle, Marker, Series, SeriesKind,
    colors,
};

pub const REGRESSION_TITLE: &str = "Regression Analysis";
pub const HALF_LIFE_TITLE: &str = "Half-Life Comparison";

/// One plotted time point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePoint {
    pub time: f64,
    pub mean: f64,
    pub error: f64,
    pub significant: bool,
}

/// Time points sorted strictly ascending by numeric time.
///
/// Keys that are not numbers and entries without a mean are dropped with a
/// warning. The error bar is `sem`, else `std / sqrt(n)` with the entry's own
/// `n_subjects` preferred over the payload's, else zero.
pub fn time_points(results: &TimeResults) -> Vec<TimePoint> {
    let mut points = Vec::with_capacity(results.time_results.len());
    for (key, r) in results.time_results.iter() {
        let Some(time) = key.trim().parse::<f64>().ok().filter(|t| t.is_finite()) else {
            warn!(time = %key, "time key is not a number");
            continue;
        };
        let Some(mean) = r.mean else {
            warn!(time = %key, "time point has no mean");
            continue;
        };
        let n = r.n_subjects.or(results.n_subjects).filter(|n| *n > 0);
        let error = match (r.sem, r.std, n) {
            (Some(sem), _, _) => sem,
            (None, Some(std), Some(n)) => std / f64::from(n).sqrt(),
            _ => 0.0,
        };
        points.push(TimePoint { time, mean, error, significant: r.significant });
    }
    points.sort_by(|a, b| a.time.total_cmp(&b.time));
    points.dedup_by(|later, earlier| later.time == earlier.time);
    points
}

/// Mean ± SEM by time, markers colored by significance.
pub fn time_results_chart(test: TimeTest, results: &TimeResults) -> Built {
    let points = time_points(results);
    if points.is_empty() {
        return Err(SkipReason::NoData);
    }
    let times: Vec<f64> = points.iter().map(|p| p.time).collect();
    let means: Vec<f64> = points.iter().map(|p| p.mean).collect();
    let errors = points.iter().map(|p| p.error).collect();
    let point_colors =
        points.iter().map(|p| if p.significant { colors::RED } else { colors::GREEN }).collect();

    let series = vec![
        Series::numeric(SeriesKind::LinesMarkers, &times, &means)
            .named("Mean")
            .with_marker(Marker::sized(10.0).per_point(point_colors))
            .with_error_y(ErrorBars::symmetric(errors)),
    ];
    Ok(ChartSpec::new(
        series,
        Layout::new(
            format!("{} Results by Time Point", test.label()),
            AxisSpec::titled("Time (h)"),
            AxisSpec::titled("Concentration (Mean ± SEM)"),
        ),
    ))
}

/// Observed vs. predicted for one subject on a log y-axis.
pub fn regression_chart(results: &RegressionResults, selected: Option<&str>) -> Built {
    let (id, subject) = select_subject(&results.regression_results, selected)?;
    let (Some(times), Some(observed), Some(predicted)) =
        (&subject.times, &subject.observed, &subject.predicted)
    else {
        let missing: Vec<&str> = [
            ("times", subject.times.is_none()),
            ("observed", subject.observed.is_none()),
            ("predicted", subject.predicted.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();
        return Err(SkipReason::missing(id, &missing));
    };
    check_aligned(id, times.len(), observed.len())?;
    check_aligned(id, times.len(), predicted.len())?;

    let series = vec![
        Series::numeric(SeriesKind::Markers, times, observed)
            .named("Observed")
            .with_marker(Marker::sized(10.0)),
        Series::numeric(SeriesKind::Lines, times, predicted)
            .named("Regression")
            .with_line(LineStyle::solid(2.0).colored(colors::RED)),
    ];
    let mut layout = Layout::new(
        REGRESSION_TITLE,
        AxisSpec::titled("Time (h)"),
        AxisSpec::titled("Concentration").with_scale(AxisScale::Log),
    );
    layout.annotations.push(diagnostic_box(regression_lines(&subject.diagnostic())));
    Ok(ChartSpec::new(series, layout))
}

/// Half-life per subject. Needs more than one subject; subjects without a
/// half-life are left out.
pub fn half_life_chart(results: &RegressionResults) -> Built {
    let subjects = &results.regression_results;
    if subjects.len() < 2 {
        return Err(SkipReason::NoData);
    }
    let (labels, values): (Vec<Datum>, Vec<f64>) = subjects
        .iter()
        .filter_map(|(id, s)| s.half_life.map(|h| (Datum::from(id), h)))
        .unzip();
    if values.is_empty() {
        return Err(SkipReason::NoData);
    }
    let bar = colors::BLUE;
    let series = vec![
        Series::new(SeriesKind::Bar, labels, values).with_marker(
            Marker::sized(0.0)
                .colored(bar.with_alpha(0.7))
                .outlined(LineStyle::solid(1.5).colored(bar)),
        ),
    ];
    let mut layout = Layout::new(
        HALF_LIFE_TITLE,
        AxisSpec::titled("Subject").with_scale(AxisScale::Category),
        AxisSpec::titled("Half-Life (h)"),
    );
    layout.show_legend = false;
    Ok(ChartSpec::new(series, layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use pk_core::{RegressionSubject, SubjectMap, TimePointResult};

    fn tp(mean: f64, sem: Option<f64>, std: Option<f64>, significant: bool) -> TimePointResult {
        TimePointResult { mean: Some(mean), sem, std, significant, ..Default::default() }
    }

    #[test]
    fn times_sorted_numerically() {
        let mut map = SubjectMap::new();
        map.insert("4", tp(1.0, Some(0.1), None, false));
        map.insert("1", tp(3.0, Some(0.2), None, true));
        map.insert("2", tp(2.0, Some(0.3), None, false));
        map.insert("10", tp(0.5, Some(0.1), None, false));
        let results = TimeResults { n_subjects: Some(6), time_results: map };
        let times: Vec<f64> = time_points(&results).iter().map(|p| p.time).collect();
        assert_eq!(times, vec![1.0, 2.0, 4.0, 10.0]);
    }

    #[test]
    fn sem_derived_from_std() {
        let mut map = SubjectMap::new();
        map.insert("1.0", tp(3.0, None, Some(2.0), false));
        let mut anova = tp(3.0, None, Some(3.0), false);
        anova.n_subjects = Some(9);
        map.insert("2.0", anova);
        let results = TimeResults { n_subjects: Some(4), time_results: map };
        let pts = time_points(&results);
        assert_abs_diff_eq!(pts[0].error, 1.0);
        assert_abs_diff_eq!(pts[1].error, 1.0);
    }

    #[test]
    fn bad_keys_and_duplicates_dropped() {
        let mut map = SubjectMap::new();
        map.insert("baseline", tp(1.0, None, None, false));
        map.insert("1", tp(2.0, None, None, false));
        map.insert("1.0", tp(9.0, None, None, false));
        map.insert("3", TimePointResult::default());
        let results = TimeResults { n_subjects: None, time_results: map };
        let pts = time_points(&results);
        assert_eq!(pts.len(), 1);
        assert_abs_diff_eq!(pts[0].mean, 2.0);
        assert_abs_diff_eq!(pts[0].error, 0.0);
    }

    #[test]
    fn title_names_the_test() {
        let mut map = SubjectMap::new();
        map.insert("1", tp(1.0, Some(0.1), None, true));
        let results = TimeResults { n_subjects: Some(3), time_results: map };
        let chart = time_results_chart(TimeTest::Anova, &results).unwrap();
        assert_eq!(chart.layout.title, "ANOVA Results by Time Point");
        let color = chart.series[0].marker.as_ref().unwrap().color.as_ref().unwrap();
        assert_eq!(color.at(0), Some(colors::RED));
        assert_eq!(
            time_results_chart(TimeTest::Ttest, &TimeResults::default()),
            Err(SkipReason::NoData)
        );
    }

    fn regression() -> RegressionResults {
        let mut map = SubjectMap::new();
        map.insert(
            "A",
            RegressionSubject {
                slope: Some(-0.1333),
                r_squared: Some(0.995),
                half_life: Some(5.2),
                times: Some(vec![1.0, 2.0, 4.0]),
                observed: Some(vec![10.0, 8.7, 6.6]),
                predicted: Some(vec![10.0, 8.75, 6.65]),
                error: None,
            },
        );
        map.insert("B", RegressionSubject { error: Some("Insufficient data points".into()), ..Default::default() });
        RegressionResults { n_subjects: Some(2), regression_results: map }
    }

    #[test]
    fn regression_uses_first_subject() {
        let chart = regression_chart(&regression(), None).unwrap();
        assert_eq!(chart.layout.y_axis.scale, AxisScale::Log);
        assert_eq!(chart.layout.annotations[0].lines[0], "Slope = -0.1333");
        assert_eq!(chart.layout.annotations[0].lines[2], "t½ = 5.2000 h");
        assert!(matches!(
            regression_chart(&regression(), Some("B")),
            Err(SkipReason::MissingFields { ref fields, .. }) if fields.len() == 3
        ));
    }

    #[test]
    fn half_life_skips_null() {
        let chart = half_life_chart(&regression()).unwrap();
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].x, vec![Datum::from("A")]);
        assert_eq!(chart.series[0].y, vec![5.2]);
    }

    #[test]
    fn half_life_needs_two_subjects() {
        let mut r = regression();
        r.regression_results = r.regression_results.iter().take(1).map(|(k, v)| (k.to_string(), v.clone())).collect();
        assert_eq!(half_life_chart(&r), Err(SkipReason::NoData));
    }
}
