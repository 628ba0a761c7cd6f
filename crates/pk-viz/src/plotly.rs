//! Export a [`ChartSpec`] as a Plotly.js figure.
//!
//! The result is `{data, layout, config}` and can be handed unchanged to
//! `Plotly.newPlot(el, fig.data, fig.layout, fig.config)`.

use serde_json::{Map, Value, json};

use crate::spec::{
    Annotation, AxisScale, AxisSpec, ChartSpec, Dash, ErrorBars, LineStyle, Marker, MarkerColor, Ref,
    Series, SeriesKind, Shape,
};

pub const TEMPLATE: &str = "plotly_dark";

const ANNOTATION_BG: &str = "rgba(0,0,0,0.7)";
const ANNOTATION_BORDER: &str = "rgba(255,255,255,0.5)";

/// Full figure: traces, layout and the responsive config.
pub fn figure(chart: &ChartSpec) -> Value {
    json!({
        "data": chart.series.iter().map(trace).collect::<Vec<_>>(),
        "layout": layout(chart),
        "config": {"responsive": true},
    })
}

fn trace(series: &Series) -> Value {
    let mut t = Map::new();
    match series.kind {
        SeriesKind::Bar => {
            t.insert("type".into(), json!("bar"));
        }
        kind => {
            t.insert("type".into(), json!("scatter"));
            t.insert("mode".into(), serde_json::to_value(kind).unwrap_or(Value::Null));
        }
    }
    t.insert("x".into(), json!(series.x));
    t.insert("y".into(), json!(series.y));
    if let Some(name) = &series.name {
        t.insert("name".into(), json!(name));
    }
    if let Some(marker) = &series.marker {
        t.insert("marker".into(), marker_json(marker, series.kind));
    }
    if let Some(line) = &series.line {
        t.insert("line".into(), line_json(line));
    }
    if let Some(err) = &series.error_y {
        t.insert("error_y".into(), error_json(err));
    }
    if let Some(group) = &series.legend_group {
        t.insert("legendgroup".into(), json!(group));
    }
    if !series.show_legend {
        t.insert("showlegend".into(), json!(false));
    }
    Value::Object(t)
}

fn marker_json(marker: &Marker, kind: SeriesKind) -> Value {
    let mut m = Map::new();
    if kind != SeriesKind::Bar {
        m.insert("size".into(), json!(marker.size));
    }
    match &marker.color {
        Some(MarkerColor::Uniform(c)) => {
            m.insert("color".into(), json!(c.css()));
        }
        Some(MarkerColor::PerPoint(cs)) => {
            m.insert("color".into(), json!(cs.iter().map(|c| c.css()).collect::<Vec<_>>()));
        }
        None => {}
    }
    if marker.opacity < 1.0 {
        m.insert("opacity".into(), json!(marker.opacity));
    }
    if let Some(line) = &marker.line {
        m.insert("line".into(), line_json(line));
    }
    Value::Object(m)
}

fn line_json(line: &LineStyle) -> Value {
    let mut l = Map::new();
    l.insert("width".into(), json!(line.width));
    if let Some(c) = &line.color {
        l.insert("color".into(), json!(c.css()));
    }
    match line.dash {
        Dash::Solid => {}
        Dash::Dash => {
            l.insert("dash".into(), json!("dash"));
        }
        Dash::Dot => {
            l.insert("dash".into(), json!("dot"));
        }
    }
    Value::Object(l)
}

fn error_json(err: &ErrorBars) -> Value {
    let mut e = json!({
        "type": "data",
        "array": err.plus,
        "visible": true,
        "thickness": err.thickness,
        "width": err.cap_width,
    });
    if let (Some(minus), Value::Object(obj)) = (&err.minus, &mut e) {
        obj.insert("symmetric".into(), json!(false));
        obj.insert("arrayminus".into(), json!(minus));
    }
    e
}

fn axis_json(axis: &AxisSpec) -> Value {
    let mut a = Map::new();
    a.insert("title".into(), json!(axis.title));
    a.insert("zeroline".into(), json!(axis.zero_line));
    match axis.scale {
        AxisScale::Linear => {}
        AxisScale::Log => {
            a.insert("type".into(), json!("log"));
        }
        AxisScale::Category => {
            a.insert("type".into(), json!("category"));
        }
    }
    if let Some(range) = axis.range {
        a.insert("range".into(), json!(range));
    }
    Value::Object(a)
}

fn axis_ref(r: Ref, data: &str) -> &'static str {
    match (r, data) {
        (Ref::Paper, _) => "paper",
        (Ref::Data, "x") => "x",
        (Ref::Data, _) => "y",
    }
}

fn annotation_json(a: &Annotation) -> Value {
    let mut out = json!({
        "x": a.x,
        "y": a.y,
        "xref": axis_ref(a.x_ref, "x"),
        "yref": axis_ref(a.y_ref, "y"),
        "text": a.lines.join("<br>"),
        "showarrow": false,
    });
    if let Value::Object(obj) = &mut out {
        if let Some(c) = &a.color {
            obj.insert("font".into(), json!({"color": c.css()}));
        }
        if a.boxed {
            obj.insert("bgcolor".into(), json!(ANNOTATION_BG));
            obj.insert("bordercolor".into(), json!(ANNOTATION_BORDER));
            obj.insert("borderwidth".into(), json!(1));
        }
    }
    out
}

fn shape_json(s: &Shape) -> Value {
    json!({
        "type": "line",
        "x0": s.x0,
        "y0": s.y0,
        "x1": s.x1,
        "y1": s.y1,
        "line": line_json(&s.line),
    })
}

fn layout(chart: &ChartSpec) -> Value {
    let l = &chart.layout;
    let mut out = json!({
        "title": l.title,
        "xaxis": axis_json(&l.x_axis),
        "yaxis": axis_json(&l.y_axis),
        "hovermode": "closest",
        "template": TEMPLATE,
        "autosize": true,
    });
    if let Value::Object(obj) = &mut out {
        if !l.annotations.is_empty() {
            obj.insert("annotations".into(), l.annotations.iter().map(annotation_json).collect());
        }
        if !l.shapes.is_empty() {
            obj.insert("shapes".into(), l.shapes.iter().map(shape_json).collect());
        }
        if !l.show_legend {
            obj.insert("showlegend".into(), json!(false));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bioequivalence::ratio_chart;
    use crate::statistics::half_life_chart;
    use pk_core::{BioequivalenceEntry, RegressionResults, RegressionSubject, SubjectMap};

    fn be_chart() -> ChartSpec {
        let mut m = SubjectMap::new();
        m.insert(
            "cmax",
            BioequivalenceEntry {
                ratio: Some(98.0),
                ci_lower: Some(90.0),
                ci_upper: Some(107.0),
                is_bioequivalent: true,
                error: None,
            },
        );
        ratio_chart(&m).unwrap()
    }

    #[test]
    fn ratio_figure_matches_plotly_schema() {
        let fig = figure(&be_chart());
        assert_eq!(fig["data"][0]["type"], "scatter");
        assert_eq!(fig["data"][0]["mode"], "markers");
        assert_eq!(fig["data"][0]["marker"]["color"][0], "rgba(99, 255, 132, 1)");
        assert_eq!(fig["data"][1]["error_y"]["symmetric"], false);
        assert_eq!(fig["data"][1]["error_y"]["arrayminus"][0], 8.0);
        assert_eq!(fig["data"][1]["showlegend"], false);
        assert_eq!(fig["data"][1]["marker"]["opacity"], 0.0);
        assert_eq!(fig["layout"]["xaxis"]["type"], "category");
        assert_eq!(fig["layout"]["yaxis"]["range"], json!([70.0, 135.0]));
        assert_eq!(fig["layout"]["shapes"][0]["line"]["dash"], "dash");
        assert_eq!(fig["layout"]["annotations"][0]["yref"], "y");
        assert_eq!(fig["layout"]["template"], "plotly_dark");
        assert_eq!(fig["config"]["responsive"], true);
    }

    #[test]
    fn bars_have_no_mode() {
        let mut map = SubjectMap::new();
        map.insert("A", RegressionSubject { half_life: Some(5.2), ..Default::default() });
        map.insert("B", RegressionSubject::default());
        let chart = half_life_chart(&RegressionResults { n_subjects: None, regression_results: map }).unwrap();
        let fig = figure(&chart);
        assert_eq!(fig["data"][0]["type"], "bar");
        assert!(fig["data"][0].get("mode").is_none());
        assert_eq!(fig["data"][0]["marker"]["line"]["width"], 1.5);
        assert_eq!(fig["data"][0]["x"], json!(["A"]));
    }

    #[test]
    fn boxed_annotation_uses_br() {
        let a = crate::annotate::diagnostic_box(vec!["a".into(), "b".into()]);
        let v = annotation_json(&a);
        assert_eq!(v["text"], "a<br>b");
        assert_eq!(v["bgcolor"], ANNOTATION_BG);
        assert_eq!(v["xref"], "paper");
    }
}
