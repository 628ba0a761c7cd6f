use std::path::PathBuf;
use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use pk_client::{ApiClient, load_analysis, load_dataset, shared_page};
use pk_viz::{MessageLevel, NO_PLOT_DATA, NO_PREVIEW_DATA, Page, RenderContext, SlotId};
use serde_json::{Value, json};

fn fixture(name: &str) -> Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures").join(name);
    let text = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()));
    serde_json::from_str(&text).unwrap()
}

async fn analysis(Path(id): Path<u64>) -> impl IntoResponse {
    let body = match id {
        1 => fixture("nca_envelope.json"),
        2 => fixture("statistics_ttest_envelope.json"),
        3 => fixture("unsupported_envelope.json"),
        _ => return (StatusCode::NOT_FOUND, Json(fixture("failed_envelope.json"))),
    };
    (StatusCode::OK, Json(body))
}

async fn preview(Path(id): Path<u64>) -> Json<Value> {
    match id {
        1 => Json(json!({"success": true, "data": [
            {"subject_id": 1, "time": 0.0, "concentration": 0.0},
            {"subject_id": 1, "time": 1.0, "concentration": 4.2}
        ]})),
        2 => Json(json!({"success": true})),
        _ => Json(json!({"success": false})),
    }
}

async fn plot_data(Path(id): Path<u64>) -> Json<Value> {
    if id == 2 {
        return Json(json!({"success": true}));
    }
    Json(json!({"success": true, "data": [
        {"subject_id": 1, "times": [0.0, 1.0, 2.0], "concentrations": [0.0, 4.2, 2.1]},
        {"subject_id": "2", "times": [0.0, 1.0], "concentrations": [0.0, 3.9]}
    ]}))
}

async fn serve() -> ApiClient {
    let app = Router::new()
        .route("/api/analysis/{id}/plot-data", get(analysis))
        .route("/api/dataset/{id}/preview", get(preview))
        .route("/api/dataset/{id}/plot-data", get(plot_data));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    ApiClient::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn analysis_renders_into_page() {
    let client = serve().await;
    let page = shared_page(Page::accept_all());
    let report = load_analysis(&client, 1, &RenderContext::default(), &page).await.unwrap();
    assert_eq!(report.analysis.as_deref(), Some("NCA"));
    let page = page.lock().await;
    assert!(page.chart(&SlotId::ConcTimeLinear).is_some());
    assert!(page.chart(&SlotId::EliminationPlot).is_some());
}

#[tokio::test]
async fn failed_envelope_shows_fixed_message() {
    let client = serve().await;
    let page = shared_page(Page::accept_all());
    assert!(load_analysis(&client, 99, &RenderContext::default(), &page).await.is_none());
    let page = page.lock().await;
    let msg = page.message(&SlotId::AnalysisPlots).unwrap();
    assert_eq!(msg.text, "Error loading analysis results");
    assert_eq!(msg.level, MessageLevel::Error);
}

#[tokio::test]
async fn unsupported_type_renders_nothing() {
    let client = serve().await;
    let page = shared_page(Page::accept_all());
    let report = load_analysis(&client, 3, &RenderContext::default(), &page).await.unwrap();
    assert!(report.rendered.is_empty());
    assert_eq!(page.lock().await.iter().count(), 0);
}

#[tokio::test]
async fn concurrent_loads_fill_disjoint_slots() {
    let client = serve().await;
    let page = shared_page(Page::accept_all());
    let ctx = RenderContext::default();
    let (a, b) = tokio::join!(load_analysis(&client, 1, &ctx, &page), load_analysis(&client, 2, &ctx, &page));
    assert!(a.is_some() && b.is_some());
    let page = page.lock().await;
    assert!(page.chart(&SlotId::ConcTimeLinear).is_some());
    assert!(page.chart(&SlotId::TimeResultsPlot).is_some());
}

#[tokio::test]
async fn dataset_preview_then_plot() {
    let client = serve().await;
    let page = shared_page(Page::accept_all());
    let report = load_dataset(&client, 1, &page).await.unwrap();
    assert_eq!(report.rendered, vec![SlotId::DataPlotPreview]);
    let page = page.lock().await;
    assert_eq!(page.table(&SlotId::DataPreview).unwrap().len(), 2);
    let chart = page.chart(&SlotId::DataPlotPreview).unwrap();
    assert_eq!(chart.series.len(), 2);
}

#[tokio::test]
async fn dataset_without_data_shows_info() {
    let client = serve().await;
    let page = shared_page(Page::accept_all());
    let report = load_dataset(&client, 2, &page).await.unwrap();
    assert!(report.rendered.is_empty());
    let page = page.lock().await;
    let preview = page.message(&SlotId::DataPreview).unwrap();
    assert_eq!(preview.text, NO_PREVIEW_DATA);
    assert_eq!(preview.level, MessageLevel::Info);
    assert_eq!(page.message(&SlotId::DataPlotPreview).unwrap().text, NO_PLOT_DATA);
}

#[tokio::test]
async fn failed_preview_skips_plot_request() {
    let client = serve().await;
    let page = shared_page(Page::accept_all());
    assert!(load_dataset(&client, 7, &page).await.is_none());
    let page = page.lock().await;
    assert_eq!(page.message(&SlotId::DataPreview).unwrap().text, "Error loading dataset preview");
    assert!(page.get(&SlotId::DataPlotPreview).is_none());
}

#[tokio::test]
async fn transport_errors_carry_detail() {
    let page = shared_page(Page::accept_all());
    // Nothing listens on port 9 of the loopback interface.
    let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    assert!(load_analysis(&client, 1, &RenderContext::default(), &page).await.is_none());
    let page = page.lock().await;
    assert!(page.message(&SlotId::AnalysisPlots).unwrap().text.starts_with("Error: "));
}
