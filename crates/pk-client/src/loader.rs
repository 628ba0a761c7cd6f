//! Fetch-and-render loaders.
//!
//! Each loader awaits one request, then locks the shared page just long
//! enough to write its slots. Concurrent loaders target disjoint slots; when
//! two loads race for the same slot the later response wins.

use std::sync::Arc;

use pk_viz::{InlineMessage, Page, RenderContext, RenderReport, RenderSurface, SlotId};
use tokio::sync::Mutex;

use crate::client::ApiClient;
use crate::error::ClientError;

pub const PREVIEW_FAILED: &str = "Error loading dataset preview";
pub const PLOT_DATA_FAILED: &str = "Error loading plot data";
pub const ANALYSIS_FAILED: &str = "Error loading analysis results";

pub type SharedPage = Arc<Mutex<Page>>;

pub fn shared_page(page: Page) -> SharedPage {
    Arc::new(Mutex::new(page))
}

/// Text shown in the originating slot for a failed load.
fn failure_text(err: &ClientError, envelope_failure: &str) -> String {
    match err {
        ClientError::Core(pk_core::Error::Envelope(_)) => envelope_failure.to_string(),
        other => format!("Error: {other}"),
    }
}

async fn report_failure(page: &SharedPage, slot: SlotId, err: &ClientError, envelope_failure: &str) {
    tracing::error!(slot = %slot, error = %err, "load failed");
    let mut page = page.lock().await;
    if page.has_slot(&slot) {
        page.show_message(&slot, InlineMessage::error(failure_text(err, envelope_failure)));
    }
}

/// Fill `dataPreview`. Returns `false` when the fetch or the envelope failed.
pub async fn load_dataset_preview(client: &ApiClient, id: u64, page: &SharedPage) -> bool {
    let fetched = match client.dataset_preview(id).await {
        Ok(env) => env.into_data_or_default(PREVIEW_FAILED).map_err(ClientError::from),
        Err(e) => Err(e),
    };
    match fetched {
        Ok(rows) => {
            tracing::debug!(dataset = id, rows = rows.len(), "preview loaded");
            pk_viz::render_preview(rows, &mut *page.lock().await);
            true
        }
        Err(e) => {
            report_failure(page, SlotId::DataPreview, &e, PREVIEW_FAILED).await;
            false
        }
    }
}

/// Fill `dataPlotPreview`; `None` when the load failed.
pub async fn load_dataset_plot(client: &ApiClient, id: u64, page: &SharedPage) -> Option<RenderReport> {
    let fetched = match client.dataset_plot_data(id).await {
        Ok(env) => env.into_data_or_default(PLOT_DATA_FAILED).map_err(ClientError::from),
        Err(e) => Err(e),
    };
    match fetched {
        Ok(rows) => {
            tracing::debug!(dataset = id, subjects = rows.len(), "plot data loaded");
            Some(pk_viz::render_dataset(&rows, &mut *page.lock().await))
        }
        Err(e) => {
            report_failure(page, SlotId::DataPlotPreview, &e, PLOT_DATA_FAILED).await;
            None
        }
    }
}

/// Preview first; the plot data is only requested once the preview loaded.
pub async fn load_dataset(client: &ApiClient, id: u64, page: &SharedPage) -> Option<RenderReport> {
    if !load_dataset_preview(client, id, page).await {
        return None;
    }
    load_dataset_plot(client, id, page).await
}

/// Fetch an analysis and dispatch it into the page. Fetch and envelope
/// failures land in `analysisPlots`.
pub async fn load_analysis(
    client: &ApiClient,
    id: u64,
    ctx: &RenderContext,
    page: &SharedPage,
) -> Option<RenderReport> {
    let decoded = match client.analysis_plot_data(id).await {
        Ok(env) => env.decode(ANALYSIS_FAILED).map_err(ClientError::from),
        Err(e) => Err(e),
    };
    match decoded {
        Ok(decoded) => {
            let report = pk_viz::dispatch_decoded(&decoded, ctx, &mut *page.lock().await);
            tracing::debug!(
                analysis = id,
                rendered = report.rendered.len(),
                skipped = report.skipped.len(),
                "analysis rendered"
            );
            Some(report)
        }
        Err(e) => {
            report_failure(page, SlotId::AnalysisPlots, &e, ANALYSIS_FAILED).await;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_failures_use_fixed_text() {
        let err = ClientError::Core(pk_core::Error::Envelope("Analysis not found".into()));
        assert_eq!(failure_text(&err, ANALYSIS_FAILED), "Error loading analysis results");
    }

    #[test]
    fn other_failures_carry_detail() {
        let err = ClientError::Core(pk_core::Error::Validation("envelope has no data".into()));
        assert_eq!(failure_text(&err, PREVIEW_FAILED), "Error: Validation error: envelope has no data");
    }
}
