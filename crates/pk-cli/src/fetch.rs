//! `pkviz fetch`: load from a running analysis server.

use std::time::Duration;

use anyhow::Result;
use pk_client::{ApiClient, load_analysis, load_dataset, shared_page};
use pk_viz::{Page, RenderReport, SlotContent, SlotId};

use crate::output::write_page;
use crate::render::{build_context, build_page, summary};
use crate::{ChartArgs, OutputArgs, ServerArgs};

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread().enable_all().build()?)
}

fn client(server: &ServerArgs) -> Result<ApiClient> {
    Ok(ApiClient::new(&server.base_url, Duration::from_secs(server.timeout_secs))?)
}

pub fn cmd_fetch_analysis(id: u64, server: &ServerArgs, chart: &ChartArgs, out: &OutputArgs) -> Result<()> {
    let client = client(server)?;
    let ctx = build_context(chart)?;
    let page = shared_page(build_page(&chart.slots)?);

    let report = runtime()?.block_on(load_analysis(&client, id, &ctx, &page)).unwrap_or_default();

    let page = page.blocking_lock();
    let written = write_page(&page, &report, out)?;
    println!("{}", serde_json::to_string_pretty(&summary(&report, written.len()))?);
    Ok(())
}

pub fn cmd_fetch_dataset(id: u64, server: &ServerArgs, out: Option<&OutputArgs>) -> Result<()> {
    let client = client(server)?;
    let page = shared_page(Page::with_slots([SlotId::DataPreview, SlotId::DataPlotPreview]));

    let report: RenderReport = runtime()?.block_on(load_dataset(&client, id, &page)).unwrap_or_default();

    let page = page.blocking_lock();
    match page.get(&SlotId::DataPreview) {
        Some(SlotContent::Table(rows)) => {
            println!("subject_id\ttime\tconcentration");
            for row in rows {
                println!("{}\t{}\t{}", row.subject_id, row.time, row.concentration);
            }
        }
        Some(SlotContent::Message(message)) => eprintln!("{}", message.text),
        _ => {}
    }

    if let Some(out) = out {
        write_page(&page, &report, out)?;
    }
    Ok(())
}
