//! Writing a rendered [`Page`] to disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use pk_viz::{Page, RenderReport, SlotContent, SlotId};
use pk_viz_render::config::{VizConfig, resolve_config};

use crate::OutputArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plotly.js figure JSON (`data`, `layout`, `config`)
    Plotly,
    /// Backend-neutral chart spec JSON
    Spec,
    Svg,
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Plotly | Self::Spec => "json",
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

/// Theme plus optional YAML overrides.
pub fn load_config(out: &OutputArgs) -> Result<VizConfig> {
    let yaml = match &out.config {
        Some(path) => Some(
            std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?,
        ),
        None => None,
    };
    Ok(resolve_config(out.theme.as_deref(), yaml.as_deref())?)
}

/// One file per populated slot plus `report.json`. Returns the written paths.
pub fn write_page(page: &Page, report: &RenderReport, out: &OutputArgs) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&out.out_dir)
        .with_context(|| format!("creating {}", out.out_dir.display()))?;
    let config = match out.format {
        OutputFormat::Svg | OutputFormat::Png => Some(load_config(out)?),
        OutputFormat::Plotly | OutputFormat::Spec => None,
    };

    let mut written = Vec::new();
    for (slot, content) in page.iter() {
        let stem = file_stem(slot);
        let path = match content {
            SlotContent::Empty => continue,
            SlotContent::Chart(chart) => {
                let path = out.out_dir.join(format!("{stem}.{}", out.format.extension()));
                match out.format {
                    OutputFormat::Plotly => write_json(&path, &pk_viz::plotly::figure(chart))?,
                    OutputFormat::Spec => write_json(&path, chart)?,
                    OutputFormat::Svg | OutputFormat::Png => {
                        let config = config.as_ref().context("no render config loaded")?;
                        pk_viz_render::render_to_file(chart, &path, config)
                            .with_context(|| format!("rendering {slot}"))?
                    }
                }
                path
            }
            SlotContent::Message(message) => {
                let path = out.out_dir.join(format!("{stem}.txt"));
                std::fs::write(&path, format!("{}\n", message.text))?;
                path
            }
            SlotContent::Table(rows) => {
                let path = out.out_dir.join(format!("{stem}.json"));
                write_json(&path, rows)?;
                path
            }
        };
        tracing::info!(slot = %slot, path = %path.display(), "wrote");
        written.push(path);
    }

    let report_path = out.out_dir.join("report.json");
    write_json(&report_path, report)?;
    written.push(report_path);
    Ok(written)
}

/// File name for a slot. Residual slots embed a server-supplied subject id,
/// so anything outside `[A-Za-z0-9_-]` becomes `_` and the file stays in
/// the output directory.
fn file_stem(slot: &SlotId) -> String {
    slot.element_id()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_slots_keep_their_id() {
        assert_eq!(file_stem(&SlotId::ConcTimeSemilog), "concTimeSemilog");
        assert_eq!(file_stem(&SlotId::residuals("S1")), "residualsPlot-S1");
    }

    #[test]
    fn subject_ids_cannot_leave_the_output_dir() {
        assert_eq!(file_stem(&SlotId::residuals("../escaped")), "residualsPlot-___escaped");
        assert_eq!(file_stem(&SlotId::residuals("a/b\\c")), "residualsPlot-a_b_c");
    }
}
