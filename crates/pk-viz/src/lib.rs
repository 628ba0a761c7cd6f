//! # pk-viz
//!
//! Pure chart builders for PK analysis results.
//!
//! Each builder maps a typed payload from `pk-core` to a backend-neutral
//! [`ChartSpec`]. The [`dispatch`] function routes an [`pk_core::AnalysisResult`]
//! to the builders and writes the charts into named [`SlotId`]s of a
//! [`RenderSurface`]. [`plotly::figure`] exports a chart for Plotly.js.

#![warn(clippy::all)]

pub mod annotate;
pub mod bioequivalence;
pub mod compartmental;
pub mod concentration;
pub mod dispatch;
pub mod page;
pub mod plotly;
pub mod skip;
pub mod slot;
pub mod spec;
pub mod statistics;

pub use annotate::format_or_na;
pub use bioequivalence::ProfilePair;
pub use dispatch::{
    NO_PLOT_DATA, NO_PREVIEW_DATA, RenderContext, RenderReport, SkippedSlot, dispatch,
    dispatch_decoded, render_dataset, render_preview,
};
pub use page::{Hosted, InlineMessage, MessageLevel, Page, RenderSurface, SlotContent};
pub use skip::{Built, SkipReason};
pub use slot::SlotId;
pub use spec::{ChartSpec, Rgba};
