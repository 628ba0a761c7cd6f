//! Rendering surfaces and the in-memory [`Page`].

use std::collections::{BTreeMap, BTreeSet};

use pk_core::PreviewRow;
use serde::{Deserialize, Serialize};

use crate::slot::SlotId;
use crate::spec::ChartSpec;

/// Severity of an inline message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Error,
}

/// Text shown in place of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineMessage {
    pub level: MessageLevel,
    pub text: String,
}

impl InlineMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: MessageLevel::Info, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: MessageLevel::Error, text: text.into() }
    }
}

/// Charting backend the dispatcher writes into.
///
/// Writes to a slot the surface does not host must be ignored by callers;
/// use [`RenderSurface::has_slot`] first.
pub trait RenderSurface {
    fn has_slot(&self, slot: &SlotId) -> bool;
    fn render(&mut self, slot: &SlotId, chart: ChartSpec);
    fn show_message(&mut self, slot: &SlotId, message: InlineMessage);
    fn show_table(&mut self, slot: &SlotId, rows: Vec<PreviewRow>);
}

/// Current content of one slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum SlotContent {
    #[default]
    Empty,
    Chart(ChartSpec),
    Message(InlineMessage),
    Table(Vec<PreviewRow>),
}

/// Which slots a page hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hosted {
    Any,
    Only {
        slots: BTreeSet<SlotId>,
        /// Host `residualsPlot-<id>` for every subject.
        all_residuals: bool,
    },
}

/// In-memory surface. Writing a slot replaces what was there.
#[derive(Debug, Clone)]
pub struct Page {
    hosted: Hosted,
    slots: BTreeMap<SlotId, SlotContent>,
}

impl Page {
    /// Hosts every slot, including all residual slots.
    pub fn accept_all() -> Self {
        Self { hosted: Hosted::Any, slots: BTreeMap::new() }
    }

    /// Hosts exactly `slots`.
    pub fn with_slots(slots: impl IntoIterator<Item = SlotId>) -> Self {
        Self {
            hosted: Hosted::Only { slots: slots.into_iter().collect(), all_residuals: false },
            slots: BTreeMap::new(),
        }
    }

    /// Also host every per-subject residual slot.
    pub fn with_all_residuals(mut self) -> Self {
        if let Hosted::Only { all_residuals, .. } = &mut self.hosted {
            *all_residuals = true;
        }
        self
    }

    pub fn hosted(&self) -> &Hosted {
        &self.hosted
    }

    pub fn get(&self, slot: &SlotId) -> Option<&SlotContent> {
        self.slots.get(slot)
    }

    pub fn chart(&self, slot: &SlotId) -> Option<&ChartSpec> {
        match self.slots.get(slot)? {
            SlotContent::Chart(c) => Some(c),
            _ => None,
        }
    }

    pub fn message(&self, slot: &SlotId) -> Option<&InlineMessage> {
        match self.slots.get(slot)? {
            SlotContent::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn table(&self, slot: &SlotId) -> Option<&[PreviewRow]> {
        match self.slots.get(slot)? {
            SlotContent::Table(rows) => Some(rows),
            _ => None,
        }
    }

    /// Populated slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&SlotId, &SlotContent)> + '_ {
        self.slots.iter().filter(|(_, c)| !matches!(c, SlotContent::Empty))
    }

    pub fn charts(&self) -> impl Iterator<Item = (&SlotId, &ChartSpec)> + '_ {
        self.slots.iter().filter_map(|(slot, c)| match c {
            SlotContent::Chart(chart) => Some((slot, chart)),
            _ => None,
        })
    }

    /// Reset a slot to [`SlotContent::Empty`].
    pub fn clear(&mut self, slot: &SlotId) {
        self.slots.remove(slot);
    }

    fn put(&mut self, slot: &SlotId, content: SlotContent) {
        if self.has_slot(slot) {
            self.slots.insert(slot.clone(), content);
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::accept_all()
    }
}

impl RenderSurface for Page {
    fn has_slot(&self, slot: &SlotId) -> bool {
        match &self.hosted {
            Hosted::Any => true,
            Hosted::Only { slots, all_residuals } => {
                slots.contains(slot) || (*all_residuals && matches!(slot, SlotId::ResidualsPlot(_)))
            }
        }
    }

    fn render(&mut self, slot: &SlotId, chart: ChartSpec) {
        self.put(slot, SlotContent::Chart(chart));
    }

    fn show_message(&mut self, slot: &SlotId, message: InlineMessage) {
        self.put(slot, SlotContent::Message(message));
    }

    fn show_table(&mut self, slot: &SlotId, rows: Vec<PreviewRow>) {
        self.put(slot, SlotContent::Table(rows));
    }
}
