use crate::{
    decision::Decision,
    filter::StatusFilter,
    types::{Row, Sku},
};
use serde::{Deserialize, Serialize};

/// Every state change the dashboard accepts.
/// All mutation of a loaded dataset flows through these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum DashboardCommand {
    // ── Dataset lifecycle ─────────────────────────
    LoadDataset {
        rows: Vec<Row>,
    },
    LoadSample {
        count: usize,
        seed:  u64,
        #[serde(default)]
        with_dispositions: bool,
    },

    // ── Decisions ─────────────────────────────────
    /// `decision: null` resets the item to pending.
    SetDecision {
        sku:      Sku,
        decision: Option<Decision>,
    },

    // ── Listing ───────────────────────────────────
    SetFilter {
        #[serde(default)]
        search_text: String,
        #[serde(default)]
        status: StatusFilter,
    },
}

impl DashboardCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadDataset { .. } => "load_dataset",
            Self::LoadSample { .. }  => "load_sample",
            Self::SetDecision { .. } => "set_decision",
            Self::SetFilter { .. }   => "set_filter",
        }
    }
}
