//! Live per-item dispositions chosen by the user.
//!
//! Every record owns exactly one `DecisionSlot`. A slot starts pending
//! and may move to any decision (or back to pending) any number of times.

use crate::types::Sku;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Refurbish,
    Resell,
    Recycle,
    Discard,
}

impl Decision {
    pub const ALL: [Decision; 4] = [
        Decision::Refurbish,
        Decision::Resell,
        Decision::Recycle,
        Decision::Discard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Refurbish => "refurbish",
            Self::Resell    => "resell",
            Self::Recycle   => "recycle",
            Self::Discard   => "discard",
        }
    }

    /// Case-insensitive parse. Empty, "pending" and unknown text yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "refurbish" => Some(Self::Refurbish),
            "resell"    => Some(Self::Resell),
            "recycle"   => Some(Self::Recycle),
            "discard"   => Some(Self::Discard),
            _           => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The decision slot for one record. `decision == None` means pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionSlot {
    pub sku:      Sku,
    pub decision: Option<Decision>,
}

impl DecisionSlot {
    pub fn pending(sku: impl Into<Sku>) -> Self {
        Self { sku: sku.into(), decision: None }
    }

    pub fn is_pending(&self) -> bool {
        self.decision.is_none()
    }
}

/// Index decision slots by sku. Later duplicates win.
pub(crate) fn index_decisions(decisions: &[DecisionSlot]) -> HashMap<&str, Option<Decision>> {
    decisions
        .iter()
        .map(|slot| (slot.sku.as_str(), slot.decision))
        .collect()
}
