//! Notifications emitted after a command has been applied.
//!
//! RULE: an event is only produced once the state it describes is
//! fully in place. Readers never observe a half-applied command.

use crate::{
    decision::Decision,
    filter::FilterCriteria,
    record::InputCoercionWarning,
    types::Sku,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    DatasetLoaded {
        items:    usize,
        warnings: Vec<InputCoercionWarning>,
    },
    DecisionUpdated {
        sku:      Sku,
        previous: Option<Decision>,
        current:  Option<Decision>,
    },
    FilterChanged {
        criteria: FilterCriteria,
        visible:  usize,
    },
}

impl DashboardEvent {
    /// False for a decision update that re-applied the same value.
    pub fn changed_state(&self) -> bool {
        match self {
            Self::DecisionUpdated { previous, current, .. } => previous != current,
            _ => true,
        }
    }
}
