//! Filter engine for the decision table listing.

use crate::{
    decision::{index_decisions, DecisionSlot},
    record::ReturnRecord,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    /// Resale value above refurbishment cost, whatever the decision.
    Profitable,
    /// Resale value at or below refurbishment cost, whatever the decision.
    Loss,
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all"        => Some(Self::All),
            "pending"    => Some(Self::Pending),
            "profitable" => Some(Self::Profitable),
            "loss"       => Some(Self::Loss),
            _            => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub search_text: String,
    #[serde(default)]
    pub status: StatusFilter,
}

impl FilterCriteria {
    pub fn new(search_text: impl Into<String>, status: StatusFilter) -> Self {
        Self { search_text: search_text.into(), status }
    }

    fn matches_search(&self, record: &ReturnRecord, needle: &str) -> bool {
        needle.is_empty()
            || record.sku.to_lowercase().contains(needle)
            || record.product_name.to_lowercase().contains(needle)
    }

    fn matches_status(&self, record: &ReturnRecord, pending: bool) -> bool {
        match self.status {
            StatusFilter::All        => true,
            StatusFilter::Pending    => pending,
            StatusFilter::Profitable => record.raw_margin() > 0.0,
            StatusFilter::Loss       => record.raw_margin() <= 0.0,
        }
    }
}

/// Records matching both the search text and the status, in input order.
/// A record without a decision slot counts as pending.
pub fn filter_records<'a>(
    records: &'a [ReturnRecord],
    decisions: &[DecisionSlot],
    criteria: &FilterCriteria,
) -> Vec<&'a ReturnRecord> {
    let by_sku = index_decisions(decisions);
    let needle = criteria.search_text.to_lowercase();
    let kept: Vec<&ReturnRecord> = records
        .iter()
        .filter(|record| {
            let pending = by_sku
                .get(record.sku.as_str())
                .copied()
                .flatten()
                .is_none();
            criteria.matches_search(record, &needle) && criteria.matches_status(record, pending)
        })
        .collect();
    log::debug!(
        "filter: {:?} '{}' kept {}/{}",
        criteria.status,
        criteria.search_text,
        kept.len(),
        records.len()
    );
    kept
}
