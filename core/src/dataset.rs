//! The record and decision store for one loaded dataset.
//!
//! RULES:
//!   - Records and decision slots share one key set, always.
//!   - A load replaces everything; nothing is ever merged.
//!   - Every mutation is all-or-nothing: on error the store is unchanged.

use crate::{
    decision::{Decision, DecisionSlot},
    error::{DashboardError, DashboardResult},
    record::ReturnRecord,
    types::Sku,
};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ReturnDataset {
    records:   Vec<ReturnRecord>,
    decisions: Vec<DecisionSlot>,
    index:     HashMap<Sku, usize>,
}

impl ReturnDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh store with every decision pending.
    /// Fails if two records share a sku.
    pub fn from_records(records: Vec<ReturnRecord>) -> DashboardResult<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if record.sku.trim().is_empty() {
                return Err(DashboardError::Validation {
                    reason: format!("record {} has an empty SKU", position + 1),
                });
            }
            if index.insert(record.sku.clone(), position).is_some() {
                return Err(DashboardError::DuplicateSku { sku: record.sku.clone() });
            }
        }
        let decisions = records
            .iter()
            .map(|r| DecisionSlot::pending(r.sku.clone()))
            .collect();
        Ok(Self { records, decisions, index })
    }

    /// Replace the entire store. On error the previous dataset is kept.
    pub fn load_dataset(&mut self, records: Vec<ReturnRecord>) -> DashboardResult<()> {
        let next = Self::from_records(records)?;
        *self = next;
        log::info!("dataset: loaded {} records", self.records.len());
        Ok(())
    }

    /// Set (or clear, with `None`) the decision for an existing sku.
    /// Returns the previous value. Setting the same value twice is a no-op.
    pub fn set_decision(
        &mut self,
        sku: &str,
        decision: Option<Decision>,
    ) -> DashboardResult<Option<Decision>> {
        let position = self.position(sku)?;
        let slot = &mut self.decisions[position];
        let previous = slot.decision;
        slot.decision = decision;
        log::debug!(
            "dataset: decision {sku} {} -> {}",
            label(previous),
            label(decision)
        );
        Ok(previous)
    }

    pub fn get_record(&self, sku: &str) -> DashboardResult<&ReturnRecord> {
        let position = self.position(sku)?;
        Ok(&self.records[position])
    }

    pub fn get_decision(&self, sku: &str) -> DashboardResult<&DecisionSlot> {
        let position = self.position(sku)?;
        Ok(&self.decisions[position])
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[ReturnRecord] {
        &self.records
    }

    /// Decision slots, aligned position-for-position with `records()`.
    pub fn decisions(&self) -> &[DecisionSlot] {
        &self.decisions
    }

    /// Each record paired with its live decision.
    pub fn pairs(&self) -> impl Iterator<Item = (&ReturnRecord, Option<Decision>)> {
        self.records
            .iter()
            .zip(self.decisions.iter())
            .map(|(record, slot)| (record, slot.decision))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.index.contains_key(sku)
    }

    pub fn decided_count(&self) -> usize {
        self.decisions.iter().filter(|d| !d.is_pending()).count()
    }

    fn position(&self, sku: &str) -> DashboardResult<usize> {
        self.index
            .get(sku)
            .copied()
            .ok_or_else(|| DashboardError::NotFound { sku: sku.to_string() })
    }
}

fn label(decision: Option<Decision>) -> &'static str {
    decision.map(|d| d.as_str()).unwrap_or("pending")
}
