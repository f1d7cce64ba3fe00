//! Recovery calculator: per-item economics and their aggregation.
//!
//! Per item (amounts clamped to >= 0 first):
//!
//!   Decision    Value recovered        Processing cost
//!   Refurbish   resale × 1.0           refurbishment × 1.0
//!   Resell      resale × 0.8           refurbishment × 0.2
//!   Recycle     resale × 0.2           refurbishment × 0.1
//!   Discard     0                      refurbishment × 0.05
//!   Pending     0                      0
//!
//! Aggregates run in one of two modes. `Actual` sums the table above.
//! `Estimated` applies only when the actual sums of value and cost are
//! both exactly zero; the two are never blended.

use crate::{
    config::{DashboardConfig, RecoveryRates},
    decision::{index_decisions, Decision, DecisionSlot},
    record::ReturnRecord,
    types::Money,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemEconomics {
    pub value_recovered: Money,
    pub processing_cost: Money,
}

impl ItemEconomics {
    /// May be negative.
    pub fn margin(&self) -> Money {
        self.value_recovered - self.processing_cost
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryMode {
    Actual,
    Estimated,
}

/// Report-level totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoverySummary {
    pub total_items:      usize,
    pub value_recovered:  Money,
    pub processing_costs: Money,
    pub net_recovery:     Money,
    pub mode:             RecoveryMode,
}

/// Decision-table tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub processed_items: usize,
    pub total_recovery:  Money,
    pub net_margin:      Money,
    pub mode:            RecoveryMode,
}

pub fn item_economics(
    record: &ReturnRecord,
    decision: Option<Decision>,
    rates: &RecoveryRates,
) -> ItemEconomics {
    let Some(decision) = decision else {
        return ItemEconomics::default();
    };
    let rate = rates.for_decision(decision);
    ItemEconomics {
        value_recovered: record.clamped_resale_value() * rate.value_factor,
        processing_cost: record.clamped_refurbishment_cost() * rate.cost_factor,
    }
}

pub fn margin(record: &ReturnRecord, decision: Option<Decision>, rates: &RecoveryRates) -> Money {
    item_economics(record, decision, rates).margin()
}

/// The single predicate selecting estimation mode.
pub fn requires_estimate(actual: &ItemEconomics) -> bool {
    actual.value_recovered == 0.0 && actual.processing_cost == 0.0
}

/// Report totals over all records.
///
/// Records without a decision slot count as pending.
pub fn summarize(
    records: &[ReturnRecord],
    decisions: &[DecisionSlot],
    config: &DashboardConfig,
) -> RecoverySummary {
    let actual = actual_totals(records, decisions, &config.recovery_rates);
    let (totals, mode) = if requires_estimate(&actual) {
        let estimation = &config.estimation;
        let (resale, refurbishment) = raw_totals(records);
        let estimate = ItemEconomics {
            value_recovered: resale * estimation.report_value_factor,
            processing_cost: refurbishment * estimation.report_cost_factor,
        };
        if !records.is_empty() {
            log::debug!("recovery: no decided value yet, reporting estimate");
        }
        (estimate, RecoveryMode::Estimated)
    } else {
        (actual, RecoveryMode::Actual)
    };

    RecoverySummary {
        total_items:      records.len(),
        value_recovered:  totals.value_recovered,
        processing_costs: totals.processing_cost,
        net_recovery:     totals.margin(),
        mode,
    }
}

/// Decision-table totals: processed count, recovery and net margin.
pub fn decision_summary(
    records: &[ReturnRecord],
    decisions: &[DecisionSlot],
    config: &DashboardConfig,
) -> DecisionSummary {
    let by_sku = index_decisions(decisions);
    let processed_items = records
        .iter()
        .filter(|r| by_sku.get(r.sku.as_str()).copied().flatten().is_some())
        .count();

    let actual = actual_totals(records, decisions, &config.recovery_rates);
    if requires_estimate(&actual) {
        let estimation = &config.estimation;
        let (resale, _) = raw_totals(records);
        let total_recovery = resale * estimation.summary_recovery_factor;
        return DecisionSummary {
            processed_items,
            total_recovery,
            net_margin: total_recovery * estimation.summary_margin_factor,
            mode: RecoveryMode::Estimated,
        };
    }

    DecisionSummary {
        processed_items,
        total_recovery: actual.value_recovered,
        net_margin: actual.margin(),
        mode: RecoveryMode::Actual,
    }
}

/// Sums of the per-item table over every decided record.
fn actual_totals(
    records: &[ReturnRecord],
    decisions: &[DecisionSlot],
    rates: &RecoveryRates,
) -> ItemEconomics {
    let by_sku = index_decisions(decisions);
    sorted_by_sku(records)
        .into_iter()
        .map(|record| {
            let decision = by_sku.get(record.sku.as_str()).copied().flatten();
            item_economics(record, decision, rates)
        })
        .fold(ItemEconomics::default(), |acc, item| ItemEconomics {
            value_recovered: acc.value_recovered + item.value_recovered,
            processing_cost: acc.processing_cost + item.processing_cost,
        })
}

/// (Σ resale value, Σ refurbishment cost), clamped per item.
fn raw_totals(records: &[ReturnRecord]) -> (Money, Money) {
    sorted_by_sku(records)
        .into_iter()
        .fold((0.0, 0.0), |(resale, refurb), r| {
            (
                resale + r.clamped_resale_value(),
                refurb + r.clamped_refurbishment_cost(),
            )
        })
}

/// Summing in sku order makes totals bit-identical under any permutation.
fn sorted_by_sku(records: &[ReturnRecord]) -> Vec<&ReturnRecord> {
    let mut sorted: Vec<&ReturnRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.sku.cmp(&b.sku));
    sorted
}
