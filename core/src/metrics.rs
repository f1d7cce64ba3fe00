//! Metrics aggregator: dashboard counts, percentages and chart series.
//!
//! Disposition breakdown sources, in order of preference:
//!   1. Historical `disposition` labels, when any record carries one.
//!   2. Live decisions (Resell→Resold, Refurbish→Refurbished,
//!      Discard→Discarded, Recycle→Recycled).
//!   3. Demonstration split, only when nothing at all has an outcome.

use crate::{
    config::DashboardConfig,
    decision::{index_decisions, Decision, DecisionSlot},
    record::{Condition, ReturnRecord},
    types::Money,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Disposition breakdown ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownSource {
    Dispositions,
    Decisions,
    Demonstration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispositionBreakdown {
    pub resold:      usize,
    pub refurbished: usize,
    pub discarded:   usize,
    pub recycled:    usize,
    pub pending:     usize,
    pub source:      BreakdownSource,
}

impl DispositionBreakdown {
    pub fn total(&self) -> usize {
        self.resold + self.refurbished + self.discarded + self.recycled + self.pending
    }

    /// Labelled counts in chart order.
    pub fn counts(&self) -> [(&'static str, usize); 5] {
        [
            ("Resold", self.resold),
            ("Refurbished", self.refurbished),
            ("Discarded", self.discarded),
            ("Recycled", self.recycled),
            ("Pending", self.pending),
        ]
    }
}

pub fn disposition_breakdown(
    records: &[ReturnRecord],
    decisions: &[DecisionSlot],
    config: &DashboardConfig,
) -> DispositionBreakdown {
    let total = records.len();
    let mut breakdown = DispositionBreakdown {
        resold: 0,
        refurbished: 0,
        discarded: 0,
        recycled: 0,
        pending: 0,
        source: BreakdownSource::Dispositions,
    };

    if records.iter().any(ReturnRecord::has_disposition) {
        for label in records.iter().filter_map(|r| r.disposition.as_deref()) {
            match label.trim().to_ascii_lowercase().as_str() {
                "resold"      => breakdown.resold += 1,
                "refurbished" => breakdown.refurbished += 1,
                "discarded"   => breakdown.discarded += 1,
                "recycled"    => breakdown.recycled += 1,
                _ => {}
            }
        }
    } else {
        breakdown.source = BreakdownSource::Decisions;
        let by_sku = index_decisions(decisions);
        for record in records {
            match by_sku.get(record.sku.as_str()).copied().flatten() {
                Some(Decision::Resell)    => breakdown.resold += 1,
                Some(Decision::Refurbish) => breakdown.refurbished += 1,
                Some(Decision::Discard)   => breakdown.discarded += 1,
                Some(Decision::Recycle)   => breakdown.recycled += 1,
                None => {}
            }
        }

        let decided = breakdown.resold + breakdown.refurbished + breakdown.discarded + breakdown.recycled;
        if decided == 0 && total > 0 {
            let split = &config.demo_split;
            return DispositionBreakdown {
                resold:      share(total, split.resold),
                refurbished: share(total, split.refurbished),
                discarded:   share(total, split.discarded),
                recycled:    share(total, split.recycled),
                pending:     0,
                source:      BreakdownSource::Demonstration,
            };
        }
    }

    let counted = breakdown.resold + breakdown.refurbished + breakdown.discarded + breakdown.recycled;
    breakdown.pending = total.saturating_sub(counted);
    breakdown
}

// ── Percentages ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percentage {
    pub label:   String,
    pub percent: u32,
}

/// round(100 × count / total) per label; all zero when `total` is 0.
pub fn percentages_of(counts: &[(&str, usize)], total: usize) -> Vec<Percentage> {
    counts
        .iter()
        .map(|(label, count)| Percentage {
            label: (*label).to_string(),
            percent: if total == 0 {
                0
            } else {
                (100.0 * *count as f64 / total as f64).round() as u32
            },
        })
        .collect()
}

// ── Decision counts (report chart) ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionCounts {
    pub refurbish: usize,
    pub resell:    usize,
    pub recycle:   usize,
    pub discard:   usize,
    pub pending:   usize,
    pub source:    BreakdownSource,
}

impl DecisionCounts {
    pub fn counts(&self) -> [(&'static str, usize); 5] {
        [
            ("Refurbish", self.refurbish),
            ("Resell", self.resell),
            ("Recycle", self.recycle),
            ("Discard", self.discard),
            ("Pending", self.pending),
        ]
    }
}

/// Live decision counts. Falls back to the demonstration split only when
/// there are no decision slots at all.
pub fn decision_counts(
    records: &[ReturnRecord],
    decisions: &[DecisionSlot],
    config: &DashboardConfig,
) -> DecisionCounts {
    let total = records.len();
    if decisions.is_empty() {
        let split = &config.report_demo_split;
        return DecisionCounts {
            refurbish: share(total, split.refurbish),
            resell:    share(total, split.resell),
            recycle:   share(total, split.recycle),
            discard:   share(total, split.discard),
            pending:   0,
            source:    BreakdownSource::Demonstration,
        };
    }

    let by_sku = index_decisions(decisions);
    let mut counts = DecisionCounts {
        refurbish: 0,
        resell: 0,
        recycle: 0,
        discard: 0,
        pending: 0,
        source: BreakdownSource::Decisions,
    };
    for record in records {
        match by_sku.get(record.sku.as_str()).copied().flatten() {
            Some(Decision::Refurbish) => counts.refurbish += 1,
            Some(Decision::Resell)    => counts.resell += 1,
            Some(Decision::Recycle)   => counts.recycle += 1,
            Some(Decision::Discard)   => counts.discard += 1,
            None                      => counts.pending += 1,
        }
    }
    counts
}

// ── Chart series ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionStats {
    pub condition:    Condition,
    pub count:        usize,
    pub total_margin: Money,
    pub avg_margin:   Money,
}

/// Count and margin per graded condition. Unknown grades are left out.
pub fn condition_breakdown(records: &[ReturnRecord]) -> Vec<ConditionStats> {
    Condition::GRADED
        .into_iter()
        .map(|condition| {
            let (count, total_margin) = records
                .iter()
                .filter(|r| r.condition == condition)
                .fold((0usize, 0.0), |(n, sum), r| (n + 1, sum + clamped_margin(r)));
            let avg_margin = if count > 0 { total_margin / count as f64 } else { 0.0 };
            ConditionStats { condition, count, total_margin, avg_margin }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub day:              u32,
    pub items:            usize,
    pub cumulative_value: Money,
}

/// Items per day in process (capped at `max_days`, day 0 skipped) and the
/// running resale value of items finished on each exact day.
/// Empty when `max_days` is 0.
pub fn timeline(records: &[ReturnRecord], max_days: u32) -> Vec<TimelinePoint> {
    if max_days == 0 {
        return Vec::new();
    }
    let mut items = vec![0usize; max_days as usize];
    let mut value_on_day = vec![0.0; max_days as usize];
    for record in records {
        let days = record.days_in_process;
        if days == 0 {
            continue;
        }
        items[(days.min(max_days) - 1) as usize] += 1;
        if days <= max_days {
            value_on_day[(days - 1) as usize] += record.clamped_resale_value();
        }
    }

    let mut cumulative = 0.0;
    (1..=max_days)
        .map(|day| {
            let slot = (day - 1) as usize;
            cumulative += value_on_day[slot];
            TimelinePoint { day, items: items[slot], cumulative_value: cumulative }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductValue {
    pub product_name: String,
    pub value:        Money,
}

/// Products ranked by summed raw margin, highest first; ties by name.
pub fn top_products(records: &[ReturnRecord], limit: usize) -> Vec<ProductValue> {
    let mut by_product: HashMap<&str, Money> = HashMap::new();
    for record in records {
        *by_product.entry(record.product_name.as_str()).or_insert(0.0) += record.raw_margin();
    }

    let mut ranked: Vec<ProductValue> = by_product
        .into_iter()
        .map(|(name, value)| ProductValue { product_name: name.to_string(), value })
        .collect();
    ranked.sort_by(|a, b| {
        b.value
            .total_cmp(&a.value)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    ranked.truncate(limit);
    ranked
}

fn clamped_margin(record: &ReturnRecord) -> Money {
    record.clamped_resale_value() - record.clamped_refurbishment_cost()
}

/// floor(total × fraction)
fn share(total: usize, fraction: f64) -> usize {
    (total as f64 * fraction).floor() as usize
}
