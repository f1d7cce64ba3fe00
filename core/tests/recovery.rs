//! Recovery calculator tests.

use returns_core::{
    config::DashboardConfig,
    dataset::ReturnDataset,
    decision::{Decision, DecisionSlot},
    record::{Condition, ReturnRecord},
    recovery::{self, RecoveryMode},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn approx(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "{what}: expected {expected}, got {actual}"
    );
}

fn item(sku: &str, refurb: f64, resale: f64) -> ReturnRecord {
    ReturnRecord::new(sku, "Item", Condition::Good, refurb, resale, 5)
}

fn single(decision: Option<Decision>) -> ReturnDataset {
    let mut dataset = ReturnDataset::from_records(vec![item("A1", 20.0, 100.0)]).unwrap();
    dataset.set_decision("A1", decision).unwrap();
    dataset
}

// ── Per-item table ───────────────────────────────────────────────────────────

/// Refurbish recovers the full resale value at the full refurbishment cost.
#[test]
fn refurbish_recovers_full_value_at_full_cost() {
    let config = DashboardConfig::default();
    let dataset = single(Some(Decision::Refurbish));
    let record = &dataset.records()[0];

    let item = recovery::item_economics(record, Some(Decision::Refurbish), &config.recovery_rates);
    approx(item.value_recovered, 100.0, "value");
    approx(item.processing_cost, 20.0, "cost");
    approx(item.margin(), 80.0, "margin");

    let summary = recovery::summarize(dataset.records(), dataset.decisions(), &config);
    assert_eq!(summary.mode, RecoveryMode::Actual);
    approx(summary.net_recovery, 80.0, "net recovery");
}

/// Resell recovers 80% of resale value at 20% of refurbishment cost.
#[test]
fn resell_recovers_eighty_percent() {
    let config = DashboardConfig::default();
    let dataset = single(Some(Decision::Resell));

    let summary = recovery::summarize(dataset.records(), dataset.decisions(), &config);
    approx(summary.value_recovered, 80.0, "value");
    approx(summary.processing_costs, 4.0, "cost");
    approx(summary.net_recovery, 76.0, "net recovery");
}

/// Discard recovers nothing and costs 5% of refurbishment.
#[test]
fn discard_costs_five_percent_and_recovers_nothing() {
    let config = DashboardConfig::default();
    let dataset = single(Some(Decision::Discard));

    let summary = recovery::summarize(dataset.records(), dataset.decisions(), &config);
    assert_eq!(summary.mode, RecoveryMode::Actual);
    approx(summary.value_recovered, 0.0, "value");
    approx(summary.processing_costs, 1.0, "cost");
    approx(summary.net_recovery, -1.0, "net recovery");
}

/// Recycle recovers 20% at 10% cost; pending is zero on both sides.
#[test]
fn recycle_and_pending_rows_of_the_table() {
    let rates = DashboardConfig::default().recovery_rates;
    let record = item("A1", 20.0, 100.0);

    let recycle = recovery::item_economics(&record, Some(Decision::Recycle), &rates);
    approx(recycle.value_recovered, 20.0, "recycle value");
    approx(recycle.processing_cost, 2.0, "recycle cost");

    let pending = recovery::item_economics(&record, None, &rates);
    approx(pending.value_recovered, 0.0, "pending value");
    approx(pending.processing_cost, 0.0, "pending cost");
}

/// Negative amounts count as 0, but the margin itself may go negative.
#[test]
fn negative_amounts_are_clamped_but_margin_may_be_negative() {
    let rates = DashboardConfig::default().recovery_rates;
    let record = item("A1", 30.0, -50.0);

    let item = recovery::item_economics(&record, Some(Decision::Refurbish), &rates);
    approx(item.value_recovered, 0.0, "value");
    approx(item.processing_cost, 30.0, "cost");
    approx(recovery::margin(&record, Some(Decision::Refurbish), &rates), -30.0, "margin");

    let negative_cost = ReturnRecord::new("B2", "Item", Condition::Fair, -10.0, 40.0, 1);
    let item = recovery::item_economics(&negative_cost, Some(Decision::Discard), &rates);
    assert!(item.processing_cost >= 0.0, "Cost must never be negative");
}

// ── Aggregation ──────────────────────────────────────────────────────────────

/// With every item pending the report shows the 0.7/0.8 estimate.
#[test]
fn all_pending_falls_back_to_report_estimate() {
    let config = DashboardConfig::default();
    let dataset =
        ReturnDataset::from_records(vec![item("A1", 20.0, 100.0), item("B2", 30.0, 60.0)]).unwrap();

    let summary = recovery::summarize(dataset.records(), dataset.decisions(), &config);

    assert_eq!(summary.mode, RecoveryMode::Estimated);
    assert_eq!(summary.total_items, 2);
    approx(summary.value_recovered, 0.7 * 160.0, "estimated value");
    approx(summary.processing_costs, 0.8 * 50.0, "estimated cost");
    approx(summary.net_recovery, 0.7 * 160.0 - 0.8 * 50.0, "estimated net");
}

/// Any real value switches the report to actual totals only.
#[test]
fn partial_decisions_are_never_blended_with_estimate() {
    let config = DashboardConfig::default();
    let mut dataset =
        ReturnDataset::from_records(vec![item("A1", 20.0, 100.0), item("B2", 30.0, 60.0)]).unwrap();
    dataset.set_decision("A1", Some(Decision::Resell)).unwrap();

    let summary = recovery::summarize(dataset.records(), dataset.decisions(), &config);

    assert_eq!(summary.mode, RecoveryMode::Actual);
    approx(summary.value_recovered, 80.0, "value");
    approx(summary.processing_costs, 4.0, "cost");
}

/// Decisions that produce no value or cost still leave the report estimated.
#[test]
fn zero_valued_decisions_still_trigger_estimate() {
    let config = DashboardConfig::default();
    let mut dataset = ReturnDataset::from_records(vec![
        item("A1", 0.0, 0.0),
        item("B2", 10.0, 40.0),
    ])
    .unwrap();
    dataset.set_decision("A1", Some(Decision::Refurbish)).unwrap();

    let summary = recovery::summarize(dataset.records(), dataset.decisions(), &config);
    assert_eq!(summary.mode, RecoveryMode::Estimated);
    approx(summary.value_recovered, 28.0, "estimated value");
    approx(summary.processing_costs, 8.0, "estimated cost");
}

/// Totals are identical under any permutation of the records.
#[test]
fn summarize_is_order_independent() {
    let config = DashboardConfig::default();
    let records = vec![
        item("A1", 12.34, 99.99),
        item("B2", 7.77, 13.13),
        item("C3", 41.0, 0.1),
        item("D4", 0.3, 0.7),
    ];
    let decisions = vec![
        DecisionSlot { sku: "A1".into(), decision: Some(Decision::Refurbish) },
        DecisionSlot { sku: "B2".into(), decision: Some(Decision::Resell) },
        DecisionSlot { sku: "C3".into(), decision: Some(Decision::Discard) },
        DecisionSlot { sku: "D4".into(), decision: Some(Decision::Recycle) },
    ];
    let forward = recovery::summarize(&records, &decisions, &config);

    let mut records_rev = records.clone();
    records_rev.reverse();
    let mut decisions_rot = decisions.clone();
    decisions_rot.rotate_left(1);
    let permuted = recovery::summarize(&records_rev, &decisions_rot, &config);

    assert_eq!(forward, permuted, "Permuting inputs changed the summary");
}

/// An empty dataset summarizes to zero.
#[test]
fn empty_dataset_summarizes_to_zero() {
    let config = DashboardConfig::default();
    let summary = recovery::summarize(&[], &[], &config);
    assert_eq!(summary.total_items, 0);
    approx(summary.value_recovered, 0.0, "value");
    approx(summary.processing_costs, 0.0, "cost");
}

// ── Decision summary tiles ───────────────────────────────────────────────────

/// Undecided tiles show 0.7 of resale and 0.4 of that as margin.
#[test]
fn decision_summary_uses_seventy_forty_estimate_when_undecided() {
    let config = DashboardConfig::default();
    let dataset =
        ReturnDataset::from_records(vec![item("A1", 20.0, 100.0), item("B2", 30.0, 60.0)]).unwrap();

    let tiles = recovery::decision_summary(dataset.records(), dataset.decisions(), &config);

    assert_eq!(tiles.mode, RecoveryMode::Estimated);
    assert_eq!(tiles.processed_items, 0);
    approx(tiles.total_recovery, 112.0, "estimated recovery");
    approx(tiles.net_margin, 112.0 * 0.4, "estimated margin");
}

/// Processed items counts decided records only.
#[test]
fn decision_summary_counts_processed_items() {
    let config = DashboardConfig::default();
    let mut dataset =
        ReturnDataset::from_records(vec![item("A1", 20.0, 100.0), item("B2", 30.0, 60.0)]).unwrap();
    dataset.set_decision("A1", Some(Decision::Refurbish)).unwrap();
    dataset.set_decision("B2", Some(Decision::Discard)).unwrap();

    let tiles = recovery::decision_summary(dataset.records(), dataset.decisions(), &config);

    assert_eq!(tiles.mode, RecoveryMode::Actual);
    assert_eq!(tiles.processed_items, 2);
    approx(tiles.total_recovery, 100.0, "recovery");
    approx(tiles.net_margin, 100.0 - 20.0 - 1.5, "margin");
}
