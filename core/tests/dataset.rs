//! Record/decision store tests.

use returns_core::{
    dataset::ReturnDataset,
    decision::Decision,
    record::{Condition, ReturnRecord},
};
use std::collections::BTreeSet;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn record(sku: &str) -> ReturnRecord {
    ReturnRecord::new(sku, format!("Product {sku}"), Condition::Good, 10.0, 50.0, 4)
}

fn loaded(skus: &[&str]) -> ReturnDataset {
    ReturnDataset::from_records(skus.iter().map(|s| record(s)).collect()).unwrap()
}

fn key_sets(dataset: &ReturnDataset) -> (BTreeSet<String>, BTreeSet<String>) {
    (
        dataset.records().iter().map(|r| r.sku.clone()).collect(),
        dataset.decisions().iter().map(|d| d.sku.clone()).collect(),
    )
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Every loaded record gets exactly one pending decision slot.
#[test]
fn load_creates_one_pending_slot_per_record() {
    let dataset = loaded(&["A1", "B2", "C3"]);

    assert_eq!(dataset.records().len(), dataset.decisions().len());
    let (records, decisions) = key_sets(&dataset);
    assert_eq!(records, decisions, "Record and decision key sets must match");
    assert!(dataset.decisions().iter().all(|d| d.is_pending()));
}

/// Records and decision slots share one key set after any update.
#[test]
fn key_sets_stay_identical_across_decision_updates() {
    let mut dataset = loaded(&["A1", "B2", "C3"]);

    dataset.set_decision("A1", Some(Decision::Refurbish)).unwrap();
    dataset.set_decision("B2", Some(Decision::Discard)).unwrap();
    dataset.set_decision("A1", Some(Decision::Recycle)).unwrap();
    dataset.set_decision("C3", None).unwrap();

    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.decisions().len(), 3);
    let (records, decisions) = key_sets(&dataset);
    assert_eq!(records, decisions);
}

/// Two records with the same SKU reject the whole load.
#[test]
fn duplicate_sku_is_rejected() {
    let err = ReturnDataset::from_records(vec![record("A1"), record("A1")]).unwrap_err();
    assert!(err.is_validation(), "Expected a validation error, got {err}");
}

/// A failed load leaves the previous dataset in place.
#[test]
fn failed_load_keeps_previous_dataset() {
    let mut dataset = loaded(&["A1", "B2"]);
    dataset.set_decision("A1", Some(Decision::Resell)).unwrap();

    let result = dataset.load_dataset(vec![record("X"), record("X")]);

    assert!(result.is_err());
    assert_eq!(dataset.len(), 2);
    assert_eq!(
        dataset.get_decision("A1").unwrap().decision,
        Some(Decision::Resell),
        "Decisions must survive a rejected load"
    );
}

/// A second load replaces the first; nothing carries over.
#[test]
fn load_replaces_rather_than_merges() {
    let mut dataset = loaded(&["A1", "B2"]);
    dataset.set_decision("A1", Some(Decision::Resell)).unwrap();

    dataset.load_dataset(vec![record("B2"), record("C3")]).unwrap();

    assert!(!dataset.contains("A1"));
    assert!(dataset.contains("C3"));
    assert!(
        dataset.get_decision("B2").unwrap().is_pending(),
        "A fresh load starts every decision pending"
    );
}

/// Setting a decision on an unknown SKU is NotFound and a no-op.
#[test]
fn unknown_sku_is_not_found_and_changes_nothing() {
    let mut dataset = loaded(&["A1"]);

    let err = dataset.set_decision("ZZ", Some(Decision::Discard)).unwrap_err();
    assert!(err.is_not_found());
    assert!(dataset.get_record("ZZ").unwrap_err().is_not_found());
    assert!(dataset.get_decision("ZZ").unwrap_err().is_not_found());
    assert!(dataset.get_decision("A1").unwrap().is_pending());
}

/// Setting the same decision twice leaves the same state.
#[test]
fn set_decision_is_idempotent() {
    let mut once = loaded(&["A1", "B2"]);
    let mut twice = loaded(&["A1", "B2"]);

    once.set_decision("B2", Some(Decision::Recycle)).unwrap();
    twice.set_decision("B2", Some(Decision::Recycle)).unwrap();
    let previous = twice.set_decision("B2", Some(Decision::Recycle)).unwrap();

    assert_eq!(previous, Some(Decision::Recycle));
    assert_eq!(once.decisions(), twice.decisions());
}

/// A decision can move to any other decision or back to pending.
#[test]
fn decisions_can_always_be_revised() {
    let mut dataset = loaded(&["A1"]);

    for decision in Decision::ALL {
        dataset.set_decision("A1", Some(decision)).unwrap();
        assert_eq!(dataset.get_decision("A1").unwrap().decision, Some(decision));
    }
    dataset.set_decision("A1", None).unwrap();
    assert!(dataset.get_decision("A1").unwrap().is_pending());
}

/// Records come back in the order they were loaded.
#[test]
fn records_keep_insertion_order() {
    let dataset = loaded(&["C3", "A1", "B2"]);
    let order: Vec<&str> = dataset.records().iter().map(|r| r.sku.as_str()).collect();
    assert_eq!(order, vec!["C3", "A1", "B2"]);
}
