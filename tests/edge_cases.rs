use std::collections::HashSet;

use tagstore::{
    ConditionFailure, ListMultimap, OutputStore, RuleOutput, StoreError, Tag, TagState,
};

fn failure() -> Vec<ConditionFailure> {
    vec![ConditionFailure::new("threshold", "value below threshold")]
}

fn leaf(tag_type: &str, value: i64) -> Tag {
    Tag::new(tag_type, value, TagState::Leaf)
}

fn set<'a>(items: &[&'a str]) -> HashSet<&'a str> {
    items.iter().copied().collect()
}

#[test]
fn new_store_is_empty() {
    let store = OutputStore::new();
    let found = store.find_latest_results_by_tag_type(&set(&["cpu"]));

    assert!(store.is_empty());
    assert!(store.available_tag_types().is_empty());
    assert!(store.outputs().is_empty());
    assert!(store.outputs_with_condition_failures().is_empty());
    assert!(store.map_tags(TagState::Leaf).is_empty());
    assert!(found.is_empty());
}

#[test]
fn failure_only_tag_type_is_not_available() {
    let mut store = OutputStore::new();
    let failed = RuleOutput::failed("r1", "io", failure());
    let ok = RuleOutput::success("r2", "cpu", vec![]);
    store.store_all(vec![failed, ok]).unwrap();

    assert_eq!(store.available_tag_types(), vec!["cpu"]);
    let found = store.find_latest_results_by_tag_type(&set(&["io"]));
    assert!(found.is_empty());
}

#[test]
fn same_output_twice_in_each_partition() {
    let mut store = OutputStore::new();
    let ok = RuleOutput::success("r1", "cpu", vec![leaf("cpu", 1)]);
    let bad = RuleOutput::failed("r2", "cpu", failure());

    store.store(ok.clone()).unwrap();
    store.store(ok.clone()).unwrap();
    store.store(bad.clone()).unwrap();
    store.store(bad.clone()).unwrap();

    let failures = store.outputs_with_condition_failures();
    assert_eq!(store.outputs().get("cpu"), &[ok]);
    assert_eq!(failures.get("cpu"), &[bad.clone(), bad]);
}

#[test]
fn distinct_outputs_under_same_key_keep_insertion_order() {
    let mut store = OutputStore::new();
    let first = RuleOutput::success("r1", "cpu", vec![leaf("cpu", 1)]);
    let second = RuleOutput::success("r2", "cpu", vec![leaf("cpu", 2)]);
    store.store(first.clone()).unwrap();
    store.store(second.clone()).unwrap();
    store.store(first.clone()).unwrap();

    assert_eq!(store.outputs().get("cpu"), &[first, second]);
}

#[test]
fn output_with_failures_and_tags_contributes_no_tags() {
    let mut store = OutputStore::new();
    let output = RuleOutput::new("r1", "cpu", failure(), vec![leaf("cpu", 1)]);
    assert!(output.has_condition_failures());
    assert!(output.has_result_tags());

    store.store(output).unwrap();
    assert!(store.map_tags(TagState::Leaf).is_empty());
    assert!(store.available_tag_types().is_empty());
    assert_eq!(store.failure_count(), 1);
}

#[test]
fn map_tags_keys_by_tag_type_and_skips_other_states() {
    let mut store = OutputStore::new();
    let a1 = Tag::new("A", "first", TagState::Parked);
    let b1 = Tag::new("B", "second", TagState::Leaf);
    let a2 = Tag::new("A", "third", TagState::Parked);
    let first = RuleOutput::success("r1", "A", vec![a1.clone(), b1]);
    let second = RuleOutput::success("r2", "A", vec![a2.clone()]);
    store.store_all(vec![first, second]).unwrap();

    let mut expected = ListMultimap::new();
    expected.put("A".to_owned(), a1);
    expected.put("A".to_owned(), a2);

    let mapped = store.map_tags(TagState::Parked);
    assert_eq!(mapped, expected);
    assert!(!mapped.contains_key("B"));
}

#[test]
fn map_tags_uses_tag_type_not_embedded_type() {
    let mut store = OutputStore::new();
    let tag = leaf("gc_pause", 120);
    let output = RuleOutput::success("explain", "memory", vec![tag.clone()]);
    store.store(output).unwrap();

    let mapped = store.map_tags(TagState::Leaf);
    assert_eq!(mapped.get("gc_pause"), &[tag]);
    assert!(mapped.get("memory").is_empty());
}

#[test]
fn map_tags_follows_output_key_order() {
    let mut store = OutputStore::new();
    let t1 = leaf("A", 1);
    let t2 = leaf("A", 2);
    let t3 = leaf("A", 3);
    store
        .store_all(vec![
            RuleOutput::success("r1", "x", vec![t1.clone()]),
            RuleOutput::success("r2", "y", vec![t2.clone()]),
            RuleOutput::success("r3", "x", vec![t3.clone()]),
        ])
        .unwrap();

    // all outputs under "x" come before the output under "y"
    let mapped = store.map_tags(TagState::Leaf);
    assert_eq!(mapped.get("A"), &[t1, t3, t2]);
}

#[test]
fn map_tags_keeps_duplicate_tags() {
    let mut store = OutputStore::new();
    let tag = leaf("cpu", 1);
    let first = RuleOutput::success("r1", "cpu", vec![tag.clone()]);
    let second = RuleOutput::success("r2", "cpu", vec![tag.clone()]);
    store.store_all(vec![first, second]).unwrap();

    let mapped = store.map_tags(TagState::Leaf);
    assert_eq!(mapped.get("cpu"), &[tag.clone(), tag]);
}

#[test]
fn find_latest_visits_newest_key_first() {
    let mut store = OutputStore::new();
    let x1 = RuleOutput::success("r1", "x", vec![leaf("x", 1)]);
    let y1 = RuleOutput::success("r2", "y", vec![leaf("y", 1)]);
    let x2 = RuleOutput::success("r3", "x", vec![leaf("x", 2)]);
    let outputs = vec![x1.clone(), y1.clone(), x2.clone()];
    store.store_all(outputs).unwrap();

    let found = store.find_latest_results_by_tag_type(&set(&["x", "y"]));
    assert_eq!(found, vec![&y1, &x1, &x2]);
}

#[test]
fn find_latest_ignores_unrequested_keys() {
    let mut store = OutputStore::new();
    let x = RuleOutput::success("r1", "x", vec![]);
    let y = RuleOutput::success("r2", "y", vec![]);
    let z = RuleOutput::success("r3", "z", vec![]);
    store.store_all(vec![x.clone(), y, z.clone()]).unwrap();

    let wanted = set(&["x", "z", "missing"]);
    let found = store.find_latest_results_by_tag_type(&wanted);
    assert_eq!(found, vec![&z, &x]);
}

#[test]
fn find_latest_with_empty_filter_is_empty() {
    let mut store = OutputStore::new();
    store.store(RuleOutput::success("r1", "x", vec![])).unwrap();

    let wanted: HashSet<String> = HashSet::new();
    let found = store.find_latest_results_by_tag_type(&wanted);
    assert!(found.is_empty());
}

#[test]
fn rejected_output_leaves_store_unchanged() {
    let mut store = OutputStore::new();
    let ok = RuleOutput::success("r1", "cpu", vec![]);
    store.store(ok).unwrap();

    let result = store.store(RuleOutput::failed("r2", "", failure()));
    assert!(matches!(result, Err(StoreError::InvalidArgument { .. })));
    assert_eq!(store.len(), 1);
    assert_eq!(store.failure_count(), 0);
}

#[test]
fn cleared_store_is_reusable() {
    let mut store = OutputStore::new();
    let output = RuleOutput::success("r1", "cpu", vec![leaf("cpu", 1)]);
    let failed = RuleOutput::failed("r2", "io", failure());
    store.store_all(vec![output.clone(), failed]).unwrap();

    store.clear();
    assert!(store.is_empty());
    assert!(store.available_tag_types().is_empty());
    assert!(store.map_tags(TagState::Leaf).is_empty());

    store.store(output.clone()).unwrap();
    assert_eq!(store.outputs().get("cpu"), &[output]);
    assert_eq!(store.available_tag_types(), vec!["cpu"]);
}

#[test]
fn key_order_survives_after_clear_and_refill() {
    let mut store = OutputStore::new();
    store.store(RuleOutput::success("r1", "a", vec![])).unwrap();
    store.store(RuleOutput::success("r2", "b", vec![])).unwrap();
    store.clear();
    store.store(RuleOutput::success("r2", "b", vec![])).unwrap();
    store.store(RuleOutput::success("r1", "a", vec![])).unwrap();

    assert_eq!(store.available_tag_types(), vec!["b", "a"]);
}
