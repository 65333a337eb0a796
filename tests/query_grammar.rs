//! Query grammar enforcement
//!
//! Malformed queries must be rejected as InvalidQuery before any data is
//! touched, through the facade.

use facetdb::error::FacadeError;
use facetdb::model::DatasetKind;
use facetdb::DatasetManager;
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn manager() -> (TempDir, DatasetManager) {
    let dir = TempDir::new().expect("temp dir");
    let manager = DatasetManager::open(dir.path()).expect("open manager");
    let records = json!([
        {
            "Subject": "cpsc", "Course": "310", "Professor": "doe, jane",
            "Title": "software eng", "id": 1, "Year": 2015,
            "Avg": 85.0, "Pass": 100, "Fail": 5, "Audit": 0
        }
    ]);
    manager
        .add_dataset("sections", &records.to_string(), DatasetKind::Sections)
        .expect("add dataset");
    (dir, manager)
}

fn expect_invalid(manager: &DatasetManager, query: Value) {
    let err = manager.perform_query(&query).unwrap_err();
    assert!(
        matches!(err, FacadeError::InvalidQuery(_)),
        "expected InvalidQuery, got: {:?}",
        err
    );
}

// =============================================================================
// Structure
// =============================================================================

#[test]
fn query_requires_where_and_options_and_nothing_else() {
    let (_dir, manager) = manager();
    expect_invalid(&manager, json!([1, 2]));
    expect_invalid(&manager, json!({"OPTIONS": {"COLUMNS": ["sections_dept"]}}));
    expect_invalid(&manager, json!({"WHERE": {}}));
    expect_invalid(
        &manager,
        json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["sections_dept"]}, "EXTRA": 1}),
    );
}

#[test]
fn a_valid_minimal_query_passes() {
    let (_dir, manager) = manager();
    assert!(manager
        .perform_query(&json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["sections_dept"]}
        }))
        .is_ok());
}

// =============================================================================
// Filter grammar
// =============================================================================

fn dept_options() -> Value {
    json!({"COLUMNS": ["sections_dept"]})
}

#[test]
fn filter_nodes_need_exactly_one_known_discriminant() {
    let (_dir, manager) = manager();
    expect_invalid(
        &manager,
        json!({"WHERE": {"BETWEEN": {}}, "OPTIONS": dept_options()}),
    );
    expect_invalid(
        &manager,
        json!({"WHERE": {"GT": {"sections_avg": 1}, "LT": {"sections_avg": 9}}, "OPTIONS": dept_options()}),
    );
    expect_invalid(&manager, json!({"WHERE": [], "OPTIONS": dept_options()}));
}

#[test]
fn logic_comparisons_need_non_empty_arrays() {
    let (_dir, manager) = manager();
    expect_invalid(
        &manager,
        json!({"WHERE": {"AND": []}, "OPTIONS": dept_options()}),
    );
    expect_invalid(
        &manager,
        json!({"WHERE": {"OR": {}}, "OPTIONS": dept_options()}),
    );
}

#[test]
fn math_comparisons_are_typed() {
    let (_dir, manager) = manager();
    // string field under a numeric comparator
    expect_invalid(
        &manager,
        json!({"WHERE": {"LT": {"sections_dept": 60}}, "OPTIONS": dept_options()}),
    );
    // string literal under a numeric comparator
    expect_invalid(
        &manager,
        json!({"WHERE": {"GT": {"sections_avg": "60"}}, "OPTIONS": dept_options()}),
    );
    // numeric field under IS
    expect_invalid(
        &manager,
        json!({"WHERE": {"IS": {"sections_avg": "60"}}, "OPTIONS": dept_options()}),
    );
}

#[test]
fn interior_wildcards_are_rejected() {
    let (_dir, manager) = manager();
    expect_invalid(
        &manager,
        json!({
            "WHERE": {"IS": {"sections_dept": "c*c"}},
            "OPTIONS": {"COLUMNS": ["sections_dept"]}
        }),
    );
}

// =============================================================================
// Dataset scoping
// =============================================================================

#[test]
fn unknown_dataset_references_are_rejected() {
    let (_dir, manager) = manager();
    expect_invalid(
        &manager,
        json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["ghost_dept"]}}),
    );
}

#[test]
fn mixing_dataset_ids_is_rejected() {
    let (_dir, manager) = manager();
    let records = json!([
        {
            "fullname": "B", "shortname": "B", "number": "1",
            "address": "a", "type": "t", "furniture": "f",
            "href": "h", "seats": 10, "lat": 1.0, "lon": 2.0
        }
    ]);
    manager
        .add_dataset("rooms", &records.to_string(), DatasetKind::Rooms)
        .expect("add rooms");

    expect_invalid(
        &manager,
        json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["sections_dept", "rooms_seats"]}}),
    );
    expect_invalid(
        &manager,
        json!({
            "WHERE": {"GT": {"rooms_seats": 5}},
            "OPTIONS": {"COLUMNS": ["sections_dept"]}
        }),
    );
}

// =============================================================================
// Grouped-column legality and ORDER
// =============================================================================

#[test]
fn raw_keys_in_columns_are_illegal_once_grouped() {
    let (_dir, manager) = manager();
    expect_invalid(
        &manager,
        json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["sections_avg"]},
            "TRANSFORMATIONS": {"GROUP": ["sections_dept"], "APPLY": []}
        }),
    );
}

#[test]
fn order_keys_must_appear_in_columns() {
    let (_dir, manager) = manager();
    expect_invalid(
        &manager,
        json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["sections_dept"], "ORDER": "sections_avg"}
        }),
    );
    expect_invalid(
        &manager,
        json!({
            "WHERE": {},
            "OPTIONS": {
                "COLUMNS": ["sections_dept"],
                "ORDER": {"dir": "UP", "keys": ["sections_avg"]}
            }
        }),
    );
}

#[test]
fn apply_rules_are_checked() {
    let (_dir, manager) = manager();
    // AVG over a string field
    expect_invalid(
        &manager,
        json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["sections_dept", "x"]},
            "TRANSFORMATIONS": {
                "GROUP": ["sections_dept"],
                "APPLY": [{"x": {"AVG": "sections_dept"}}]
            }
        }),
    );
    // underscore in apply key
    expect_invalid(
        &manager,
        json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["sections_dept", "x_y"]},
            "TRANSFORMATIONS": {
                "GROUP": ["sections_dept"],
                "APPLY": [{"x_y": {"MAX": "sections_avg"}}]
            }
        }),
    );
    // duplicate apply keys
    expect_invalid(
        &manager,
        json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["sections_dept", "x"]},
            "TRANSFORMATIONS": {
                "GROUP": ["sections_dept"],
                "APPLY": [
                    {"x": {"MAX": "sections_avg"}},
                    {"x": {"MIN": "sections_avg"}}
                ]
            }
        }),
    );
}

#[test]
fn rejected_queries_never_reach_execution() {
    // A grammar violation on a huge dataset fails identically and instantly,
    // without tripping the row cap
    let (_dir, manager) = manager();
    let err = manager
        .perform_query(&json!({
            "WHERE": {"IS": {"sections_dept": "c*c"}},
            "OPTIONS": {"COLUMNS": ["sections_dept"]}
        }))
        .unwrap_err();
    assert!(matches!(err, FacadeError::InvalidQuery(_)));
}
