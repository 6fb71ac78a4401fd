//! Tests for the Umbra plan parser

use super::*;
use crate::operator::{JoinKind, OperatorKind, RESULT_OPERATOR_ID};
use crate::plan::PlanNode;
use pretty_assertions::assert_eq;
use serde_json::json;

fn parse(json: &str) -> Result<QueryPlan> {
    parse_with(json, ParseOptions::default())
}

fn parse_with(json: &str, options: ParseOptions) -> Result<QueryPlan> {
    let raw: Value = serde_json::from_str(json).expect("fixture is valid JSON");
    UmbraParser::new(options).parse_plan("select 1", &raw)
}

fn duplicating() -> ParseOptions {
    ParseOptions {
        duplicate_shared_pipelines: true,
        ..ParseOptions::default()
    }
}

const SHARED_PIPELINE_PLAN: &str = r#"{
    "plan": {
        "operator": "join",
        "operatorId": 1,
        "type": "inner",
        "physicalOperator": "hashjoin",
        "cardinality": 5,
        "analyzePlanCardinality": 5,
        "left": {
            "operator": "tempscan",
            "operatorId": 2,
            "scannedOperator": 4,
            "cardinality": 5,
            "pipelineBreaker": {
                "operator": "groupby",
                "operatorId": 4,
                "cardinality": 5,
                "input": {
                    "operator": "tablescan",
                    "operatorId": 5,
                    "tablename": "lineitem",
                    "tableSize": 100,
                    "cardinality": 100
                }
            }
        },
        "right": {
            "operator": "tempscan",
            "operatorId": 3,
            "scannedOperator": 4,
            "cardinality": 5
        }
    }
}"#;

// ============================================================================
// Basic Plans
// ============================================================================

#[test]
fn test_parse_single_table_scan() {
    let plan = parse(
        r#"{
            "plan": {
                "operator": "tablescan",
                "operatorId": 1,
                "tablename": "region",
                "tableSize": 5,
                "cardinality": 5,
                "analyzePlanCardinality": 4
            }
        }"#,
    )
    .expect("parse failed");

    assert_eq!(plan.node_count(), 2);
    assert_eq!(plan.root.operator().id, RESULT_OPERATOR_ID);
    assert_eq!(plan.root.cardinality(), Cardinality::known(5, 4));

    let scan = plan.real_root().unwrap();
    assert!(scan.is_leaf());
    assert_eq!(scan.cardinality(), Cardinality::known(5, 4));
    assert_eq!(
        scan.operator().kind,
        OperatorKind::TableScan {
            table_name: Some("region".to_string()),
            table_size: Some(5),
            scan_type: None,
        }
    );
}

#[test]
fn test_exact_defaults_to_estimate() {
    let plan = parse(
        r#"{"plan": {"operator": "inlinetable", "operatorId": 3, "cardinality": 7}}"#,
    )
    .unwrap();

    assert_eq!(plan.real_root().unwrap().cardinality(), Cardinality::known(7, 7));
}

#[test]
fn test_missing_cardinality_defaults_to_zero() {
    let plan = parse(r#"{"plan": {"operator": "inlinetable", "operatorId": 3}}"#).unwrap();
    assert_eq!(plan.real_root().unwrap().cardinality(), Cardinality::zero());
}

#[test]
fn test_provenance_omits_children() {
    let plan = parse(
        r#"{
            "plan": {
                "operator": "map",
                "operatorId": 2,
                "cardinality": 3,
                "input": {"operator": "inlinetable", "operatorId": 3, "cardinality": 3}
            }
        }"#,
    )
    .unwrap();

    let map = plan.real_root().unwrap();
    assert_eq!(
        map.provenance().fragments(),
        &[json!({"operator": "map", "operatorId": 2, "cardinality": 3})]
    );
    assert_eq!(plan.root.provenance().fragments(), &[json!("// added by benchy")]);
}

#[test]
fn test_provenance_can_be_disabled() {
    let options = ParseOptions {
        include_system_representation: false,
        ..ParseOptions::default()
    };
    let plan = parse_with(
        r#"{"plan": {"operator": "inlinetable", "operatorId": 3, "cardinality": 3}}"#,
        options,
    )
    .unwrap();

    assert!(plan.real_root().unwrap().provenance().is_empty());
    assert!(!plan.root.provenance().is_empty());
}

// ============================================================================
// Children
// ============================================================================

#[test]
fn test_set_operation_arguments() {
    let plan = parse(
        r#"{
            "plan": {
                "operator": "setoperation",
                "operatorId": 1,
                "operation": "unionall",
                "arguments": [
                    {"input": {"operator": "inlinetable", "operatorId": 2}},
                    {"input": {"operator": "inlinetable", "operatorId": 3}}
                ]
            }
        }"#,
    )
    .unwrap();

    let union = plan.real_root().unwrap();
    let ids: Vec<i64> = union.children().iter().map(|c| c.operator().id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn test_multiway_join_inputs() {
    let plan = parse(
        r#"{
            "plan": {
                "operator": "multiwayjoin",
                "operatorId": 1,
                "inputs": [
                    {"op": {"operator": "inlinetable", "operatorId": 2}},
                    {"op": {"operator": "inlinetable", "operatorId": 3}},
                    {"op": {"operator": "inlinetable", "operatorId": 4}}
                ]
            }
        }"#,
    )
    .unwrap();

    let join = plan.real_root().unwrap();
    assert_eq!(join.operator().custom_name(), Some("MultiwayJoin"));
    assert_eq!(join.children().len(), 3);
}

#[test]
fn test_join_children_keep_left_right_order() {
    let plan = parse(
        r#"{
            "plan": {
                "operator": "join",
                "operatorId": 1,
                "type": "leftsemi",
                "physicalOperator": "hashjoin",
                "left": {"operator": "inlinetable", "operatorId": 2},
                "right": {"operator": "inlinetable", "operatorId": 3}
            }
        }"#,
    )
    .unwrap();

    let join = plan.real_root().unwrap();
    assert_eq!(
        join.operator().kind,
        OperatorKind::Join {
            join_type: Some(JoinKind::LeftSemi),
            method: Some("hash".to_string()),
            child_order: crate::operator::ChildOrder::Canonical,
        }
    );
    let ids: Vec<i64> = join.children().iter().map(|c| c.operator().id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn test_index_nested_loop_join_zeroes_probed_side() {
    let plan = parse(
        r#"{
            "plan": {
                "operator": "join",
                "operatorId": 1,
                "type": "inner",
                "physicalOperator": "indexnljoin",
                "cardinality": 10,
                "analyzePlanCardinality": 12,
                "left": {
                    "operator": "tablescan",
                    "operatorId": 2,
                    "tablename": "orders",
                    "tableSize": 10,
                    "cardinality": 10
                },
                "right": {
                    "operator": "tablescan",
                    "operatorId": 3,
                    "tablename": "lineitem",
                    "tableSize": 1000000,
                    "cardinality": 1000000,
                    "analyzePlanCardinality": 1000000
                }
            }
        }"#,
    )
    .unwrap();

    let join = plan.real_root().unwrap();
    assert_eq!(join.children()[0].cardinality(), Cardinality::known(10, 10));
    assert_eq!(join.children()[1].cardinality(), Cardinality::known(1000000, 0));
}

// ============================================================================
// Shared Pipelines
// ============================================================================

#[test]
fn test_shared_pipeline_attached_once_by_default() {
    let plan = parse(SHARED_PIPELINE_PLAN).unwrap();

    assert_eq!(plan.find_nodes_by_type(OperatorType::GroupBy).len(), 1);
    let join = plan.real_root().unwrap();
    assert_eq!(join.children()[0].children()[0].operator().id, 4);

    let second_scan = &join.children()[1];
    assert!(!second_scan.is_leaf());
    assert!(second_scan.children().is_empty());
    assert_eq!(second_scan.operator().scanned_id(), Some(4));
    assert_eq!(plan.node_count(), 6);
}

#[test]
fn test_shared_pipeline_duplicated_per_reference() {
    let plan = parse_with(SHARED_PIPELINE_PLAN, duplicating()).unwrap();

    let join = plan.real_root().unwrap();
    let copies: Vec<&PlanNode> = join
        .children()
        .iter()
        .map(|scan| &scan.children()[0])
        .collect();
    assert_eq!(copies[0], copies[1]);
    assert_eq!(copies[0].operator().id, 4);
    assert_eq!(plan.find_nodes_by_type(OperatorType::GroupBy).len(), 2);
    assert_eq!(plan.node_count(), 8);
}

#[test]
fn test_magic_child_comes_first_and_is_shared() {
    let json = r#"{
        "plan": {
            "operator": "join",
            "operatorId": 1,
            "type": "inner",
            "physicalOperator": "hashjoin",
            "magic": {"operator": "temp", "operatorId": 9,
                      "input": {"operator": "inlinetable", "operatorId": 10}},
            "left": {"operator": "tempscan", "operatorId": 2, "scannedOperator": 9},
            "right": {"operator": "inlinetable", "operatorId": 3}
        }
    }"#;

    let plan = parse(json).unwrap();
    let ids: Vec<i64> = plan
        .real_root()
        .unwrap()
        .children()
        .iter()
        .map(|c| c.operator().id)
        .collect();
    assert_eq!(ids, vec![9, 2, 3]);

    let plan = parse_with(json, duplicating()).unwrap();
    let join = plan.real_root().unwrap();
    assert_eq!(join.children()[1].children()[0], join.children()[0]);
}

#[test]
fn test_unknown_shared_pipeline_is_malformed() {
    let json = r#"{
        "plan": {
            "operator": "map",
            "operatorId": 1,
            "input": {"operator": "tempscan", "operatorId": 2, "scannedOperator": 42}
        }
    }"#;

    assert!(parse(json).is_ok());
    assert!(parse_with(json, duplicating()).unwrap_err().is_malformed_input());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_unknown_operator_fails() {
    let err = parse(
        r#"{"plan": {"operator": "map", "operatorId": 1,
                     "input": {"operator": "hologramscan", "operatorId": 2}}}"#,
    )
    .unwrap_err();

    assert!(err.is_unrecognized_operator());
    assert_eq!(err.to_string(), "'hologramscan' is not a recognized umbra operator");
}

#[test]
fn test_missing_plan_is_malformed() {
    let err = parse(r#"{"operator": "tablescan"}"#).unwrap_err();
    assert!(err.is_malformed_input());
}

#[test]
fn test_missing_operator_id_is_malformed() {
    let err = parse(r#"{"plan": {"operator": "inlinetable"}}"#).unwrap_err();
    assert!(err.is_malformed_input());
}
