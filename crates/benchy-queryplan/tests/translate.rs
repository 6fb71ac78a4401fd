//! End-to-end translation of captured vendor plans

use benchy_queryplan::{
    Dialect, EncodedQueryPlan, EncodingFormat, TranslateConfig, decode_query_plan, translate,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const QUERY: &str = "
    select *
    from region
";

fn translate_json(dialect: Dialect, raw: &Value, config: &TranslateConfig) -> EncodedQueryPlan {
    let document = translate(dialect, QUERY, raw, config).expect("translation failed");
    decode_query_plan(&document).expect("document decodes")
}

fn umbra_scan() -> Value {
    json!({"plan": {
        "operator": "tablescan",
        "operatorId": 1,
        "tablename": "region",
        "tableSize": 5,
        "cardinality": 5,
        "analyzePlanCardinality": 4
    }})
}

fn postgres_scan() -> Value {
    json!([{"Plan": {
        "Node Type": "Seq Scan",
        "Relation Name": "region",
        "Plan Rows": 5,
        "Actual Rows": 4
    }}])
}

fn hyper_scan() -> Value {
    json!({"input": {
        "operator": "tablescan",
        "operatorId": 1,
        "debugName": {"value": "region"},
        "cardinality": 5,
        "analyze": {"tuple-count": 4}
    }})
}

fn duckdb_envelope(plan: Value) -> Value {
    json!({"children": [{
        "operator_type": "EXPLAIN_ANALYZE",
        "operator_cardinality": 0,
        "children": [plan]
    }]})
}

fn duckdb_scan() -> Value {
    duckdb_envelope(json!({
        "operator_type": "TABLE_SCAN",
        "operator_cardinality": 4,
        "extra_info": {"Table": "region", "Estimated Cardinality": "5"},
        "children": []
    }))
}

fn all_scans() -> Vec<(Dialect, Value)> {
    vec![
        (Dialect::Umbra, umbra_scan()),
        (Dialect::Postgres, postgres_scan()),
        (Dialect::Hyper, hyper_scan()),
        (Dialect::DuckDb, duckdb_scan()),
    ]
}

// ============================================================================
// Every Dialect
// ============================================================================

#[test]
fn test_single_scan_for_every_dialect() {
    for (dialect, raw) in all_scans() {
        let document = translate_json(dialect, &raw, &TranslateConfig::default());

        assert_eq!(document.query_text, "select * from region", "{dialect}");
        assert_eq!(document.query_plan.labels(), vec!["Result", "TableScan"], "{dialect}");

        let root = &document.query_plan;
        assert_eq!(root.attrs["operator_id"], json!(-1), "{dialect}");
        assert_eq!(root.attrs["estimated_cardinality"], json!(5), "{dialect}");
        assert_eq!(root.attrs["exact_cardinality"], json!(4), "{dialect}");

        let scan = &root.children[0];
        assert_eq!(scan.attrs["table_name"], json!("region"), "{dialect}");
        assert_eq!(scan.attrs["exact_cardinality"], json!(4), "{dialect}");
        assert!(scan.attrs["system_representation"].is_string(), "{dialect}");
    }
}

#[test]
fn test_xml_for_every_dialect() {
    let config = TranslateConfig::default().with_format(EncodingFormat::Xml);
    for (dialect, raw) in all_scans() {
        let document = translate(dialect, QUERY, &raw, &config).unwrap();
        let decoded: EncodedQueryPlan<String> = serde_json::from_str(&document).unwrap();

        assert_eq!(decoded.query_text, "select * from region");
        assert!(decoded.query_plan.starts_with("<Result operator_id=\"-1\""), "{dialect}");
        assert!(decoded.query_plan.contains("<TableScan "), "{dialect}");
        assert!(decoded.query_plan.ends_with("</Result>"), "{dialect}");
    }
}

#[test]
fn test_unknown_operator_fails_for_every_dialect() {
    let cases = [
        (
            Dialect::Umbra,
            json!({"plan": {"operator": "hologram", "operatorId": 1, "cardinality": 1}}),
        ),
        (
            Dialect::Postgres,
            json!([{"Plan": {"Node Type": "Hologram Scan", "Plan Rows": 1, "Actual Rows": 1}}]),
        ),
        (
            Dialect::Hyper,
            json!({"input": {"operator": "hologram", "operatorId": 1, "analyze": {"tuple-count": 1}}}),
        ),
        (
            Dialect::DuckDb,
            duckdb_envelope(json!({
                "operator_type": "HOLOGRAM_SCAN",
                "operator_cardinality": 1,
                "children": []
            })),
        ),
    ];

    for (dialect, raw) in cases {
        let err = translate(dialect, QUERY, &raw, &TranslateConfig::default()).unwrap_err();
        assert!(err.is_unrecognized_operator(), "{dialect}: {err}");
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_cleaning_can_be_disabled() {
    let raw = json!({"plan": {
        "operator": "map",
        "operatorId": 1,
        "cardinality": 5,
        "input": {
            "operator": "tablescan",
            "operatorId": 2,
            "tablename": "region",
            "cardinality": 5
        }
    }});

    let cleaned = translate_json(Dialect::Umbra, &raw, &TranslateConfig::default());
    assert_eq!(cleaned.query_plan.labels(), vec!["Result", "TableScan"]);

    let raw_tree = translate_json(
        Dialect::Umbra,
        &raw,
        &TranslateConfig::default().with_clean(false),
    );
    assert_eq!(raw_tree.query_plan.labels(), vec!["Result", "Map", "TableScan"]);
}

#[test]
fn test_toml_config_drives_translation() {
    let config = TranslateConfig::from_toml_str(
        r#"
        [parse]
        include_system_representation = false
        "#,
    )
    .unwrap();

    let document = translate_json(Dialect::Hyper, &hyper_scan(), &config);
    assert_eq!(
        document.query_plan.attrs["system_representation"],
        json!(r#"["// added by benchy"]"#)
    );
    assert!(
        document.query_plan.children[0]
            .attrs
            .get("system_representation")
            .is_none()
    );
}

#[test]
fn test_duckdb_join_inputs_are_normalized() {
    let raw = duckdb_envelope(json!({
        "operator_type": "HASH_JOIN",
        "operator_cardinality": 10,
        "extra_info": {"Join Type": "INNER"},
        "children": [
            {"operator_type": "TABLE_SCAN", "operator_cardinality": 40,
             "extra_info": {"Table": "orders"}, "children": []},
            {"operator_type": "TABLE_SCAN", "operator_cardinality": 4,
             "extra_info": {"Table": "nation"}, "children": []}
        ]
    }));

    let document = translate_json(Dialect::DuckDb, &raw, &TranslateConfig::default());
    let join = &document.query_plan.children[0];
    let tables: Vec<&Value> = join.children.iter().map(|c| &c.attrs["table_name"]).collect();
    assert_eq!(tables, vec![&json!("nation"), &json!("orders")]);

    let raw_tree = translate_json(
        Dialect::DuckDb,
        &raw,
        &TranslateConfig::default().with_clean(false),
    );
    let join = &raw_tree.query_plan.children[0];
    let tables: Vec<&Value> = join.children.iter().map(|c| &c.attrs["table_name"]).collect();
    assert_eq!(tables, vec![&json!("orders"), &json!("nation")]);
}

#[test]
fn test_duckdb_text_top_n_becomes_sort() {
    let raw = duckdb_envelope(json!({
        "operator_type": "TOP_N",
        "operator_cardinality": 10,
        "extra_info": "Top 10\n[INFOSEPARATOR]\nOrder By: a ASC",
        "children": [
            {"operator_type": "DUMMY_SCAN", "operator_cardinality": 1, "children": []}
        ]
    }));

    let document = translate_json(Dialect::DuckDb, &raw, &TranslateConfig::default());
    assert_eq!(document.query_plan.labels(), vec!["Result", "Sort", "InlineTable"]);
    let sort = &document.query_plan.children[0];
    assert_eq!(sort.attrs["limit"], json!(10));
    assert!(sort.attrs.get("estimated_cardinality").is_none());
}

#[test]
fn test_invalid_json_text_is_reported() {
    let err = benchy_queryplan::parse_query_plan_str(
        Dialect::Postgres,
        QUERY,
        "[{\"Plan\":",
        Default::default(),
    )
    .unwrap_err();
    assert!(!err.is_malformed_input());
    assert!(!err.is_unrecognized_operator());
}
