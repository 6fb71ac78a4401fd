//! Tests for dialect dispatch and plan text reading

use super::*;
use crate::plan::Cardinality;
use pretty_assertions::assert_eq;
use serde_json::json;

// ============================================================================
// Non-finite Numbers
// ============================================================================

mod non_finite_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_json_is_untouched() {
        let text = r#"{"cardinality": 5}"#;
        assert!(matches!(replace_non_finite(text), Cow::Borrowed(_)));
        assert_eq!(read_plan_json(text).unwrap(), json!({"cardinality": 5}));
    }

    #[test]
    fn test_bare_tokens_become_null() {
        let value =
            read_plan_json(r#"{"a": NaN, "b": Infinity, "c": -Infinity, "d": [NaN, 1]}"#).unwrap();
        assert_eq!(value, json!({"a": null, "b": null, "c": null, "d": [null, 1]}));
    }

    #[test]
    fn test_string_contents_are_kept() {
        let value = read_plan_json(r#"{"expr": "x = NaN", "quoted": "say \"Infinity\"", "n": NaN}"#)
            .unwrap();
        assert_eq!(
            value,
            json!({"expr": "x = NaN", "quoted": "say \"Infinity\"", "n": null})
        );
    }

    #[test]
    fn test_other_invalid_json_is_still_rejected() {
        let err = read_plan_json(r#"{"a": NaNa}"#).unwrap_err();
        assert!(!err.is_malformed_input());
    }
}

// ============================================================================
// Plan Text
// ============================================================================

#[test]
fn test_umbra_nan_estimate_is_unknown() {
    let text = r#"{"plan": {
        "operator": "tablescan",
        "operatorId": 1,
        "tablename": "region",
        "tableSize": 5,
        "cardinality": NaN,
        "analyzePlanCardinality": 5
    }}"#;

    let plan = parse_query_plan_str(Dialect::Umbra, "select 1", text, ParseOptions::default())
        .expect("plan with NaN parses");
    let scan = plan.real_root().unwrap();
    assert_eq!(scan.cardinality(), Cardinality::known(0, 5));
}

#[test]
fn test_parser_for_matches_dialect() {
    for dialect in [Dialect::Umbra, Dialect::Postgres, Dialect::Hyper, Dialect::DuckDb] {
        assert_eq!(parser_for(dialect, ParseOptions::default()).dialect(), dialect);
    }
}
