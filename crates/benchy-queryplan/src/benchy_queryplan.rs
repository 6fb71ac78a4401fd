//! Benchy Query Plan - vendor-independent EXPLAIN ANALYZE plans
//!
//! This crate translates the structured plan output of Umbra, PostgreSQL,
//! Hyper and DuckDB into one canonical operator tree:
//! - Parsing each vendor's plan document, including shared pipelines and CTEs
//! - Cleaning vendor bookkeeping operators out of the tree
//! - Encoding the tree as JSON or XML alongside the query text
//!
//! # Example
//!
//! ```
//! use benchy_queryplan::{Dialect, TranslateConfig, translate};
//! use serde_json::json;
//!
//! let raw = json!([{"Plan": {
//!     "Node Type": "Seq Scan",
//!     "Relation Name": "region",
//!     "Plan Rows": 5,
//!     "Actual Rows": 5
//! }}]);
//! let document = translate(
//!     Dialect::Postgres,
//!     "select *\n  from region",
//!     &raw,
//!     &TranslateConfig::default(),
//! )
//! .unwrap();
//! assert!(document.starts_with(r#"{"queryText":"select * from region","queryPlan":{"_label":"Result""#));
//! ```

pub mod clean;
pub mod config;
pub mod dialect;
pub mod encoder;
pub mod error;
pub mod fragment;
pub mod operator;
pub mod parsers;
pub mod plan;

pub use clean::{Cleaner, Rule, RuleCleaner, cleaner_for};
pub use config::{ParseOptions, TranslateConfig};
pub use dialect::Dialect;
pub use encoder::{
    EncodedNode, EncodedQueryPlan, EncodingFormat, JsonEncoder, PlanNodeEncoder, XmlEncoder,
    decode_query_plan, encode_query_plan, normalize_query_text,
};
pub use error::{PlanError, Result};
pub use operator::{
    ChildOrder, JoinKind, Operator, OperatorKind, OperatorTemplate, OperatorType,
    create_operator, vocabulary,
};
pub use parsers::{
    PlanParser, parse_query_plan, parse_query_plan_str, parser_for, read_plan_json,
};
pub use plan::{Cardinality, NodeData, PlanNode, PlanNodeIterator, Provenance, QueryPlan};

use serde_json::Value;

/// Parses, optionally cleans, and encodes one vendor plan
pub fn translate(
    dialect: Dialect,
    query: &str,
    raw: &Value,
    config: &TranslateConfig,
) -> Result<String> {
    let mut plan = parse_query_plan(dialect, query, raw, config.parse)?;
    if config.clean {
        plan = plan.clean();
        tracing::debug!(%dialect, nodes = plan.node_count(), "cleaned query plan");
    }
    encode_query_plan(&plan, config.format)
}
