//! PostgreSQL plan parser
//!
//! PostgreSQL does not number plan nodes, so ids are handed out in visiting
//! order. CTEs arrive as `InitPlan` entries among a node's `Plans`; each one
//! is wrapped in a synthetic Temp node and attached under the first CTE Scan
//! that reads it.

use super::PlanParser;
use super::context::{NodeId, ParseContext, SharedKey};
use crate::config::ParseOptions;
use crate::dialect::Dialect;
use crate::error::{PlanError, Result};
use crate::fragment::Fragment;
use crate::operator::{Operator, OperatorKind, create_operator};
use crate::plan::{Cardinality, NodeData, Provenance, QueryPlan};
use serde_json::Value;

const DIALECT: Dialect = Dialect::Postgres;

const CHILD_KEY: &str = "Plans";

/// Parser for `EXPLAIN (ANALYZE, FORMAT JSON)` output
#[derive(Debug, Clone, Default)]
pub struct PostgresParser {
    options: ParseOptions,
}

impl PostgresParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    fn build(&self, ctx: &mut ParseContext, value: &Value) -> Result<NodeId> {
        let node = Fragment::new(value, DIALECT)?;
        let id = ctx.next_operator_id();
        let mut operator = create_operator(DIALECT, node.str("Node Type")?, id)?;
        operator.fill(&node)?;

        let cardinality = Cardinality::known(
            node.cardinality("Plan Rows")?,
            node.cardinality("Actual Rows")?,
        );
        let provenance = ctx.provenance(&node, &[CHILD_KEY]);
        let plans = node.opt_array(CHILD_KEY)?;

        // CTEs are built before the node's own inputs
        for entry in plans.unwrap_or_default() {
            if let Some(name) = cte_name(entry) {
                self.build_cte(ctx, entry, name)?;
            }
        }

        if let OperatorKind::PipelineBreakerScan { scanned_id } = &mut operator.kind {
            let key = SharedKey::Name(node.str("CTE Name")?.to_string());
            let (temp, first_reference) = ctx.resolve_shared_once(&key)?;
            *scanned_id = Some(ctx.data(temp).operator.id);
            if first_reference {
                let data = NodeData::new(operator, cardinality, provenance);
                return Ok(ctx.add_inner(data, vec![temp]));
            }
        }

        let data = NodeData::new(operator, cardinality, provenance);
        let Some(plans) = plans else {
            return Ok(ctx.add_leaf(data));
        };

        let mut children = Vec::with_capacity(plans.len());
        for entry in plans {
            if cte_name(entry).is_none() {
                children.push(self.build(ctx, entry)?);
            }
        }
        Ok(ctx.add_inner(data, children))
    }

    fn build_cte(&self, ctx: &mut ParseContext, entry: &Value, name: &str) -> Result<()> {
        let body = self.build(ctx, entry)?;
        let temp_id = ctx.next_operator_id();
        let data = NodeData::new(
            Operator::new(temp_id, OperatorKind::Temp),
            ctx.data(body).cardinality,
            Provenance::marker(),
        );
        let temp = ctx.add_inner(data, vec![body]);
        ctx.register_shared(SharedKey::Name(name.to_string()), temp);
        Ok(())
    }
}

/// Returns the CTE name of an `InitPlan` entry
fn cte_name(entry: &Value) -> Option<&str> {
    if entry.get("Parent Relationship").and_then(Value::as_str) != Some("InitPlan") {
        return None;
    }
    entry.get("Subplan Name")?.as_str()?.strip_prefix("CTE ")
}

impl PlanParser for PostgresParser {
    fn dialect(&self) -> Dialect {
        DIALECT
    }

    fn parse_plan(&self, query: &str, raw: &Value) -> Result<QueryPlan> {
        // EXPLAIN returns a one-element array; accept the bare element too
        let document = match raw {
            Value::Array(items) => items
                .first()
                .ok_or_else(|| PlanError::malformed(DIALECT, "empty plan list"))?,
            other => other,
        };
        let envelope = Fragment::new(document, DIALECT)?;
        let mut ctx = ParseContext::new(DIALECT, self.options);
        let root = self.build(&mut ctx, envelope.required("Plan")?)?;
        Ok(QueryPlan::wrap(query, DIALECT, ctx.materialize(root)?))
    }
}
