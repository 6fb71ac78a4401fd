//! DuckDB plan parser
//!
//! DuckDB's profiler output wraps the plan in a root object whose only child
//! is the `EXPLAIN_ANALYZE` operator. Operators are unnumbered and list their
//! inputs under `children`.

use super::PlanParser;
use super::context::{NodeId, ParseContext};
use crate::config::ParseOptions;
use crate::dialect::Dialect;
use crate::error::{PlanError, Result};
use crate::fragment::Fragment;
use crate::operator::create_operator;
use crate::plan::{Cardinality, NodeData, QueryPlan};
use serde_json::Value;

const DIALECT: Dialect = Dialect::DuckDb;

const CHILD_KEY: &str = "children";
const EXPLAIN_OPERATOR: &str = "EXPLAIN_ANALYZE";

/// Parser for DuckDB's JSON profiling output
#[derive(Debug, Clone, Default)]
pub struct DuckDbParser {
    options: ParseOptions,
}

impl DuckDbParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    fn build(&self, ctx: &mut ParseContext, value: &Value) -> Result<NodeId> {
        let node = Fragment::new(value, DIALECT)?;
        let id = ctx.next_operator_id();
        let mut operator = create_operator(DIALECT, node.str("operator_type")?, id)?;
        operator.fill(&node)?;

        let estimated = match node.structured("extra_info") {
            Some(extra) => extra.opt_cardinality("Estimated Cardinality")?,
            None => None,
        };
        let exact = node.cardinality("operator_cardinality")?;
        let provenance = ctx.provenance(&node, &[CHILD_KEY]);
        let data = NodeData::new(operator, Cardinality::new(estimated, Some(exact)), provenance);

        let children = node.opt_array(CHILD_KEY)?.unwrap_or_default();
        if children.is_empty() {
            return Ok(ctx.add_leaf(data));
        }
        let children = children
            .iter()
            .map(|child| self.build(ctx, child))
            .collect::<Result<Vec<_>>>()?;
        Ok(ctx.add_inner(data, children))
    }
}

/// Returns the single child of a profiler wrapper object
fn only_child<'a>(wrapper: &Fragment<'a>) -> Result<&'a Value> {
    match wrapper.array(CHILD_KEY)? {
        [child] => Ok(child),
        children => Err(PlanError::malformed(
            DIALECT,
            format!("expected exactly one child, found {}", children.len()),
        )),
    }
}

impl PlanParser for DuckDbParser {
    fn dialect(&self) -> Dialect {
        DIALECT
    }

    fn parse_plan(&self, query: &str, raw: &Value) -> Result<QueryPlan> {
        let envelope = Fragment::new(raw, DIALECT)?;
        let explain = Fragment::new(only_child(&envelope)?, DIALECT)?;
        let operator = explain.str("operator_type")?;
        if operator != EXPLAIN_OPERATOR {
            return Err(PlanError::malformed(
                DIALECT,
                format!("expected {EXPLAIN_OPERATOR} below the root, found {operator}"),
            ));
        }

        let mut ctx = ParseContext::new(DIALECT, self.options);
        let root = self.build(&mut ctx, only_child(&explain)?)?;
        Ok(QueryPlan::wrap(query, DIALECT, ctx.materialize(root)?))
    }
}
