//! Hyper plan parser
//!
//! Hyper nests inputs under `input` (an array for set operations) or
//! `left`/`right`. An `explicitscan` either carries the shared pipeline it
//! reads as an `input` object or refers to it by operator id.

use super::PlanParser;
use super::context::{NodeId, ParseContext, SharedKey};
use crate::config::ParseOptions;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::fragment::Fragment;
use crate::operator::{OperatorType, create_operator};
use crate::plan::{Cardinality, NodeData, QueryPlan};
use serde_json::Value;

const DIALECT: Dialect = Dialect::Hyper;

const CHILD_KEYS: &[&str] = &["input", "left", "right", "source"];
const NESTED_KEYS: &[&str] = &["input", "left", "right"];

/// Parser for Hyper's `EXPLAIN (FORMAT JSON, ANALYZE)` output
#[derive(Debug, Clone, Default)]
pub struct HyperParser {
    options: ParseOptions,
}

impl HyperParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    fn build(&self, ctx: &mut ParseContext, value: &Value) -> Result<NodeId> {
        let node = Fragment::new(value, DIALECT)?;
        let mut operator = create_operator(DIALECT, node.str("operator")?, node.i64("operatorId")?)?;
        operator.fill(&node)?;

        let estimated = node.opt_cardinality("cardinality")?.unwrap_or(0);
        let exact = node.object("analyze")?.cardinality("tuple-count")?;
        let provenance = ctx.provenance(&node, NESTED_KEYS);
        let operator_type = operator.operator_type();
        let index_lookup = operator.join_method() == Some("indexnl");
        let scanned_id = operator.scanned_id();
        let data = NodeData::new(operator, Cardinality::known(estimated, exact), provenance);

        if !node.contains_any(CHILD_KEYS) {
            return Ok(ctx.add_leaf(data));
        }

        let duplicate = ctx.options().duplicate_shared_pipelines;
        let mut children = Vec::new();
        if operator_type == OperatorType::PipelineBreakerScan {
            if let (Some(definition @ Value::Object(_)), Some(scanned_id)) =
                (node.get("input"), scanned_id)
            {
                let child = self.build(ctx, definition)?;
                if duplicate {
                    ctx.register_shared(SharedKey::Id(scanned_id), child);
                } else {
                    ctx.register_attached(SharedKey::Id(scanned_id), child);
                    children.push(child);
                }
            }
        } else if let Some(input) = node.get("input") {
            match input {
                Value::Array(inputs) => {
                    for input in inputs {
                        children.push(self.build(ctx, input)?);
                    }
                }
                input => children.push(self.build(ctx, input)?),
            }
        } else if node.contains("left") && node.contains("right") {
            children.push(self.build(ctx, node.required("left")?)?);
            children.push(self.build(ctx, node.required("right")?)?);
        }

        if duplicate {
            for &child in &children {
                if ctx.operator_type(child) == OperatorType::PipelineBreakerScan {
                    ctx.defer_reference(child);
                }
            }
        }

        // Index lookups do not count the probed table's tuples
        if index_lookup
            && let Some(&probed) = children.get(1)
            && ctx.operator_type(probed) == OperatorType::TableScan
        {
            let cardinality = &mut ctx.data_mut(probed).cardinality;
            cardinality.exact = cardinality.estimated;
        }

        Ok(ctx.add_inner(data, children))
    }
}

impl PlanParser for HyperParser {
    fn dialect(&self) -> Dialect {
        DIALECT
    }

    fn parse_plan(&self, query: &str, raw: &Value) -> Result<QueryPlan> {
        let envelope = Fragment::new(raw, DIALECT)?;
        let mut ctx = ParseContext::new(DIALECT, self.options);
        let root = self.build(&mut ctx, envelope.required("input")?)?;
        if self.options.duplicate_shared_pipelines {
            ctx.attach_shared_pipelines()?;
        }
        Ok(QueryPlan::wrap(query, DIALECT, ctx.materialize(root)?))
    }
}
