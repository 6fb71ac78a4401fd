//! Umbra plan parser
//!
//! Umbra numbers its operators and nests inputs under named keys. Shared
//! pipelines appear either as a `magic` child or as the `pipelineBreaker`
//! definition attached to one of the scans that read it.

use super::PlanParser;
use super::context::{NodeId, ParseContext, SharedKey};
use crate::config::ParseOptions;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::fragment::Fragment;
use crate::operator::{OperatorType, create_operator};
use crate::plan::{Cardinality, NodeData, QueryPlan};
use serde_json::Value;

const DIALECT: Dialect = Dialect::Umbra;

/// Keys whose presence makes a node an inner node
const CHILD_KEYS: &[&str] = &[
    "input",
    "left",
    "right",
    "arguments",
    "magic",
    "scannedOperator",
    "inputs",
];

/// Keys removed from a node's provenance fragment
const NESTED_KEYS: &[&str] = &[
    "magic",
    "pipelineBreaker",
    "input",
    "left",
    "right",
    "arguments",
    "inputs",
];

/// Parser for Umbra's `EXPLAIN (ANALYZE, FORMAT JSON)` output
#[derive(Debug, Clone, Default)]
pub struct UmbraParser {
    options: ParseOptions,
}

impl UmbraParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    fn build(&self, ctx: &mut ParseContext, value: &Value) -> Result<NodeId> {
        let node = Fragment::new(value, DIALECT)?;
        let mut operator = create_operator(DIALECT, node.str("operator")?, node.i64("operatorId")?)?;
        operator.fill(&node)?;

        let estimated = node.opt_cardinality("cardinality")?.unwrap_or(0);
        let exact = node
            .opt_cardinality("analyzePlanCardinality")?
            .unwrap_or(estimated);
        let provenance = ctx.provenance(&node, NESTED_KEYS);
        let operator_type = operator.operator_type();
        let data = NodeData::new(operator, Cardinality::known(estimated, exact), provenance);

        if !node.contains_any(CHILD_KEYS) {
            return Ok(ctx.add_leaf(data));
        }

        let duplicate = ctx.options().duplicate_shared_pipelines;
        let mut children = Vec::new();
        if let Some(magic) = node.get("magic") {
            let child = self.build(ctx, magic)?;
            let magic_id = ctx.data(child).operator.id;
            ctx.register_attached(SharedKey::Id(magic_id), child);
            children.push(child);
        }

        if operator_type == OperatorType::PipelineBreakerScan {
            if let Some(definition) = node.get("pipelineBreaker") {
                let child = self.build(ctx, definition)?;
                let key = SharedKey::Id(node.i64("scannedOperator")?);
                if duplicate {
                    ctx.register_shared(key, child);
                } else {
                    ctx.register_attached(key, child);
                    children.push(child);
                }
            }
        } else if let Some(input) = node.get("input") {
            children.push(self.build(ctx, input)?);
        } else if node.contains("left") && node.contains("right") {
            let left = self.build(ctx, node.required("left")?)?;
            let right = self.build(ctx, node.required("right")?)?;
            // The probed relation is never fully executed
            if node.str("physicalOperator")? == "indexnljoin" {
                ctx.data_mut(right).cardinality.exact = Some(0);
            }
            children.push(left);
            children.push(right);
        } else if let Some(arguments) = node.opt_array("arguments")? {
            for argument in arguments {
                let argument = Fragment::new(argument, DIALECT)?;
                children.push(self.build(ctx, argument.required("input")?)?);
            }
        } else if let Some(inputs) = node.opt_array("inputs")? {
            for input in inputs {
                let input = Fragment::new(input, DIALECT)?;
                children.push(self.build(ctx, input.required("op")?)?);
            }
        }

        if duplicate {
            for &child in &children {
                if ctx.operator_type(child) == OperatorType::PipelineBreakerScan {
                    ctx.defer_reference(child);
                }
            }
        }

        Ok(ctx.add_inner(data, children))
    }
}

impl PlanParser for UmbraParser {
    fn dialect(&self) -> Dialect {
        DIALECT
    }

    fn parse_plan(&self, query: &str, raw: &Value) -> Result<QueryPlan> {
        let envelope = Fragment::new(raw, DIALECT)?;
        let mut ctx = ParseContext::new(DIALECT, self.options);
        let root = self.build(&mut ctx, envelope.required("plan")?)?;
        if self.options.duplicate_shared_pipelines {
            ctx.attach_shared_pipelines()?;
        }
        Ok(QueryPlan::wrap(query, DIALECT, ctx.materialize(root)?))
    }
}

#[cfg(test)]
mod tests;
