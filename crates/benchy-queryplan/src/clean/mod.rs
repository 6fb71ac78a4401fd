//! Plan Cleaners
//!
//! Vendors report the same relational work with different bookkeeping
//! operators around it. Cleaning rewrites a canonical tree bottom-up so that
//! plans from different systems line up: pass-through nodes are folded into
//! their input, vendor spellings are renamed, and join inputs are put in
//! canonical order. Nodes that do distinct relational work are never removed.

use crate::dialect::Dialect;
use crate::fragment::to_cardinality;
use crate::operator::{ChildOrder, OperatorKind, OperatorTemplate, OperatorType};
use crate::plan::{Cardinality, NodeData, PlanNode, Provenance};
use serde_json::Value;

/// Rewrites a plan tree, returning the new root
pub trait Cleaner {
    fn clean(&self, node: PlanNode) -> PlanNode;
}

/// One structural rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Rule {
    /// Splice the only child of a pass-through operator into its slot
    FoldThrough(&'static [OperatorTemplate]),
    /// Fold a Select into a Join or TableScan input, which filter anyway
    AbsorbFilter,
    /// Rewrite TopN and Limit as a Sort, importing the TopN limit
    RenameToSort,
    /// Swap the inputs of joins stored in reverse order
    NormalizeJoinOrder,
    /// Report zero rows for the subtree under a pipeline breaker rescan
    ZeroRescan,
}

use OperatorTemplate::{Canonical as C, Custom as X};

const HYPER_UMBRA_RULES: &[Rule] = &[
    Rule::FoldThrough(&[
        C(OperatorType::Map),
        X("EarlyExecution"),
        X("AssertSingle"),
    ]),
    Rule::AbsorbFilter,
    Rule::ZeroRescan,
];

const DUCKDB_RULES: &[Rule] = &[
    Rule::NormalizeJoinOrder,
    Rule::FoldThrough(&[X("Projection")]),
    Rule::AbsorbFilter,
    Rule::RenameToSort,
];

const POSTGRES_RULES: &[Rule] = &[Rule::FoldThrough(&[X("Hash"), X("Gather")])];

impl Rule {
    pub fn name(&self) -> &'static str {
        self.into()
    }

    fn matches(&self, data: &NodeData, children: &[PlanNode]) -> bool {
        let operator = &data.operator;
        match self {
            Self::FoldThrough(templates) => {
                children.len() == 1 && templates.iter().any(|t| t.matches(operator))
            }
            Self::AbsorbFilter => {
                operator.operator_type() == OperatorType::Select
                    && matches!(
                        children,
                        [child] if matches!(
                            child.operator_type(),
                            OperatorType::Join | OperatorType::TableScan
                        )
                    )
            }
            Self::RenameToSort => matches!(operator.custom_name(), Some("TopN" | "Limit")),
            Self::NormalizeJoinOrder => {
                children.len() == 2
                    && matches!(
                        operator.kind,
                        OperatorKind::Join {
                            child_order: ChildOrder::Reversed,
                            ..
                        }
                    )
            }
            Self::ZeroRescan => {
                operator.operator_type() == OperatorType::PipelineBreakerScan
                    && matches!(children, [child] if child.cardinality().is_positive())
            }
        }
    }

    fn apply(&self, mut data: NodeData, mut children: Vec<PlanNode>) -> PlanNode {
        match self {
            Self::FoldThrough(_) | Self::AbsorbFilter => match children.pop() {
                Some(child) => child.absorb(data),
                None => PlanNode::inner(data, children),
            },
            Self::RenameToSort => {
                let limit = match data.operator.custom_name() {
                    Some("TopN") => top_n_limit(&data.provenance),
                    _ => None,
                };
                data.operator.kind = OperatorKind::Sort { limit };
                PlanNode::inner(data, children)
            }
            Self::NormalizeJoinOrder => {
                children.reverse();
                if let OperatorKind::Join { child_order, .. } = &mut data.operator.kind {
                    *child_order = ChildOrder::Canonical;
                }
                PlanNode::inner(data, children)
            }
            Self::ZeroRescan => {
                for child in &mut children {
                    child.data_mut().cardinality = Cardinality::zero();
                }
                PlanNode::inner(data, children)
            }
        }
    }
}

/// Reads a TopN's row limit from its DuckDB fragment
///
/// Newer releases report `{"Top": "10"}`, older ones a text block whose first
/// line reads `Top 10`.
fn top_n_limit(provenance: &Provenance) -> Option<u64> {
    let extra_info = provenance.fragments().first()?.get("extra_info")?;
    match extra_info {
        Value::Object(info) => info.get("Top").and_then(to_cardinality),
        Value::String(text) => text
            .lines()
            .next()?
            .split_whitespace()
            .nth(1)?
            .parse()
            .ok(),
        _ => None,
    }
}

/// Applies an ordered rule set bottom-up
///
/// Children are cleaned before their parent; the first matching rule rewrites
/// the parent. Leaves are never rewritten.
#[derive(Debug, Clone, Copy)]
pub struct RuleCleaner {
    rules: &'static [Rule],
}

impl RuleCleaner {
    pub const fn new(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    fn rewrite(&self, data: NodeData, children: Vec<PlanNode>) -> PlanNode {
        let Some(rule) = self.rules.iter().find(|rule| rule.matches(&data, &children)) else {
            return PlanNode::inner(data, children);
        };
        tracing::debug!(
            rule = rule.name(),
            operator = data.operator.operator_type().name(),
            operator_id = data.operator.id,
            "rewriting plan node"
        );
        rule.apply(data, children)
    }
}

impl Cleaner for RuleCleaner {
    fn clean(&self, node: PlanNode) -> PlanNode {
        let (data, children) = node.into_parts();
        let Some(children) = children else {
            return PlanNode::leaf(data);
        };
        let children = children.into_iter().map(|child| self.clean(child)).collect();
        self.rewrite(data, children)
    }
}

/// Returns the cleaner for a dialect
pub fn cleaner_for(dialect: Dialect) -> RuleCleaner {
    match dialect {
        Dialect::Umbra | Dialect::Hyper => RuleCleaner::new(HYPER_UMBRA_RULES),
        Dialect::DuckDb => RuleCleaner::new(DUCKDB_RULES),
        Dialect::Postgres => RuleCleaner::new(POSTGRES_RULES),
    }
}
