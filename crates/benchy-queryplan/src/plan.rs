//! Plan Node Model - the canonical, vendor-independent plan tree
//!
//! Every translated plan is rooted at a synthetic Result node whose single
//! child is the vendor's real plan root.

use crate::clean::{Cleaner, cleaner_for};
use crate::dialect::Dialect;
use crate::operator::{Operator, OperatorType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provenance fragment attached to nodes that were not produced by a vendor
pub const SYSTEM_MARKER: &str = "// added by benchy";

/// Estimated and measured row counts of a plan node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cardinality {
    /// Row count predicted by the planner
    pub estimated: Option<u64>,
    /// Row count measured during execution
    pub exact: Option<u64>,
}

impl Cardinality {
    pub fn new(estimated: Option<u64>, exact: Option<u64>) -> Self {
        Self { estimated, exact }
    }

    /// Creates a cardinality with both row counts known
    pub fn known(estimated: u64, exact: u64) -> Self {
        Self::new(Some(estimated), Some(exact))
    }

    pub fn zero() -> Self {
        Self::known(0, 0)
    }

    /// Returns true if either row count is known and positive
    pub fn is_positive(&self) -> bool {
        self.estimated.is_some_and(|rows| rows > 0) || self.exact.is_some_and(|rows| rows > 0)
    }
}

/// Vendor-native fragments a node was translated from, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Provenance(Vec<Value>);

impl Provenance {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Provenance of a node synthesized during translation
    pub fn marker() -> Self {
        Self::single(Value::from(SYSTEM_MARKER))
    }

    pub fn single(fragment: Value) -> Self {
        Self(vec![fragment])
    }

    pub fn fragments(&self) -> &[Value] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Puts `earlier` in front of the current fragments
    pub fn prepend(&mut self, earlier: Provenance) {
        let mut fragments = earlier.0;
        fragments.append(&mut self.0);
        self.0 = fragments;
    }
}

impl From<Vec<Value>> for Provenance {
    fn from(fragments: Vec<Value>) -> Self {
        Self(fragments)
    }
}

/// Payload shared by leaf and inner nodes
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub operator: Operator,
    pub cardinality: Cardinality,
    pub provenance: Provenance,
}

impl NodeData {
    pub fn new(operator: Operator, cardinality: Cardinality, provenance: Provenance) -> Self {
        Self {
            operator,
            cardinality,
            provenance,
        }
    }
}

/// A node in the canonical plan tree
///
/// Child order is meaningful: for binary operators the first child is the
/// left input.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanNode {
    Leaf(NodeData),
    /// An operator with inputs; the child list may be empty for an
    /// unresolved shared pipeline reference
    Inner {
        data: NodeData,
        children: Vec<PlanNode>,
    },
}

impl PlanNode {
    pub fn leaf(data: NodeData) -> Self {
        Self::Leaf(data)
    }

    pub fn inner(data: NodeData, children: Vec<PlanNode>) -> Self {
        Self::Inner { data, children }
    }

    pub fn data(&self) -> &NodeData {
        match self {
            Self::Leaf(data) | Self::Inner { data, .. } => data,
        }
    }

    pub fn data_mut(&mut self) -> &mut NodeData {
        match self {
            Self::Leaf(data) | Self::Inner { data, .. } => data,
        }
    }

    pub fn operator(&self) -> &Operator {
        &self.data().operator
    }

    pub fn operator_type(&self) -> OperatorType {
        self.operator().operator_type()
    }

    pub fn cardinality(&self) -> Cardinality {
        self.data().cardinality
    }

    pub fn provenance(&self) -> &Provenance {
        &self.data().provenance
    }

    /// Returns the ordered children; empty for leaves
    pub fn children(&self) -> &[PlanNode] {
        match self {
            Self::Leaf(_) => &[],
            Self::Inner { children, .. } => children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Count total nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(PlanNode::node_count).sum::<usize>()
    }

    /// Get the maximum depth of this subtree
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(PlanNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Iterate over all nodes depth-first, parents before children
    pub fn iter(&self) -> PlanNodeIterator<'_> {
        PlanNodeIterator::new(self)
    }

    /// Folds a removed parent into this node
    ///
    /// The removed node's fragments go in front of this node's own, and its
    /// cardinalities replace this node's.
    pub fn absorb(mut self, removed: NodeData) -> Self {
        let data = self.data_mut();
        data.cardinality = removed.cardinality;
        data.provenance.prepend(removed.provenance);
        self
    }

    /// Splits the node into its payload and, for inner nodes, its children
    pub fn into_parts(self) -> (NodeData, Option<Vec<PlanNode>>) {
        match self {
            Self::Leaf(data) => (data, None),
            Self::Inner { data, children } => (data, Some(children)),
        }
    }
}

/// A translated plan together with the query it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    /// The original query text
    pub text: String,
    /// The system the plan was reported by
    pub dialect: Dialect,
    /// The synthetic Result root
    pub root: PlanNode,
}

impl QueryPlan {
    /// Wraps a vendor's plan root under the synthetic Result node
    ///
    /// The Result node mirrors the real root's cardinalities.
    pub fn wrap(text: impl Into<String>, dialect: Dialect, real_root: PlanNode) -> Self {
        let data = NodeData::new(
            Operator::result(),
            real_root.cardinality(),
            Provenance::marker(),
        );
        Self {
            text: text.into(),
            dialect,
            root: PlanNode::inner(data, vec![real_root]),
        }
    }

    /// Returns the vendor's real plan root
    pub fn real_root(&self) -> Option<&PlanNode> {
        self.root.children().first()
    }

    /// Iterate over all nodes in the plan (depth-first)
    pub fn iter_nodes(&self) -> PlanNodeIterator<'_> {
        self.root.iter()
    }

    /// Find all nodes of a specific type
    pub fn find_nodes_by_type(&self, operator_type: OperatorType) -> Vec<&PlanNode> {
        self.iter_nodes()
            .filter(|node| node.operator_type() == operator_type)
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Applies the cleanup rules of the plan's dialect
    pub fn clean(self) -> Self {
        let root = cleaner_for(self.dialect).clean(self.root);
        Self { root, ..self }
    }
}

/// Iterator for traversing plan nodes depth-first
pub struct PlanNodeIterator<'a> {
    stack: Vec<&'a PlanNode>,
}

impl<'a> PlanNodeIterator<'a> {
    fn new(root: &'a PlanNode) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for PlanNodeIterator<'a> {
    type Item = &'a PlanNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}
