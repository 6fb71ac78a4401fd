//! Per-parse state: the node arena and the shared-subtree table
//!
//! Parsers build every node into an arena and refer to nodes by [`NodeId`].
//! Shared pipelines and CTEs are registered under their native key, and
//! deferred references are spliced in by [`ParseContext::attach_shared_pipelines`]
//! which only ever appends ids to child lists. [`ParseContext::materialize`]
//! then turns the arena into an owned tree.

use crate::config::ParseOptions;
use crate::dialect::Dialect;
use crate::error::{PlanError, Result};
use crate::fragment::Fragment;
use crate::operator::OperatorType;
use crate::plan::{NodeData, PlanNode, Provenance};
use std::collections::HashMap;

/// Index of a node in the parse arena
pub(crate) type NodeId = usize;

/// Native key of a shared subtree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum SharedKey {
    /// Operator id of a shared pipeline
    Id(i64),
    /// Name of a common table expression
    Name(String),
}

#[derive(Debug)]
struct ArenaNode {
    data: NodeData,
    /// `None` for leaves
    children: Option<Vec<NodeId>>,
}

#[derive(Debug, Clone, Copy)]
struct SharedEntry {
    node: NodeId,
    attachments: usize,
}

#[derive(Debug)]
pub(crate) struct ParseContext {
    dialect: Dialect,
    options: ParseOptions,
    nodes: Vec<ArenaNode>,
    shared: HashMap<SharedKey, SharedEntry>,
    /// Pipeline breaker scans waiting for their shared subtree
    pending: Vec<NodeId>,
    next_operator_id: i64,
}

impl ParseContext {
    pub fn new(dialect: Dialect, options: ParseOptions) -> Self {
        Self {
            dialect,
            options,
            nodes: Vec::new(),
            shared: HashMap::new(),
            pending: Vec::new(),
            next_operator_id: 0,
        }
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Hands out ids for dialects that do not number their operators
    pub fn next_operator_id(&mut self) -> i64 {
        let id = self.next_operator_id;
        self.next_operator_id += 1;
        id
    }

    /// Records a node's vendor fragment, minus the keys holding its children
    pub fn provenance(&self, node: &Fragment<'_>, child_keys: &[&str]) -> Provenance {
        if self.options.include_system_representation {
            Provenance::single(node.without(child_keys))
        } else {
            Provenance::empty()
        }
    }

    pub fn add_leaf(&mut self, data: NodeData) -> NodeId {
        self.push(data, None)
    }

    pub fn add_inner(&mut self, data: NodeData, children: Vec<NodeId>) -> NodeId {
        self.push(data, Some(children))
    }

    fn push(&mut self, data: NodeData, children: Option<Vec<NodeId>>) -> NodeId {
        self.nodes.push(ArenaNode { data, children });
        self.nodes.len() - 1
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id].data
    }

    pub fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id].data
    }

    pub fn operator_type(&self, id: NodeId) -> OperatorType {
        self.data(id).operator.operator_type()
    }

    /// Registers a shared subtree; a later definition under the same key wins
    pub fn register_shared(&mut self, key: SharedKey, node: NodeId) {
        self.shared.insert(
            key,
            SharedEntry {
                node,
                attachments: 0,
            },
        );
    }

    /// Registers a shared subtree that is already attached at its definition
    pub fn register_attached(&mut self, key: SharedKey, node: NodeId) {
        self.shared.insert(
            key,
            SharedEntry {
                node,
                attachments: 1,
            },
        );
    }

    /// Looks up a shared subtree and counts the reference as an attachment
    ///
    /// Returns the subtree and whether this was its first attachment.
    pub fn resolve_shared_once(&mut self, key: &SharedKey) -> Result<(NodeId, bool)> {
        let dialect = self.dialect;
        let entry = self
            .shared
            .get_mut(key)
            .ok_or_else(|| unknown_shared(dialect, key))?;
        entry.attachments += 1;
        Ok((entry.node, entry.attachments == 1))
    }

    /// Returns how often a shared subtree has been attached so far
    #[cfg(test)]
    pub fn attachment_count(&self, key: &SharedKey) -> usize {
        self.shared.get(key).map_or(0, |entry| entry.attachments)
    }

    /// Leaves a pipeline breaker scan childless until the attach pass
    pub fn defer_reference(&mut self, scan: NodeId) {
        self.pending.push(scan);
    }

    /// Splices every deferred scan's shared subtree into its child list
    pub fn attach_shared_pipelines(&mut self) -> Result<()> {
        let dialect = self.dialect;
        for scan in std::mem::take(&mut self.pending) {
            let operator = &self.data(scan).operator;
            let scan_id = operator.id;
            let scanned_id = operator.scanned_id().ok_or_else(|| {
                PlanError::malformed(
                    dialect,
                    format!("operator {scan_id} does not name a shared pipeline"),
                )
            })?;
            let key = SharedKey::Id(scanned_id);
            let entry = self
                .shared
                .get_mut(&key)
                .ok_or_else(|| unknown_shared(dialect, &key))?;
            entry.attachments += 1;
            let shared = entry.node;

            tracing::trace!(
                dialect = %dialect,
                scan = scan_id,
                scanned_id,
                "attaching shared pipeline"
            );
            self.nodes[scan].children.get_or_insert_with(Vec::new).push(shared);
        }
        Ok(())
    }

    /// Builds the owned tree rooted at `root`
    ///
    /// A subtree reached more than once is cloned each time. A subtree that
    /// reaches itself is rejected.
    pub fn materialize(&self, root: NodeId) -> Result<PlanNode> {
        let mut visiting = vec![false; self.nodes.len()];
        self.materialize_node(root, &mut visiting)
    }

    fn materialize_node(&self, id: NodeId, visiting: &mut [bool]) -> Result<PlanNode> {
        if visiting[id] {
            return Err(PlanError::malformed(
                self.dialect,
                format!(
                    "shared pipeline {} references itself",
                    self.data(id).operator.id
                ),
            ));
        }

        let node = &self.nodes[id];
        let Some(children) = &node.children else {
            return Ok(PlanNode::leaf(node.data.clone()));
        };

        visiting[id] = true;
        let children = children
            .iter()
            .map(|&child| self.materialize_node(child, visiting))
            .collect::<Result<Vec<_>>>()?;
        visiting[id] = false;

        Ok(PlanNode::inner(node.data.clone(), children))
    }
}

fn unknown_shared(dialect: Dialect, key: &SharedKey) -> PlanError {
    let message = match key {
        SharedKey::Id(id) => format!("reference to unknown shared pipeline {id}"),
        SharedKey::Name(name) => format!("reference to unknown CTE '{name}'"),
    };
    PlanError::malformed(dialect, message)
}
