use super::{PlanNodeEncoder, node_attributes};
use crate::plan::PlanNode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Object form of one plan node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedNode {
    #[serde(rename = "_label")]
    pub label: String,
    #[serde(rename = "_attrs")]
    pub attrs: Map<String, Value>,
    #[serde(rename = "_children", default)]
    pub children: Vec<EncodedNode>,
}

impl EncodedNode {
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(EncodedNode::node_count).sum::<usize>()
    }

    /// Labels of all nodes, parents before children
    pub fn labels(&self) -> Vec<&str> {
        let mut labels = vec![self.label.as_str()];
        for child in &self.children {
            labels.extend(child.labels());
        }
        labels
    }
}

/// Encodes plan nodes as nested JSON objects
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl PlanNodeEncoder for JsonEncoder {
    type Output = EncodedNode;

    fn encode_plan_node(&self, node: &PlanNode) -> EncodedNode {
        EncodedNode {
            label: node.operator_type().name().to_string(),
            attrs: node_attributes(node)
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
            children: node
                .children()
                .iter()
                .map(|child| self.encode_plan_node(child))
                .collect(),
        }
    }
}
