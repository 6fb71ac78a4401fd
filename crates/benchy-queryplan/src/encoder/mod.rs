//! Plan Encoders
//!
//! Serializes a canonical plan together with its query text. Two symmetric
//! target forms exist: a nested JSON object (`_label`, `_attrs`,
//! `_children`) and an equivalent XML element tree.

mod json;
mod xml;

pub use json::{EncodedNode, JsonEncoder};
pub use xml::XmlEncoder;

use crate::error::Result;
use crate::plan::{PlanNode, QueryPlan};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const LABEL_KEY: &str = "_label";
pub const ATTRIBUTES_KEY: &str = "_attrs";
pub const CHILDREN_KEY: &str = "_children";
pub const QUERY_TEXT_KEY: &str = "queryText";
pub const QUERY_PLAN_KEY: &str = "queryPlan";

pub const OPERATOR_ID_KEY: &str = "operator_id";
pub const ESTIMATED_CARDINALITY_KEY: &str = "estimated_cardinality";
pub const EXACT_CARDINALITY_KEY: &str = "exact_cardinality";
pub const SYSTEM_REPRESENTATION_KEY: &str = "system_representation";

/// Target form of an encoded plan
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EncodingFormat {
    #[default]
    Json,
    Xml,
}

/// Converts a plan tree into one interchange form
pub trait PlanNodeEncoder {
    type Output;

    fn encode_plan_node(&self, node: &PlanNode) -> Self::Output;
}

/// The encoded document: normalized query text plus the encoded tree
///
/// `P` is [`EncodedNode`] for the JSON form and the markup string for XML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedQueryPlan<P = EncodedNode> {
    #[serde(rename = "queryText")]
    pub query_text: String,
    #[serde(rename = "queryPlan")]
    pub query_plan: P,
}

/// Encodes a plan and its query text as a JSON document
pub fn encode_query_plan(plan: &QueryPlan, format: EncodingFormat) -> Result<String> {
    let query_text = normalize_query_text(&plan.text);
    let document = match format {
        EncodingFormat::Json => serde_json::to_string(&EncodedQueryPlan {
            query_text,
            query_plan: JsonEncoder.encode_plan_node(&plan.root),
        })?,
        EncodingFormat::Xml => serde_json::to_string(&EncodedQueryPlan {
            query_text,
            query_plan: XmlEncoder.encode_plan_node(&plan.root),
        })?,
    };
    Ok(document)
}

/// Reads a JSON-form document back into its structural shape
pub fn decode_query_plan(document: &str) -> Result<EncodedQueryPlan> {
    Ok(serde_json::from_str(document)?)
}

/// Collapses query text onto one line
///
/// Each line is trimmed and blank lines are dropped.
pub fn normalize_query_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the encoded attributes of a node in output order
///
/// Absent values are omitted and nested values become JSON strings, so every
/// attribute is a scalar.
pub(crate) fn node_attributes(node: &PlanNode) -> Vec<(&'static str, Value)> {
    let data = node.data();
    let mut attrs = vec![(OPERATOR_ID_KEY, Value::from(data.operator.id))];
    attrs.extend(data.operator.attributes());
    if let Some(estimated) = data.cardinality.estimated {
        attrs.push((ESTIMATED_CARDINALITY_KEY, Value::from(estimated)));
    }
    if let Some(exact) = data.cardinality.exact {
        attrs.push((EXACT_CARDINALITY_KEY, Value::from(exact)));
    }
    if !data.provenance.is_empty() {
        attrs.push((
            SYSTEM_REPRESENTATION_KEY,
            Value::Array(data.provenance.fragments().to_vec()),
        ));
    }

    attrs
        .into_iter()
        .filter_map(|(key, value)| to_scalar(value).map(|value| (key, value)))
        .collect()
}

fn to_scalar(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(_) | Value::Object(_) => Some(Value::String(value.to_string())),
        scalar => Some(scalar),
    }
}
