use super::{PlanNodeEncoder, node_attributes};
use crate::plan::PlanNode;
use serde_json::Value;

/// Encodes plan nodes as an XML element tree
///
/// Elements are named after the operator type and carry the same attributes
/// as the JSON form. Childless elements are self-closing.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlEncoder;

impl PlanNodeEncoder for XmlEncoder {
    type Output = String;

    fn encode_plan_node(&self, node: &PlanNode) -> String {
        let mut out = String::new();
        write_element(&mut out, node);
        out
    }
}

fn write_element(out: &mut String, node: &PlanNode) {
    let tag = node.operator_type().name();
    out.push('<');
    out.push_str(tag);
    for (key, value) in node_attributes(node) {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        match value {
            Value::String(text) => escape_into(out, &text),
            other => escape_into(out, &other.to_string()),
        }
        out.push('"');
    }

    if node.children().is_empty() {
        out.push_str(" />");
        return;
    }

    out.push('>');
    for child in node.children() {
        write_element(out, child);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            c => out.push(c),
        }
    }
}
