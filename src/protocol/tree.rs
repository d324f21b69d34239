//! Network tree markup decoding.
//!
//! `TREEXML` dumps a network's object tree as XML between the 343/344
//! response codes. The accumulated document is decoded into a JSON
//! value for publication: attributes land under `"$"`, child elements
//! are grouped by name into arrays, text-only elements become plain
//! strings.

use roxmltree::{Document, Node};
use serde_json::{Map, Value};

use crate::common::error::ProtocolError;

/// Decode an accumulated tree dump into a JSON document keyed by the
/// root element name.
pub fn parse_markup(text: &str) -> Result<Value, ProtocolError> {
    let document = Document::parse(text).map_err(|e| ProtocolError::BadMarkup {
        message: e.to_string(),
    })?;

    let root = document.root_element();
    let mut wrapper = Map::new();
    wrapper.insert(root.tag_name().name().to_string(), element_value(root));
    Ok(Value::Object(wrapper))
}

fn element_value(node: Node) -> Value {
    let mut object = Map::new();

    let attributes: Map<String, Value> = node
        .attributes()
        .map(|attribute| {
            (
                attribute.name().to_string(),
                Value::String(attribute.value().to_string()),
            )
        })
        .collect();
    if !attributes.is_empty() {
        object.insert("$".to_string(), Value::Object(attributes));
    }

    for child in node.children().filter(Node::is_element) {
        let name = child.tag_name().name().to_string();
        let value = element_value(child);
        match object.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            _ => {
                object.insert(name, Value::Array(vec![value]));
            }
        }
    }

    let text: String = node
        .children()
        .filter(Node::is_text)
        .filter_map(|child| child.text())
        .collect();
    let text = text.trim();

    if object.is_empty() {
        return Value::String(text.to_string());
    }
    if !text.is_empty() {
        object.insert("_".to_string(), Value::String(text.to_string()));
    }
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_simple_tree() {
        let document = parse_markup("<Network><Unit>1</Unit>\n<Unit>2</Unit>\n</Network>\n").unwrap();
        assert_eq!(document, json!({ "Network": { "Unit": ["1", "2"] } }));
    }

    #[test]
    fn test_parse_attributes_and_nesting() {
        let document = parse_markup(
            "<Network Name=\"Local\">\n<Interface Type=\"cni\"/>\n<Unit><Address>1</Address></Unit>\n</Network>\n",
        )
        .unwrap();
        assert_eq!(
            document,
            json!({
                "Network": {
                    "$": { "Name": "Local" },
                    "Interface": [{ "$": { "Type": "cni" } }],
                    "Unit": [{ "Address": ["1"] }]
                }
            })
        );
    }

    #[test]
    fn test_parse_accepts_declaration() {
        let document =
            parse_markup("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Network/>\n").unwrap();
        assert_eq!(document, json!({ "Network": "" }));
    }

    #[test]
    fn test_parse_rejects_malformed_markup() {
        assert!(parse_markup("").is_err());
        assert!(parse_markup("<Network>").is_err());
        assert!(parse_markup("not xml at all").is_err());
    }
}
