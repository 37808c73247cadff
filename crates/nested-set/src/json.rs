//! JSON document decoding
//!
//! Reads the document shape emitted by drag-and-drop menu editors such as
//! Nestable: an array of objects, each with an `id`, an optional `parent`, an
//! optional `children` array of the same shape and any other fields.
//!
//! ```
//! use nested_set::json::from_json_str;
//! use nested_set::{encode, EncodeOptions, NodeId};
//!
//! let forest = from_json_str(r#"[
//!     {"id": 15, "title": "Category 1", "parent": 1, "children": [
//!         {"id": 17, "title": "Page 3", "parent": 15}
//!     ]}
//! ]"#).unwrap();
//!
//! let map = encode(&forest, &EncodeOptions::default()).unwrap();
//! let page = map.get(NodeId(17)).unwrap();
//! assert_eq!((page.left, page.right, page.level), (3, 4, 3));
//! assert_eq!(page.data["title"], "Page 3");
//! assert!(map.get(NodeId(15)).unwrap().data.get("children").is_none());
//! ```

use serde_json::{Map, Value};

use crate::error::{NestedSetError, Result};
use crate::node::{NodeId, NodePath, TreeNode};

/// Payload of a decoded node: every field except `children`
pub type JsonPayload = Map<String, Value>;

const ID_FIELD: &str = "id";
const PARENT_FIELD: &str = "parent";
const CHILDREN_FIELD: &str = "children";

/// Decode a JSON document into a forest
///
/// # Errors
///
/// Returns `Json` for invalid JSON and `MalformedInput` when the document is not
/// an array of node objects.
pub fn from_json_str(document: &str) -> Result<Vec<TreeNode<JsonPayload>>> {
    let value: Value = serde_json::from_str(document)?;
    from_json_value(value)
}

/// Decode an already parsed JSON value into a forest
///
/// A node without `id` decodes with `id: None`; the encoder reports it.
///
/// # Errors
///
/// Returns `MalformedInput` for non-array forests, non-object nodes, a
/// `children` field that is not an array, or an identifier that is not a
/// non-negative integer.
pub fn from_json_value(value: Value) -> Result<Vec<TreeNode<JsonPayload>>> {
    decode_forest(value, &NodePath::default())
}

fn decode_forest(value: Value, path: &NodePath) -> Result<Vec<TreeNode<JsonPayload>>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| decode_node(item, path.child(index)))
            .collect(),
        other => Err(NestedSetError::malformed(
            path.clone(),
            format!("expected an array of nodes, found {}", kind(&other)),
        )),
    }
}

fn decode_node(value: Value, path: NodePath) -> Result<TreeNode<JsonPayload>> {
    let mut data = match value {
        Value::Object(data) => data,
        other => {
            return Err(NestedSetError::malformed(
                path,
                format!("expected a node object, found {}", kind(&other)),
            ))
        }
    };

    let children = match data.remove(CHILDREN_FIELD) {
        None | Some(Value::Null) => Vec::new(),
        Some(children @ Value::Array(_)) => decode_forest(children, &path)?,
        Some(other) => {
            return Err(NestedSetError::malformed(
                path,
                format!("`children` must be an array, found {}", kind(&other)),
            ))
        }
    };
    let id = identifier(&data, ID_FIELD, &path)?;
    let parent = identifier(&data, PARENT_FIELD, &path)?;

    Ok(TreeNode {
        id,
        parent,
        data,
        children,
    })
}

/// Read an identifier field, accepting integers and integer strings
fn identifier(data: &JsonPayload, field: &str, path: &NodePath) -> Result<Option<NodeId>> {
    let parsed = match data.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) => text.trim().parse::<u64>().ok(),
        Some(_) => None,
    };

    parsed.map(|id| Some(NodeId(id))).ok_or_else(|| {
        NestedSetError::malformed(
            path.clone(),
            format!("`{field}` must be a non-negative integer"),
        )
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_nested_document() {
        let forest = from_json_value(json!([
            {"type": "Page", "id": 2, "title": "Home", "parent": 1},
            {"type": "Page", "id": 16, "title": "Category 2", "parent": 1, "children": [
                {"type": "Page", "id": 20, "title": "Page 6", "parent": 16}
            ]}
        ]))
        .unwrap();

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].id, Some(NodeId(2)));
        assert_eq!(forest[0].parent, Some(NodeId(1)));
        assert!(forest[0].is_leaf());

        let category = &forest[1];
        assert_eq!(category.children.len(), 1);
        assert_eq!(category.children[0].id, Some(NodeId(20)));
        assert_eq!(category.children[0].parent, Some(NodeId(16)));

        // Payload keeps everything except the children
        assert_eq!(category.data["title"], "Category 2");
        assert_eq!(category.data["id"], 16);
        assert!(!category.data.contains_key("children"));
    }

    #[test]
    fn test_string_and_missing_identifiers() {
        let forest = from_json_value(json!([
            {"id": "15", "parent": " 1 "},
            {"title": "no id", "parent": null},
            {"id": 3, "children": null}
        ]))
        .unwrap();

        assert_eq!(forest[0].id, Some(NodeId(15)));
        assert_eq!(forest[0].parent, Some(NodeId(1)));
        assert_eq!(forest[1].id, None);
        assert_eq!(forest[1].parent, None);
        assert!(forest[2].children.is_empty());
    }

    #[test]
    fn test_malformed_documents() {
        let cases = [
            (json!({"id": 1}), "<forest>"),
            (json!([1, 2]), "[0]"),
            (json!([{"id": 1, "children": {"id": 2}}]), "[0]"),
            (json!([{"id": 1, "children": [{"id": -4}]}]), "[0].children[0]"),
            (json!([{"id": 1, "parent": "root"}]), "[0]"),
            (json!([{"id": 1.5}]), "[0]"),
        ];

        for (document, expected_path) in cases {
            match from_json_value(document) {
                Err(NestedSetError::MalformedInput { path, .. }) => {
                    assert_eq!(path.to_string(), expected_path);
                }
                other => panic!("expected malformed input, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_json() {
        let err = from_json_str("[{\"id\": 1,").unwrap_err();
        assert!(matches!(err, NestedSetError::Json(_)));
    }
}
