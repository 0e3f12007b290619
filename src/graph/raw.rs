//! Wire shape of the graph payload.
//!
//! Mirrors the JSON document exactly; [`super::GraphIndex::build`] turns it
//! into typed entities. Everything except `elements.nodes` and
//! `elements.edges` is optional.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Top-level payload: `{ meta, elements }`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawGraph {
    /// Precomputed counts and indices. Treated as hints.
    pub meta: RawMeta,
    /// Node and edge arrays.
    pub elements: Option<RawElements>,
}

/// Precomputed payload metadata.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawMeta {
    /// Declared channel count.
    pub channel_count: Option<u64>,
    /// Declared block count.
    pub block_count: Option<u64>,
    /// Declared edge count.
    pub edge_count: Option<u64>,
    /// Declared number of blocks linked from more than one channel.
    pub cross_connected_blocks: Option<u64>,
    /// When the payload was fetched from the source service.
    pub fetched_at: Option<Value>,
    /// Token → block references (numeric index or string id).
    pub search_index: Option<BTreeMap<String, Vec<Value>>>,
    /// Tag → block references (numeric index or string id).
    pub auto_tag_index: Option<BTreeMap<String, Vec<Value>>>,
    /// Precomputed timestamp order. Rebuilt from block data on load.
    pub sorted_timestamps: Option<Vec<Value>>,
}

/// `{ nodes, edges }` arrays.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawElements {
    /// Channel and block nodes.
    pub nodes: Option<Vec<RawNode>>,
    /// Channel → block edges.
    pub edges: Option<Vec<RawEdge>>,
}

/// `{ data: {...} }` node wrapper.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawNode {
    /// Node fields.
    pub data: RawNodeData,
}

/// Node fields. Channels use `label`, `size`, `blockCount`; blocks use the
/// rest.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawNodeData {
    /// String or numeric id.
    pub id: Value,
    /// `"channel"` or a block class name.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Display label.
    #[serde(alias = "title")]
    pub label: Option<String>,
    /// Channel size (visual weight).
    pub size: Option<f64>,
    /// Declared block count for channels.
    pub block_count: Option<u64>,
    /// Text content for text blocks.
    pub content: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Thumbnail URL, or an object carrying one.
    #[serde(alias = "image")]
    pub thumb: Option<Value>,
    /// Source URL, or an object carrying one.
    pub source: Option<Value>,
    /// ISO-8601 string or unix timestamp (seconds or milliseconds).
    #[serde(alias = "created_at")]
    pub created_at: Option<Value>,
    /// Tags like `"artist:x"`, `"medium:y"`, `"theme:z"`.
    pub auto_tags: Option<Vec<String>>,
}

/// `{ data: {...} }` edge wrapper.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawEdge {
    /// Edge fields.
    pub data: RawEdgeData,
}

/// Edge fields.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawEdgeData {
    /// Optional edge id.
    pub id: Value,
    /// Channel id.
    pub source: Value,
    /// Block id.
    pub target: Value,
}

/// Normalize a string or numeric JSON id to a `String`.
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Pull a URL out of a string or an object with a `url`/`src` field.
pub(crate) fn url_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => ["url", "src", "thumb", "display"]
            .iter()
            .find_map(|key| map.get(*key).and_then(url_string)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_accept_strings_and_numbers() {
        assert_eq!(id_string(&Value::from("c-1")), Some("c-1".to_owned()));
        assert_eq!(id_string(&Value::from(42)), Some("42".to_owned()));
        assert_eq!(id_string(&Value::Null), None);
        assert_eq!(id_string(&Value::from("")), None);
    }

    #[test]
    fn urls_unwrap_nested_objects() {
        let v: Value = serde_json::json!({ "thumb": { "url": "https://x/y.png" } });
        assert_eq!(url_string(&v), Some("https://x/y.png".to_owned()));
    }

    #[test]
    fn node_fields_use_camel_case_and_aliases() {
        let node: RawNode = serde_json::from_str(
            r#"{"data":{"id":7,"type":"Image","title":"t","createdAt":"2021-01-01T00:00:00Z","autoTags":["theme:sea"]}}"#,
        )
        .unwrap();
        assert_eq!(node.data.kind.as_deref(), Some("Image"));
        assert_eq!(node.data.label.as_deref(), Some("t"));
        assert!(node.data.created_at.is_some());
        assert_eq!(node.data.auto_tags, Some(vec!["theme:sea".to_owned()]));
    }
}
