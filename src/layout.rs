//! Portable layout documents.
//!
//! A layout document is the structural subset of the graph: node ids, kinds, geometry, group
//! tags and lock flags, plus the edges. Node labels and configuration are not part of it.

use crate::error::LayoutError;
use crate::graph::GraphModel;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// The structural part of a node as stored in a layout document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutNode {
    /// Node id
    pub id: NodeId,
    /// Node kind
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Top-left corner
    pub position: Position,
    /// Measured size, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Group tag
    #[serde(default, rename = "groupId", skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Lock flag
    #[serde(default)]
    pub locked: bool,
}

/// A whole layout document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LayoutDocument {
    /// Nodes in graph order
    pub nodes: Vec<LayoutNode>,
    /// Edges in graph order; the edge shape is stored as-is
    pub edges: Vec<Edge>,
}

impl LayoutDocument {
    /// Captures the structural layout of a graph.
    pub fn from_graph(graph: &GraphModel) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|n| LayoutNode {
                id: n.id.clone(),
                kind: n.kind,
                position: n.position,
                size: n.size,
                group_id: n.group_id.clone(),
                locked: n.locked,
            })
            .collect();
        Self {
            nodes,
            edges: graph.edges().to_vec(),
        }
    }

    /// Validates and converts an already-parsed JSON value.
    ///
    /// Both `nodes` and `edges` must be arrays; anything else rejects the document.
    pub fn from_value(value: serde_json::Value) -> Result<Self, LayoutError> {
        for key in ["nodes", "edges"] {
            if !value.get(key).is_some_and(serde_json::Value::is_array) {
                return Err(LayoutError::MissingArray(key));
            }
        }
        serde_json::from_value(value).map_err(LayoutError::InvalidDocument)
    }

    /// Deserialize a layout document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(LayoutError::Parse)?;
        Self::from_value(value)
    }

    /// Serialize the document to a pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Turns the document back into full nodes and edges.
    ///
    /// A node whose id and kind match a node of `live` keeps that node's label and
    /// configuration; any other node is labelled with its kind's display name.
    pub fn into_parts(self, live: &GraphModel) -> (Vec<Node>, Vec<Edge>) {
        let nodes = self
            .nodes
            .into_iter()
            .map(|n| {
                let data = live
                    .node(&n.id)
                    .filter(|existing| existing.kind == n.kind)
                    .map(|existing| existing.data.clone())
                    .unwrap_or_else(|| NodeData {
                        label: n.kind.display_name().to_string(),
                        config: Default::default(),
                    });
                Node {
                    id: n.id,
                    kind: n.kind,
                    position: n.position,
                    size: n.size,
                    group_id: n.group_id,
                    locked: n.locked,
                    data,
                }
            })
            .collect();
        (nodes, self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph() -> GraphModel {
        let mut graph = GraphModel::new();
        let mut a = Node::with_id("a", NodeKind::Input, "Question", Position::new(0.0, 0.0));
        a.data.config.insert("value".into(), json!("What is Rust?"));
        a.size = Some(Size::new(200.0, 80.0));
        a.group_id = Some("g1".into());
        let b = Node::with_id("b", NodeKind::Llm, "Answer", Position::new(300.0, 0.0));
        assert!(graph.add_node(a));
        assert!(graph.add_node(b));
        assert!(graph.add_edge(Edge {
            id: "ab".into(),
            edge_type: EdgeType::Orthogonal,
            ..Edge::new("a", "b")
        }));
        // locked after connecting; new connections to b would be refused
        assert!(graph.set_locked("b", true));
        assert_eq!(graph.edges().len(), 1);
        graph
    }

    #[test]
    fn test_export_omits_node_data() {
        let doc = LayoutDocument::from_graph(&graph());
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["nodes"][0]["id"], "a");
        assert_eq!(value["nodes"][0]["type"], "input");
        assert_eq!(value["nodes"][0]["groupId"], "g1");
        assert_eq!(value["nodes"][0]["size"], json!({"w": 200.0, "h": 80.0}));
        assert_eq!(value["nodes"][1]["locked"], true);
        assert!(value["nodes"][1].get("size").is_none());
        assert!(value["nodes"][0].get("data").is_none());
        assert_eq!(value["edges"][0]["edgeType"], "orthogonal");
    }

    #[test]
    fn test_import_rejects_missing_arrays() {
        let err = LayoutDocument::from_value(json!({"nodes": []})).unwrap_err();
        assert!(matches!(err, LayoutError::MissingArray("edges")));

        let err = LayoutDocument::from_value(json!({"nodes": {}, "edges": []})).unwrap_err();
        assert!(matches!(err, LayoutError::MissingArray("nodes")));

        let err = LayoutDocument::from_json("not json").unwrap_err();
        assert!(matches!(err, LayoutError::Parse(_)));
    }

    #[test]
    fn test_import_rejects_malformed_entries() {
        let err = LayoutDocument::from_value(json!({
            "nodes": [{"id": "a", "type": "teleporter", "position": {"x": 0, "y": 0}}],
            "edges": []
        }))
        .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidDocument(_)));
    }

    #[test]
    fn test_optional_fields_default() {
        let doc = LayoutDocument::from_value(json!({
            "nodes": [{"id": "a", "type": "code", "position": {"x": 1, "y": 2}}],
            "edges": [{"id": "e", "source": "a", "target": "b"}]
        }))
        .unwrap();
        assert!(!doc.nodes[0].locked);
        assert!(doc.nodes[0].size.is_none());
        assert_eq!(doc.edges[0].edge_type, EdgeType::Smooth);
    }

    #[test]
    fn test_into_parts_keeps_live_data_for_matching_nodes() {
        let live = graph();
        let mut doc = LayoutDocument::from_graph(&live);
        doc.nodes[1].kind = NodeKind::Code;
        doc.nodes.push(LayoutNode {
            id: "new".into(),
            kind: NodeKind::Output,
            position: Position::default(),
            size: None,
            group_id: None,
            locked: false,
        });

        let (nodes, edges) = doc.into_parts(&live);

        assert_eq!(nodes[0].data.label, "Question");
        assert_eq!(nodes[0].data.config["value"], "What is Rust?");
        // kind changed, so the old data no longer applies
        assert_eq!(nodes[1].data.label, "Code");
        assert_eq!(nodes[2].data.label, "Output");
        assert_eq!(edges.len(), 1);
    }
}
