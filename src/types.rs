//! Core data types and structures for the workflow canvas.
//!
//! This module defines the fundamental data structures shared by every component:
//! nodes, edges, their geometry, and the immutable snapshots used by history and clipboard.

use crate::constants::{NODE_HEIGHT, NODE_WIDTH};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for canvas nodes. Immutable once a node is created.
pub type NodeId = String;

/// Unique identifier for edges.
pub type EdgeId = String;

/// Opaque tag correlating nodes for bulk operations. Not an entity of its own.
pub type GroupId = String;

/// Defines the different types of nodes available on the canvas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A call to a language model
    Llm,
    /// Workflow input
    Input,
    /// Workflow output
    Output,
    /// A user-provided code block
    Code,
    /// Boolean branch
    Condition,
    /// Multi-way branch
    Switch,
    /// Joins several branches back together
    Merger,
}

impl NodeKind {
    /// Wire name of the kind, as used in layout documents and remote calls.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Llm => "llm",
            NodeKind::Input => "input",
            NodeKind::Output => "output",
            NodeKind::Code => "code",
            NodeKind::Condition => "condition",
            NodeKind::Switch => "switch",
            NodeKind::Merger => "merger",
        }
    }

    /// Human-friendly name used as the label of nodes created without one.
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::Llm => "LLM",
            NodeKind::Input => "Input",
            NodeKind::Output => "Output",
            NodeKind::Code => "Code",
            NodeKind::Condition => "Condition",
            NodeKind::Switch => "Switch",
            NodeKind::Merger => "Merger",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering hint for how an edge is routed. Carries no graph semantics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// Curved routing
    #[default]
    Smooth,
    /// Right-angled routing
    Orthogonal,
}

/// A point in world space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Position {
    /// Creates a position from its coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<egui::Pos2> for Position {
    fn from(p: egui::Pos2) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Position> for egui::Pos2 {
    fn from(p: Position) -> Self {
        egui::pos2(p.x, p.y)
    }
}

/// A measured node size in world units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Size {
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Size {
    /// Creates a size from width and height.
    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self {
            w: NODE_WIDTH,
            h: NODE_HEIGHT,
        }
    }
}

/// User-facing payload carried by a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NodeData {
    /// Display label
    pub label: String,
    /// Type-specific configuration (prompt, code, input value, ...)
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

/// Represents a single node on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,
    /// The kind of work this node performs
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Top-left corner in world space
    pub position: Position,
    /// Measured size, if the render layer has reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Group tag, if the node belongs to a group
    #[serde(default, rename = "groupId", skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Locked nodes cannot be dragged or become endpoints of new edges
    #[serde(default)]
    pub locked: bool,
    /// Label and configuration
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    /// Creates a new node with a freshly generated id.
    ///
    /// # Arguments
    ///
    /// * `kind` - The kind of node
    /// * `label` - The display label
    /// * `position` - The top-left corner in world space
    ///
    /// # Returns
    ///
    /// An unlocked, ungrouped node with an empty configuration.
    pub fn new(kind: NodeKind, label: impl Into<String>, position: Position) -> Self {
        Self::with_id(crate::ids::new_node_id(), kind, label, position)
    }

    /// Creates a new node with a caller-chosen id.
    pub fn with_id(
        id: impl Into<NodeId>,
        kind: NodeKind,
        label: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            size: None,
            group_id: None,
            locked: false,
            data: NodeData {
                label: label.into(),
                config: Default::default(),
            },
        }
    }

    /// Size used for geometry, falling back to the default when unmeasured.
    pub fn effective_size(&self) -> Size {
        self.size.unwrap_or_default()
    }

    /// World-space bounding box.
    pub fn rect(&self) -> egui::Rect {
        let size = self.effective_size();
        egui::Rect::from_min_size(self.position.into(), egui::vec2(size.w, size.h))
    }

    /// Bounding box in the flat form used by alignment math.
    pub fn geometry(&self) -> NodeGeometry {
        let size = self.effective_size();
        NodeGeometry {
            id: self.id.clone(),
            x: self.position.x,
            y: self.position.y,
            w: size.w,
            h: size.h,
        }
    }
}

/// Represents a directed connection between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// ID of the source node
    pub source: NodeId,
    /// ID of the target node
    pub target: NodeId,
    /// Named connection point on the source
    #[serde(default, rename = "sourceHandle", skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// Named connection point on the target
    #[serde(default, rename = "targetHandle", skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    /// Routing hint
    #[serde(default, rename = "edgeType")]
    pub edge_type: EdgeType,
}

impl Edge {
    /// Creates a new smooth edge between two nodes with a freshly generated id.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: crate::ids::new_edge_id(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            edge_type: EdgeType::Smooth,
        }
    }

    /// Returns the edge with its handles set.
    pub fn with_handles(mut self, source: Option<String>, target: Option<String>) -> Self {
        self.source_handle = source;
        self.target_handle = target;
        self
    }

    /// Returns true if either endpoint is the given node.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Axis-aligned bounding box of a node, as consumed by alignment and distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGeometry {
    /// Node the box belongs to
    pub id: NodeId,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl NodeGeometry {
    /// The box as an egui rectangle.
    pub fn rect(&self) -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(self.x, self.y), egui::vec2(self.w, self.h))
    }
}

/// An immutable deep copy of the node and edge collections at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Snapshot {
    /// Nodes in graph order
    pub nodes: Vec<Node>,
    /// Edges in graph order
    pub edges: Vec<Edge>,
}

impl Snapshot {
    /// Returns true if the snapshot holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Union of all node bounding boxes, or `None` for an empty snapshot.
    pub fn bounds(&self) -> Option<egui::Rect> {
        self.nodes.iter().map(Node::rect).reduce(|a, b| a.union(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_creation() {
        let node = Node::new(NodeKind::Llm, "Summarize", Position::new(100.0, 200.0));

        assert_eq!(node.data.label, "Summarize");
        assert_eq!(node.position, Position::new(100.0, 200.0));
        assert!(node.id.starts_with("node-"));
        assert!(!node.locked);
        assert!(node.group_id.is_none());
    }

    #[test]
    fn test_unmeasured_node_uses_default_size() {
        let mut node = Node::with_id("a", NodeKind::Code, "Code", Position::new(10.0, 20.0));
        assert_eq!(node.effective_size(), Size::new(240.0, 120.0));
        assert_eq!(node.geometry().w, 240.0);

        node.size = Some(Size::new(50.0, 30.0));
        let rect = node.rect();
        assert_eq!(rect.min, egui::pos2(10.0, 20.0));
        assert_eq!(rect.max, egui::pos2(60.0, 50.0));
    }

    #[test]
    fn test_node_serializes_with_wire_names() {
        let mut node = Node::with_id("n1", NodeKind::Input, "In", Position::new(1.0, 2.0));
        node.group_id = Some("g".into());
        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(value["type"], "input");
        assert_eq!(value["groupId"], "g");
        assert_eq!(value["position"], json!({"x": 1.0, "y": 2.0}));
        assert!(value.get("size").is_none());
    }

    #[test]
    fn test_edge_defaults_to_smooth() {
        let edge: Edge = serde_json::from_value(json!({
            "id": "e1", "source": "a", "target": "b", "sourceHandle": "out"
        }))
        .unwrap();

        assert_eq!(edge.edge_type, EdgeType::Smooth);
        assert_eq!(edge.source_handle.as_deref(), Some("out"));
        assert!(edge.target_handle.is_none());
        assert!(edge.touches("a"));
        assert!(!edge.touches("c"));
    }

    #[test]
    fn test_snapshot_bounds() {
        let mut a = Node::with_id("a", NodeKind::Input, "A", Position::new(0.0, 0.0));
        a.size = Some(Size::new(10.0, 10.0));
        let mut b = Node::with_id("b", NodeKind::Output, "B", Position::new(50.0, -5.0));
        b.size = Some(Size::new(10.0, 10.0));
        let snapshot = Snapshot {
            nodes: vec![a, b],
            edges: vec![],
        };

        let bounds = snapshot.bounds().unwrap();
        assert_eq!(bounds.min, egui::pos2(0.0, -5.0));
        assert_eq!(bounds.max, egui::pos2(60.0, 10.0));
        assert!(Snapshot::default().bounds().is_none());
    }
}
