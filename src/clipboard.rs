//! Copy/paste of node sub-graphs with identifier remapping.

use crate::constants::PASTE_OFFSET;
use crate::graph::GraphModel;
use crate::ids;
use crate::types::*;
use std::collections::{HashMap, HashSet};

/// Holds the copied sub-graph and the anchor the next paste lands on.
#[derive(Debug, Clone)]
pub struct ClipboardManager {
    contents: Option<Snapshot>,
    /// World-space point chosen by a context-menu click, consumed by the next paste
    anchor: Option<egui::Pos2>,
    fallback_offset: f32,
}

impl Default for ClipboardManager {
    fn default() -> Self {
        Self::new(PASTE_OFFSET)
    }
}

impl ClipboardManager {
    /// Creates an empty clipboard whose anchorless pastes land `fallback_offset` units
    /// right of and below the copied content.
    pub fn new(fallback_offset: f32) -> Self {
        Self {
            contents: None,
            anchor: None,
            fallback_offset,
        }
    }

    /// Returns true if nothing has been copied yet.
    pub fn is_empty(&self) -> bool {
        self.contents.as_ref().is_none_or(Snapshot::is_empty)
    }

    /// The copied sub-graph, if any.
    pub fn contents(&self) -> Option<&Snapshot> {
        self.contents.as_ref()
    }

    /// Sets the world-space point the next paste should land on.
    pub fn set_anchor(&mut self, anchor: Option<egui::Pos2>) {
        self.anchor = anchor;
    }

    /// Currently armed anchor, if any.
    pub fn anchor(&self) -> Option<egui::Pos2> {
        self.anchor
    }

    /// Copies the sub-graph induced by `ids`: the nodes themselves plus only those edges
    /// whose endpoints are both copied.
    ///
    /// # Returns
    ///
    /// The number of nodes copied. Copying nothing leaves the clipboard untouched.
    pub fn copy(&mut self, graph: &GraphModel, ids: &[NodeId]) -> usize {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let nodes: Vec<Node> = graph
            .nodes()
            .iter()
            .filter(|n| wanted.contains(n.id.as_str()))
            .cloned()
            .collect();
        if nodes.is_empty() {
            return 0;
        }
        let edges = graph
            .edges()
            .iter()
            .filter(|e| wanted.contains(e.source.as_str()) && wanted.contains(e.target.as_str()))
            .cloned()
            .collect();
        let count = nodes.len();
        self.contents = Some(Snapshot { nodes, edges });
        count
    }

    /// Builds a fresh copy of the clipboard ready to be inserted into the graph.
    ///
    /// The copy is placed so its bounding-box minimum lands on the armed anchor, else on
    /// `viewport_center`, else at a fixed offset from where it was copied. Every node and
    /// edge gets a new id and edges are remapped onto the new nodes; nodes that shared a group
    /// share a new group. The anchor is consumed.
    ///
    /// # Returns
    ///
    /// `None` if the clipboard is empty.
    pub fn prepare_paste(&mut self, viewport_center: Option<egui::Pos2>) -> Option<Snapshot> {
        let contents = self.contents.as_ref().filter(|c| !c.is_empty())?;
        let base_min = contents.bounds()?.min;
        let target = self
            .anchor
            .take()
            .or(viewport_center)
            .unwrap_or(base_min + egui::vec2(self.fallback_offset, self.fallback_offset));
        let delta = target - base_min;

        let mut id_map: HashMap<&str, NodeId> = HashMap::new();
        let mut group_map: HashMap<&str, GroupId> = HashMap::new();
        let mut nodes = Vec::with_capacity(contents.nodes.len());
        for original in &contents.nodes {
            let mut node = original.clone();
            node.id = ids::new_node_id();
            node.position = Position::new(original.position.x + delta.x, original.position.y + delta.y);
            node.group_id = original.group_id.as_deref().map(|g| {
                group_map
                    .entry(g)
                    .or_insert_with(ids::new_group_id)
                    .clone()
            });
            id_map.insert(original.id.as_str(), node.id.clone());
            nodes.push(node);
        }

        let edges = contents
            .edges
            .iter()
            .filter_map(|original| {
                let source = id_map.get(original.source.as_str())?;
                let target = id_map.get(original.target.as_str())?;
                Some(Edge {
                    id: ids::new_edge_id(),
                    source: source.clone(),
                    target: target.clone(),
                    ..original.clone()
                })
            })
            .collect();

        Some(Snapshot { nodes, edges })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(id: &str, x: f32, y: f32) -> Node {
        let mut node = Node::with_id(id, NodeKind::Llm, id, Position::new(x, y));
        node.size = Some(Size::new(10.0, 10.0));
        node
    }

    fn graph() -> GraphModel {
        let mut graph = GraphModel::new();
        graph.add_node(sized("a", 100.0, 100.0));
        graph.add_node(sized("b", 200.0, 150.0));
        graph.add_node(sized("c", 300.0, 100.0));
        graph.add_edge(Edge { id: "ab".into(), ..Edge::new("a", "b") });
        graph.add_edge(Edge { id: "bc".into(), ..Edge::new("b", "c") });
        graph
    }

    #[test]
    fn test_copy_keeps_only_induced_edges() {
        let graph = graph();
        let mut clipboard = ClipboardManager::default();

        let copied = clipboard.copy(&graph, &["a".into(), "b".into()]);

        assert_eq!(copied, 2);
        let contents = clipboard.contents().unwrap();
        assert_eq!(contents.nodes.len(), 2);
        assert_eq!(contents.edges.len(), 1);
        assert_eq!(contents.edges[0].id, "ab");
    }

    #[test]
    fn test_copy_nothing_keeps_previous_contents() {
        let graph = graph();
        let mut clipboard = ClipboardManager::default();
        clipboard.copy(&graph, &["c".into()]);

        assert_eq!(clipboard.copy(&graph, &["ghost".into()]), 0);
        assert_eq!(clipboard.contents().unwrap().nodes[0].id, "c");
    }

    #[test]
    fn test_empty_clipboard_paste_is_noop() {
        let mut clipboard = ClipboardManager::default();
        assert!(clipboard.is_empty());
        assert!(clipboard.prepare_paste(Some(egui::pos2(0.0, 0.0))).is_none());
    }

    #[test]
    fn test_paste_remaps_ids_and_edges() {
        let graph = graph();
        let mut clipboard = ClipboardManager::default();
        clipboard.copy(&graph, &["a".into(), "b".into()]);

        let pasted = clipboard.prepare_paste(None).unwrap();

        let new_ids: HashSet<&str> = pasted.nodes.iter().map(|n| n.id.as_str()).collect();
        assert!(!new_ids.contains("a") && !new_ids.contains("b"));
        let edge = &pasted.edges[0];
        assert_ne!(edge.id, "ab");
        assert!(new_ids.contains(edge.source.as_str()));
        assert!(new_ids.contains(edge.target.as_str()));
    }

    #[test]
    fn test_paste_placement_preference() {
        let graph = graph();
        let mut clipboard = ClipboardManager::default();
        clipboard.copy(&graph, &["a".into(), "b".into()]);

        // fallback: +16,+16 from the bounding-box minimum (100,100)
        let pasted = clipboard.prepare_paste(None).unwrap();
        assert_eq!(pasted.nodes[0].position, Position::new(116.0, 116.0));
        assert_eq!(pasted.nodes[1].position, Position::new(216.0, 166.0));

        // viewport centre beats the fallback
        let pasted = clipboard.prepare_paste(Some(egui::pos2(0.0, 0.0))).unwrap();
        assert_eq!(pasted.nodes[0].position, Position::new(0.0, 0.0));

        // an explicit anchor beats both, and is consumed
        clipboard.set_anchor(Some(egui::pos2(500.0, 600.0)));
        let pasted = clipboard.prepare_paste(Some(egui::pos2(0.0, 0.0))).unwrap();
        assert_eq!(pasted.nodes[0].position, Position::new(500.0, 600.0));
        assert!(clipboard.anchor().is_none());
        let pasted = clipboard.prepare_paste(None).unwrap();
        assert_eq!(pasted.nodes[0].position, Position::new(116.0, 116.0));
    }

    #[test]
    fn test_paste_assigns_fresh_shared_group() {
        let mut graph = graph();
        graph.set_group("a", Some("g".into()));
        graph.set_group("b", Some("g".into()));
        let mut clipboard = ClipboardManager::default();
        clipboard.copy(&graph, &["a".into(), "b".into(), "c".into()]);

        let pasted = clipboard.prepare_paste(None).unwrap();

        let g0 = pasted.nodes[0].group_id.clone().unwrap();
        assert_ne!(g0, "g");
        assert_eq!(pasted.nodes[1].group_id.as_deref(), Some(g0.as_str()));
        assert!(pasted.nodes[2].group_id.is_none());
    }
}
