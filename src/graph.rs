//! The authoritative in-memory node/edge model.
//!
//! Every operation is synchronous and total: invalid requests return `false` and leave the
//! model untouched instead of panicking or returning an error.

use crate::types::*;
use log::warn;
use std::collections::HashSet;

/// Node and edge collections for one editing session.
///
/// Nodes and edges are kept in insertion order, which is also the order the render layer
/// draws them in and the order "first input node" style lookups walk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphModel {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphModel {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// All nodes in graph order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in graph order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Looks up an edge by id.
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Returns true if a node with the given id exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Returns true if the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node.
    ///
    /// # Returns
    ///
    /// `false` (and no mutation) if a node with the same id already exists.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.contains_node(&node.id) {
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Removes a node and every edge that references it.
    ///
    /// # Returns
    ///
    /// `true` if the node was found and removed, `false` if it didn't exist.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        let removed = self.nodes.len() != before;
        if removed {
            self.edges.retain(|e| !e.touches(id));
        }
        removed
    }

    /// Returns true if a new edge from `source` to `target` would be accepted.
    ///
    /// Rejects self-loops, missing endpoints and locked endpoints.
    pub fn can_connect(&self, source: &str, target: &str) -> bool {
        if source == target {
            return false;
        }
        match (self.node(source), self.node(target)) {
            (Some(s), Some(t)) => !s.locked && !t.locked,
            _ => false,
        }
    }

    /// Adds an edge.
    ///
    /// # Returns
    ///
    /// `false` (and no mutation) for a self-loop, a missing or locked endpoint, or a duplicate
    /// edge id.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if !self.can_connect(&edge.source, &edge.target) || self.edge(&edge.id).is_some() {
            return false;
        }
        self.edges.push(edge);
        true
    }

    /// Removes an edge by id.
    pub fn remove_edge(&mut self, id: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != id);
        self.edges.len() != before
    }

    /// Moves a node. No-op for missing or locked nodes.
    pub fn update_node_position(&mut self, id: &str, position: Position) -> bool {
        match self.node_mut(id) {
            Some(node) if !node.locked => {
                node.position = position;
                true
            }
            _ => false,
        }
    }

    /// Puts a node back where a cancelled gesture found it, whether locked or not.
    pub(crate) fn reset_node_position(&mut self, id: &str, position: Position) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Records a measured size reported by the render layer.
    pub fn set_node_size(&mut self, id: &str, size: Size) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.size = Some(size);
                true
            }
            None => false,
        }
    }

    /// Sets the lock flag of a node.
    pub fn set_locked(&mut self, id: &str, locked: bool) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.locked = locked;
                true
            }
            None => false,
        }
    }

    /// Sets or clears the group tag of a node.
    pub fn set_group(&mut self, id: &str, group_id: Option<GroupId>) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.group_id = group_id;
                true
            }
            None => false,
        }
    }

    /// Ids of every node carrying the given group tag, in graph order.
    pub fn group_members(&self, group_id: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.group_id.as_deref() == Some(group_id))
            .map(|n| n.id.clone())
            .collect()
    }

    /// Replaces the whole graph, as done by layout import and history restore.
    ///
    /// Duplicate node or edge ids reject the replacement wholesale. Edges that are self-loops
    /// or reference a missing node are pruned so no dangling edge is ever installed. Locked
    /// endpoints are accepted here: the lock only guards *new* connections.
    ///
    /// # Returns
    ///
    /// `false` (and no mutation) if the collections contain duplicate ids.
    pub fn replace_all(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) -> bool {
        let mut node_ids = HashSet::new();
        if !nodes.iter().all(|n| node_ids.insert(n.id.as_str())) {
            return false;
        }
        let mut edge_ids = HashSet::new();
        if !edges.iter().all(|e| edge_ids.insert(e.id.as_str())) {
            return false;
        }

        let edges: Vec<Edge> = edges
            .into_iter()
            .filter(|e| {
                let keep = e.source != e.target
                    && node_ids.contains(e.source.as_str())
                    && node_ids.contains(e.target.as_str());
                if !keep {
                    warn!("Pruning edge {} ({} -> {}): dangling or self-loop", e.id, e.source, e.target);
                }
                keep
            })
            .collect();

        self.nodes = nodes;
        self.edges = edges;
        true
    }

    /// Inserts a pasted sub-graph next to the existing content.
    ///
    /// Copied edges keep joining their (copied) endpoints even when those are locked, since
    /// they are not new connections. Edges whose endpoints are absent are dropped.
    ///
    /// # Returns
    ///
    /// `false` (and no mutation) if any node or edge id is already taken.
    pub fn insert_snapshot(&mut self, snapshot: Snapshot) -> bool {
        let collides = snapshot.nodes.iter().any(|n| self.contains_node(&n.id))
            || snapshot.edges.iter().any(|e| self.edge(&e.id).is_some());
        if collides {
            return false;
        }
        self.nodes.extend(snapshot.nodes);
        for edge in snapshot.edges {
            if edge.source != edge.target
                && self.contains_node(&edge.source)
                && self.contains_node(&edge.target)
            {
                self.edges.push(edge);
            }
        }
        true
    }

    /// Takes a deep copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Installs a snapshot as the live state.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.nodes = snapshot.nodes;
        self.edges = snapshot.edges;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> Node {
        Node::with_id(id, NodeKind::Llm, id.to_uppercase(), Position::new(0.0, 0.0))
    }

    fn edge(id: &str, source: &str, target: &str) -> Edge {
        Edge {
            id: id.into(),
            ..Edge::new(source, target)
        }
    }

    fn three_nodes() -> GraphModel {
        let mut graph = GraphModel::new();
        for id in ["a", "b", "c"] {
            assert!(graph.add_node(node(id)));
        }
        graph
    }

    #[test]
    fn test_add_node_rejects_duplicate_id() {
        let mut graph = three_nodes();
        assert!(!graph.add_node(node("a")));
        assert_eq!(graph.nodes().len(), 3);
    }

    #[test]
    fn test_add_edge_success() {
        let mut graph = three_nodes();
        assert!(graph.add_edge(edge("e1", "a", "b")));
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.edges()[0].source, "a");
        assert_eq!(graph.edges()[0].target, "b");
    }

    #[test]
    fn test_add_edge_rejects_invalid_requests() {
        let mut graph = three_nodes();
        assert!(!graph.add_edge(edge("e1", "a", "a")));
        assert!(!graph.add_edge(edge("e2", "a", "missing")));
        assert!(!graph.add_edge(edge("e3", "missing", "b")));
        assert!(graph.edges().is_empty());

        assert!(graph.add_edge(edge("e4", "a", "b")));
        assert!(!graph.add_edge(edge("e4", "b", "c")));
        assert_eq!(graph.edges().len(), 1);
    }

    #[test]
    fn test_locked_node_invariant() {
        let mut graph = three_nodes();
        assert!(graph.set_locked("b", true));
        let before = graph.clone();

        assert!(!graph.update_node_position("b", Position::new(99.0, 99.0)));
        assert!(!graph.add_edge(edge("e1", "a", "b")));
        assert!(!graph.add_edge(edge("e2", "b", "c")));
        assert_eq!(graph, before);

        assert!(graph.update_node_position("a", Position::new(5.0, 6.0)));
        assert_eq!(graph.node("a").unwrap().position, Position::new(5.0, 6.0));
    }

    #[test]
    fn test_reset_node_position_ignores_lock() {
        let mut graph = three_nodes();
        assert!(graph.set_locked("b", true));
        assert!(graph.reset_node_position("b", Position::new(7.0, 8.0)));
        assert_eq!(graph.node("b").unwrap().position, Position::new(7.0, 8.0));
        assert!(graph.node("b").unwrap().locked);
        assert!(!graph.reset_node_position("missing", Position::default()));
    }

    #[test]
    fn test_remove_node_prunes_dangling_edges() {
        let mut graph = three_nodes();
        graph.add_edge(edge("ab", "a", "b"));
        graph.add_edge(edge("bc", "b", "c"));
        graph.add_edge(edge("ac", "a", "c"));

        assert!(graph.remove_node("b"));

        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.edges()[0].id, "ac");
        assert!(graph
            .edges()
            .iter()
            .all(|e| graph.contains_node(&e.source) && graph.contains_node(&e.target)));
        assert!(!graph.remove_node("b"));
    }

    #[test]
    fn test_remove_edge() {
        let mut graph = three_nodes();
        graph.add_edge(edge("ab", "a", "b"));
        assert!(graph.remove_edge("ab"));
        assert!(!graph.remove_edge("ab"));
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_replace_all_prunes_dangling_and_rejects_duplicates() {
        let mut graph = three_nodes();

        assert!(!graph.replace_all(vec![node("x"), node("x")], vec![]));
        assert_eq!(graph.nodes().len(), 3);

        assert!(!graph.replace_all(
            vec![node("x"), node("y")],
            vec![edge("e", "x", "y"), edge("e", "y", "x")]
        ));
        assert_eq!(graph.nodes().len(), 3);

        let mut locked = node("y");
        locked.locked = true;
        assert!(graph.replace_all(
            vec![node("x"), locked],
            vec![edge("ok", "x", "y"), edge("dangling", "x", "gone"), edge("loop", "x", "x")]
        ));
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.edges()[0].id, "ok");
    }

    #[test]
    fn test_snapshot_is_independent_of_live_graph() {
        let mut graph = three_nodes();
        let snapshot = graph.snapshot();

        graph.update_node_position("a", Position::new(42.0, 42.0));
        graph.remove_node("c");

        assert_eq!(snapshot.nodes.len(), 3);
        assert_eq!(snapshot.nodes[0].position, Position::new(0.0, 0.0));

        graph.restore(snapshot.clone());
        assert_eq!(graph.snapshot(), snapshot);
    }

    #[test]
    fn test_insert_snapshot() {
        let mut graph = three_nodes();
        let mut locked = node("x");
        locked.locked = true;
        let pasted = Snapshot {
            nodes: vec![node("w"), locked],
            edges: vec![edge("wx", "w", "x"), edge("wz", "w", "z")],
        };

        assert!(graph.insert_snapshot(pasted.clone()));
        assert_eq!(graph.nodes().len(), 5);
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.edges()[0].id, "wx");

        // same ids again collide
        assert!(!graph.insert_snapshot(pasted));
        assert_eq!(graph.nodes().len(), 5);
    }

    #[test]
    fn test_group_members() {
        let mut graph = three_nodes();
        graph.set_group("a", Some("g1".into()));
        graph.set_group("c", Some("g1".into()));
        assert_eq!(graph.group_members("g1"), vec!["a".to_string(), "c".to_string()]);
        graph.set_group("a", None);
        assert_eq!(graph.group_members("g1"), vec!["c".to_string()]);
    }
}
