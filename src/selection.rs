//! Tracks which nodes are currently selected.

use crate::graph::GraphModel;
use crate::types::{NodeGeometry, NodeId};
use std::collections::HashSet;

/// The current node selection, fed by render-layer selection events.
///
/// The stored set may go stale when nodes are deleted; every read intersects it with the
/// graph's current node ids, so a deleted node never reads back as selected.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    selected: HashSet<NodeId>,
}

impl SelectionTracker {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection.
    pub fn set_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.selected = ids.into_iter().collect();
    }

    /// Adds a node to the selection, or removes it if already selected (shift-click).
    pub fn toggle(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Selected ids that still exist, in graph order.
    pub fn selected_ids(&self, graph: &GraphModel) -> Vec<NodeId> {
        graph
            .nodes()
            .iter()
            .filter(|n| self.selected.contains(&n.id))
            .map(|n| n.id.clone())
            .collect()
    }

    /// Returns true if the node exists and is selected.
    pub fn is_selected(&self, graph: &GraphModel, id: &str) -> bool {
        self.selected.contains(id) && graph.contains_node(id)
    }

    /// Number of selected nodes that still exist.
    pub fn len(&self, graph: &GraphModel) -> usize {
        self.selected_ids(graph).len()
    }

    /// Returns true if no existing node is selected.
    pub fn is_empty(&self, graph: &GraphModel) -> bool {
        self.len(graph) == 0
    }

    /// Bounding boxes of the selected nodes, falling back to default sizes when unmeasured.
    pub fn selection_with_geometry(&self, graph: &GraphModel) -> Vec<NodeGeometry> {
        graph
            .nodes()
            .iter()
            .filter(|n| self.selected.contains(&n.id))
            .map(|n| n.geometry())
            .collect()
    }

    /// Grows the selection so it contains every member of each group touched by it.
    pub fn expand_to_groups(&mut self, graph: &GraphModel) {
        let groups: HashSet<&str> = graph
            .nodes()
            .iter()
            .filter(|n| self.selected.contains(&n.id))
            .filter_map(|n| n.group_id.as_deref())
            .collect();
        for node in graph.nodes() {
            if let Some(gid) = node.group_id.as_deref() {
                if groups.contains(gid) {
                    self.selected.insert(node.id.clone());
                }
            }
        }
    }
}
