//! The editing session: one graph plus the components that operate on it.
//!
//! [`Editor`] owns the graph, the selection, the undo history, the clipboard and the drag
//! guides, and is the only place where they meet. Every discrete mutation that succeeds is
//! paired with exactly one history commit, recorded immediately before the change. Structural
//! edits and undo/redo cancel a drag in progress first, so a drag never spans a commit.
//!
//! # Module Organization
//!
//! - `state` - Viewport, drag gesture and resize event structures
//! - `canvas` - Viewport handling, node dragging, alignment guides and resize events
//! - `file_ops` - Layout export/import and file save/load

mod canvas;
mod file_ops;
mod state;

pub use state::{NodeResized, Viewport};

use self::state::DragState;
use crate::alignment::{self, AlignMode, DistributeMode};
use crate::clipboard::ClipboardManager;
use crate::config::EditorConfig;
use crate::graph::GraphModel;
use crate::grouping;
use crate::guides::GuideTracker;
use crate::history::HistoryManager;
use crate::selection::SelectionTracker;
use crate::types::*;
use log::debug;
use std::sync::mpsc::{channel, Receiver, Sender};

/// One editing session over a single in-memory graph.
pub struct Editor {
    config: EditorConfig,
    graph: GraphModel,
    selection: SelectionTracker,
    history: HistoryManager,
    clipboard: ClipboardManager,
    guides: GuideTracker,
    /// Visible canvas, once the render layer has reported one
    viewport: Option<Viewport>,
    drag: Option<DragState>,
    resize_sender: Sender<NodeResized>,
    resize_receiver: Receiver<NodeResized>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Creates an empty session configured by `config`.
    pub fn new(config: EditorConfig) -> Self {
        let (resize_sender, resize_receiver) = channel();
        Self {
            graph: GraphModel::new(),
            selection: SelectionTracker::new(),
            history: HistoryManager::new(config.history_depth),
            clipboard: ClipboardManager::new(config.paste_offset),
            guides: GuideTracker::new(config.guide_move_threshold, config.guide_snap_tolerance),
            viewport: None,
            drag: None,
            resize_sender,
            resize_receiver,
            config,
        }
    }

    /// The session configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Read-only view of the graph.
    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    /// The undo history.
    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// The clipboard.
    pub fn clipboard(&self) -> &ClipboardManager {
        &self.clipboard
    }

    /// The raw selection tracker.
    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    // ----- selection -----

    /// Replaces the selection, as reported by the render layer.
    pub fn set_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.selection.set_selection(ids);
    }

    /// Shift-click: adds or removes one node.
    pub fn toggle_selection(&mut self, id: &str) {
        self.selection.toggle(id);
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selects the given nodes plus every other member of their groups.
    pub fn select_with_groups<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.selection.set_selection(ids);
        self.selection.expand_to_groups(&self.graph);
    }

    /// Currently selected node ids, in graph order.
    pub fn selected_ids(&self) -> Vec<NodeId> {
        self.selection.selected_ids(&self.graph)
    }

    /// Bounding boxes of the selected nodes.
    pub fn selection_with_geometry(&self) -> Vec<NodeGeometry> {
        self.selection.selection_with_geometry(&self.graph)
    }

    // ----- structural edits -----

    /// Adds a node.
    ///
    /// # Returns
    ///
    /// `false` (and no history entry) if the id is already taken.
    pub fn add_node(&mut self, node: Node) -> bool {
        self.cancel_drag();
        if self.graph.contains_node(&node.id) {
            return false;
        }
        self.history.commit("add node", &self.graph);
        self.graph.add_node(node)
    }

    /// Creates a node of the given kind at a world position and selects it.
    ///
    /// # Returns
    ///
    /// The ID of the newly created node.
    pub fn create_node_at(&mut self, kind: NodeKind, position: Position) -> NodeId {
        let node = Node::new(kind, kind.display_name(), position);
        let node_id = node.id.clone();
        self.add_node(node);
        self.selection.set_selection([node_id.clone()]);
        node_id
    }

    /// Connects two nodes with a new smooth edge.
    ///
    /// # Returns
    ///
    /// The new edge id, or `None` if the connection is rejected (self-loop, missing or
    /// locked endpoint).
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        source_handle: Option<String>,
        target_handle: Option<String>,
    ) -> Option<EdgeId> {
        let edge = Edge::new(source, target).with_handles(source_handle, target_handle);
        let edge_id = edge.id.clone();
        self.add_edge(edge).then_some(edge_id)
    }

    /// Adds a fully specified edge.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        self.cancel_drag();
        if !self.graph.can_connect(&edge.source, &edge.target) || self.graph.edge(&edge.id).is_some() {
            return false;
        }
        self.history.commit("connect", &self.graph);
        self.graph.add_edge(edge)
    }

    /// Removes one edge.
    pub fn remove_edge(&mut self, id: &str) -> bool {
        self.cancel_drag();
        if self.graph.edge(id).is_none() {
            return false;
        }
        self.history.commit("delete edge", &self.graph);
        self.graph.remove_edge(id)
    }

    /// Deletes every selected node together with its edges.
    ///
    /// # Returns
    ///
    /// Number of nodes deleted.
    pub fn delete_selected(&mut self) -> usize {
        self.cancel_drag();
        let ids = self.selected_ids();
        if ids.is_empty() {
            return 0;
        }
        self.history.commit("delete", &self.graph);
        self.remove_nodes(&ids);
        self.selection.clear();
        ids.len()
    }

    fn remove_nodes(&mut self, ids: &[NodeId]) {
        for id in ids {
            self.graph.remove_node(id);
        }
    }

    // ----- history -----

    /// Reverts the most recent committed action. An in-progress drag is cancelled first.
    pub fn undo(&mut self) -> bool {
        self.cancel_drag();
        self.history.undo(&mut self.graph)
    }

    /// Re-applies the most recently undone action.
    pub fn redo(&mut self) -> bool {
        self.cancel_drag();
        self.history.redo(&mut self.graph)
    }

    // ----- align / distribute -----

    /// Aligns the selected nodes. Requires at least two selected nodes.
    pub fn align_selected(&mut self, mode: AlignMode) -> bool {
        self.cancel_drag();
        let geometry = self.selection_with_geometry();
        let Some(moves) = alignment::align(&geometry, mode) else {
            return false;
        };
        self.apply_moves(mode.history_label(), moves);
        true
    }

    /// Spreads the selected nodes evenly. Requires at least three selected nodes.
    pub fn distribute_selected(&mut self, mode: DistributeMode) -> bool {
        self.cancel_drag();
        let geometry = self.selection_with_geometry();
        let Some(moves) = alignment::distribute(&geometry, mode) else {
            return false;
        };
        self.apply_moves(mode.history_label(), moves);
        true
    }

    fn apply_moves(&mut self, label: &str, moves: Vec<(NodeId, Position)>) {
        self.history.commit(label, &self.graph);
        for (id, position) in moves {
            // locked nodes stay put
            self.graph.update_node_position(&id, position);
        }
    }

    // ----- clipboard -----

    /// Copies the selected sub-graph.
    ///
    /// # Returns
    ///
    /// Number of nodes copied.
    pub fn copy(&mut self) -> usize {
        let ids = self.selected_ids();
        self.clipboard.copy(&self.graph, &ids)
    }

    /// Copies the selected sub-graph and deletes it from the canvas.
    ///
    /// # Returns
    ///
    /// Number of nodes cut.
    pub fn cut(&mut self) -> usize {
        self.cancel_drag();
        let ids = self.selected_ids();
        let copied = self.clipboard.copy(&self.graph, &ids);
        if copied == 0 {
            return 0;
        }
        self.history.commit("cut", &self.graph);
        self.remove_nodes(&ids);
        self.selection.clear();
        copied
    }

    /// Arms (or disarms) the world-space point the next paste lands on.
    pub fn set_paste_anchor(&mut self, anchor: Option<egui::Pos2>) {
        self.clipboard.set_anchor(anchor);
    }

    /// Pastes a freshly identified copy of the clipboard and selects it.
    ///
    /// # Returns
    ///
    /// Number of nodes pasted; `0` when the clipboard is empty.
    pub fn paste(&mut self) -> usize {
        self.cancel_drag();
        let center = self.viewport.map(|v| v.world_center());
        let Some(pasted) = self.clipboard.prepare_paste(center) else {
            return 0;
        };
        self.history.commit("paste", &self.graph);
        let ids: Vec<NodeId> = pasted.nodes.iter().map(|n| n.id.clone()).collect();
        debug!("Pasting {} node(s), {} edge(s)", ids.len(), pasted.edges.len());
        self.graph.insert_snapshot(pasted);
        self.selection.set_selection(ids.clone());
        ids.len()
    }

    // ----- groups and locks -----

    /// Puts every selected node into one new group. Requires at least two selected nodes.
    ///
    /// # Returns
    ///
    /// The new group id.
    pub fn group_selected(&mut self) -> Option<GroupId> {
        self.cancel_drag();
        let ids = self.selected_ids();
        if ids.len() < crate::constants::MIN_GROUP_SELECTION {
            return None;
        }
        self.history.commit("group", &self.graph);
        grouping::group_nodes(&mut self.graph, &ids)
    }

    /// Removes the selected nodes from their groups.
    ///
    /// # Returns
    ///
    /// Number of nodes ungrouped; `0` (and no history entry) if none was grouped.
    pub fn ungroup_selected(&mut self) -> usize {
        self.cancel_drag();
        let ids = self.selected_ids();
        if !grouping::any_grouped(&self.graph, &ids) {
            return 0;
        }
        self.history.commit("ungroup", &self.graph);
        grouping::ungroup_nodes(&mut self.graph, &ids)
    }

    /// Flips the lock flag of each selected node.
    ///
    /// # Returns
    ///
    /// Number of nodes toggled.
    pub fn toggle_lock_selected(&mut self) -> usize {
        self.cancel_drag();
        let ids = self.selected_ids();
        if ids.is_empty() {
            return 0;
        }
        self.history.commit("toggle lock", &self.graph);
        grouping::toggle_locks(&mut self.graph, &ids)
    }

    // ----- execution -----

    /// Captures what the execution bridge needs from the current canvas.
    pub fn capture_run(&self) -> crate::bridge::CanvasRun {
        crate::bridge::CanvasRun::capture(&self.graph, &self.selected_ids())
    }
}
