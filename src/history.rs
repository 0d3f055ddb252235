//! Undo/redo functionality based on whole-graph snapshots.
//!
//! Every discrete editor mutation records the graph state *before* the mutation, labelled
//! with what is about to happen. Undo swaps the live graph with the newest recorded state and
//! parks the live state on the redo stack; redo does the reverse.

use crate::constants::MAX_UNDO_HISTORY;
use crate::graph::GraphModel;
use crate::types::Snapshot;
use log::debug;

/// A recorded graph state together with the label of the action that followed it.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Short description shown in "Undo ..." menus
    pub label: String,
    /// The graph as it was before the labelled action
    pub snapshot: Snapshot,
}

/// Bounded-depth snapshot history for one editing session.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    /// States that can be restored by undo, oldest first
    past: Vec<HistoryEntry>,
    /// States that can be restored by redo, most recently undone last
    future: Vec<HistoryEntry>,
    max_depth: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }
}

impl HistoryManager {
    /// Creates an empty history keeping at most `max_depth` undo entries.
    pub fn new(max_depth: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Records the current graph state under `label`.
    ///
    /// Call this immediately before applying the labelled mutation. Clears the redo stack
    /// since a new action invalidates any previously undone actions.
    pub fn commit(&mut self, label: &str, graph: &GraphModel) {
        self.commit_snapshot(label, graph.snapshot());
    }

    /// Records a state captured earlier, e.g. at the start of a drag gesture.
    pub fn commit_snapshot(&mut self, label: &str, snapshot: Snapshot) {
        debug!("History commit: {label}");
        self.past.push(HistoryEntry {
            label: label.to_string(),
            snapshot,
        });
        self.future.clear();

        // Limit undo history size
        if self.past.len() > self.max_depth {
            self.past.remove(0);
        }
    }

    /// Returns true if there are actions that can be undone.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Returns true if there are actions that can be redone.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Label of the action the next undo reverts.
    pub fn undo_label(&self) -> Option<&str> {
        self.past.last().map(|e| e.label.as_str())
    }

    /// Label of the action the next redo re-applies.
    pub fn redo_label(&self) -> Option<&str> {
        self.future.last().map(|e| e.label.as_str())
    }

    /// Number of entries available to undo.
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Restores the newest recorded state into `graph`.
    ///
    /// # Returns
    ///
    /// `false` (and no mutation) if there is nothing to undo.
    pub fn undo(&mut self, graph: &mut GraphModel) -> bool {
        let Some(entry) = self.past.pop() else {
            return false;
        };
        debug!("Undo: {}", entry.label);
        self.future.push(HistoryEntry {
            label: entry.label,
            snapshot: graph.snapshot(),
        });
        graph.restore(entry.snapshot);
        true
    }

    /// Re-applies the most recently undone action.
    ///
    /// Does not clear the redo stack; only `commit` does that.
    ///
    /// # Returns
    ///
    /// `false` (and no mutation) if there is nothing to redo.
    pub fn redo(&mut self, graph: &mut GraphModel) -> bool {
        let Some(entry) = self.future.pop() else {
            return false;
        };
        debug!("Redo: {}", entry.label);
        self.past.push(HistoryEntry {
            label: entry.label,
            snapshot: graph.snapshot(),
        });
        graph.restore(entry.snapshot);
        true
    }

    /// Clears all undo and redo history.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}
