//! Canvas interaction: viewport reports, node dragging, drag guides and resize events.

use super::state::{DragState, NodeResized, Viewport};
use super::Editor;
use crate::guides::Guide;
use log::debug;
use std::sync::mpsc::Sender;

impl Editor {
    /// Records the visible canvas as reported by the render layer.
    ///
    /// The zoom factor is clamped to the supported range; a non-finite zoom resets to 1.0.
    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.viewport = viewport.map(Viewport::clamped);
    }

    /// The last reported viewport.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Handles a right-click on the canvas: the next paste lands where the menu was opened.
    ///
    /// Without a viewport the screen position is taken as a world position.
    pub fn context_menu_at(&mut self, screen_pos: egui::Pos2) {
        let world = self
            .viewport
            .map_or(screen_pos, |v| v.screen_to_world(screen_pos));
        self.clipboard.set_anchor(Some(world));
    }

    /// Snaps a world position to the configured grid.
    pub fn snap_to_grid(&self, pos: egui::Pos2) -> egui::Pos2 {
        let grid = self.config.grid_size;
        if grid <= 0.0 {
            return pos;
        }
        egui::pos2((pos.x / grid).round() * grid, (pos.y / grid).round() * grid)
    }

    // ----- dragging -----

    /// Starts dragging `node_id` from the given pointer position (world space).
    ///
    /// If the node is part of the selection every selected node moves with it, otherwise the
    /// selection collapses to the node. Locked nodes never move.
    ///
    /// # Returns
    ///
    /// `false` if the node doesn't exist or is locked.
    pub fn begin_drag(&mut self, node_id: &str, pointer_world: egui::Pos2) -> bool {
        let Some(node) = self.graph.node(node_id) else {
            return false;
        };
        if node.locked {
            return false;
        }
        let pointer_offset = pointer_world - egui::Pos2::from(node.position);

        if !self.selection.is_selected(&self.graph, node_id) {
            self.selection.set_selection([node_id.to_string()]);
        }
        let originals = self
            .selected_ids()
            .into_iter()
            .filter_map(|id| {
                let node = self.graph.node(&id)?;
                (!node.locked).then_some((id, node.position))
            })
            .collect();

        self.guides.clear();
        self.drag = Some(DragState {
            primary: node_id.to_string(),
            pointer_offset,
            before: self.graph.snapshot(),
            originals,
        });
        true
    }

    /// Returns true while a drag gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Moves the dragged nodes so the primary node follows the pointer.
    ///
    /// # Arguments
    ///
    /// * `pointer_world` - Current pointer position in world space
    /// * `snap` - Whether the primary node's corner snaps to the grid
    ///
    /// # Returns
    ///
    /// `false` if no drag is in progress.
    pub fn drag_to(&mut self, pointer_world: egui::Pos2, snap: bool) -> bool {
        let Some(drag) = self.drag.as_ref() else {
            return false;
        };
        let Some(origin) = drag
            .originals
            .iter()
            .find(|(id, _)| *id == drag.primary)
            .map(|(_, pos)| egui::Pos2::from(*pos))
        else {
            return false;
        };

        let mut target = pointer_world - drag.pointer_offset;
        if snap {
            target = self.snap_to_grid(target);
        }
        let delta = target - origin;

        for (id, original) in &drag.originals {
            let moved = egui::Pos2::from(*original) + delta;
            self.graph.update_node_position(id, moved.into());
        }
        if let Some(center) = self.graph.node(&drag.primary).map(|n| n.rect().center()) {
            self.guides.pointer_moved(center);
        }
        true
    }

    /// Finishes the drag gesture.
    ///
    /// A single "move" history entry is recorded if any node actually moved.
    ///
    /// # Returns
    ///
    /// `true` if a history entry was recorded.
    pub fn end_drag(&mut self) -> bool {
        self.guides.clear();
        let Some(drag) = self.drag.take() else {
            return false;
        };
        let moved = drag
            .originals
            .iter()
            .any(|(id, original)| self.graph.node(id).is_some_and(|n| n.position != *original));
        if moved {
            debug!("Drag of {} node(s) finished", drag.originals.len());
            self.history.commit_snapshot("move", drag.before);
        }
        moved
    }

    /// Aborts the drag gesture, putting every dragged node back where it started.
    pub fn cancel_drag(&mut self) {
        self.guides.clear();
        let Some(drag) = self.drag.take() else {
            return;
        };
        debug!("Drag of {} node(s) cancelled", drag.originals.len());
        for (id, original) in drag.originals {
            self.graph.reset_node_position(&id, original);
        }
    }

    // ----- guides -----

    /// Runs one animation frame of guide computation for the active drag.
    ///
    /// Returns no guides when nothing is being dragged.
    pub fn animation_frame(&mut self) -> &[Guide] {
        let Some(drag) = self.drag.as_ref() else {
            self.guides.clear();
            return self.guides.guides();
        };
        let dragged = drag.dragged_ids();
        self.guides.animation_frame(&self.graph, &drag.primary, &dragged)
    }

    /// Guides from the last animation frame.
    pub fn guides(&self) -> &[Guide] {
        self.guides.guides()
    }

    // ----- resize events -----

    /// A sender the render layer uses to report measured node sizes.
    pub fn resize_events(&self) -> Sender<NodeResized> {
        self.resize_sender.clone()
    }

    /// Applies every queued size report. Sizes are measurements, not edits, so no history
    /// entry is recorded.
    ///
    /// # Returns
    ///
    /// Number of sizes applied to existing nodes.
    pub fn pump_resize_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.resize_receiver.try_recv() {
            if self.graph.set_node_size(&event.id, event.size) {
                applied += 1;
            }
        }
        applied
    }
}
