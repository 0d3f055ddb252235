//! Session state structures that sit next to the graph: viewport, drag gesture and the
//! node-resized event type.

use crate::constants::{MAX_ZOOM, MIN_ZOOM};
use crate::types::{NodeId, Position, Size, Snapshot};

/// State related to canvas navigation.
///
/// Tracks the current pan offset, zoom level and the size of the on-screen canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Current canvas pan offset (in screen space)
    pub offset: egui::Vec2,
    /// Current zoom level (1.0 = normal, 2.0 = 2x zoom, 0.5 = 50% zoom)
    pub zoom_factor: f32,
    /// Size of the visible canvas in screen pixels
    pub screen_size: egui::Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: egui::Vec2::ZERO,
            zoom_factor: 1.0,
            screen_size: egui::Vec2::ZERO,
        }
    }
}

impl Viewport {
    /// Returns the viewport with its zoom factor clamped to [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    pub fn clamped(mut self) -> Self {
        self.zoom_factor = if self.zoom_factor.is_finite() {
            self.zoom_factor.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        };
        self
    }

    /// Converts screen coordinates to world coordinates accounting for zoom and pan.
    pub fn screen_to_world(&self, screen_pos: egui::Pos2) -> egui::Pos2 {
        (screen_pos - self.offset) / self.zoom_factor
    }

    /// Converts world coordinates to screen coordinates accounting for zoom and pan.
    pub fn world_to_screen(&self, world_pos: egui::Pos2) -> egui::Pos2 {
        world_pos * self.zoom_factor + self.offset
    }

    /// World-space point at the centre of the visible canvas.
    pub fn world_center(&self) -> egui::Pos2 {
        self.screen_to_world((self.screen_size / 2.0).to_pos2())
    }
}

/// An in-progress node drag.
#[derive(Debug, Clone)]
pub(crate) struct DragState {
    /// Node under the pointer
    pub primary: NodeId,
    /// Offset from pointer to the primary node's top-left corner
    pub pointer_offset: egui::Vec2,
    /// Graph before the drag started, recorded as the "move" undo entry
    pub before: Snapshot,
    /// Original positions of every node moving with the drag
    pub originals: Vec<(NodeId, Position)>,
}

impl DragState {
    /// Ids of every node moving with the drag.
    pub fn dragged_ids(&self) -> Vec<NodeId> {
        self.originals.iter().map(|(id, _)| id.clone()).collect()
    }
}

/// A size measurement pushed by the render layer.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeResized {
    /// Measured node
    pub id: NodeId,
    /// New size in world units
    pub size: Size,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_world_round_trip() {
        let viewport = Viewport {
            offset: egui::vec2(100.0, 50.0),
            zoom_factor: 2.0,
            screen_size: egui::vec2(800.0, 600.0),
        };
        let world = viewport.screen_to_world(egui::pos2(300.0, 250.0));
        assert_eq!(world, egui::pos2(100.0, 100.0));
        assert_eq!(viewport.world_to_screen(world), egui::pos2(300.0, 250.0));
        assert_eq!(viewport.world_center(), egui::pos2(150.0, 125.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let zoom = |zoom_factor: f32| {
            Viewport {
                zoom_factor,
                ..Viewport::default()
            }
            .clamped()
            .zoom_factor
        };
        assert_eq!(zoom(0.0), 0.25);
        assert_eq!(zoom(-3.0), 0.25);
        assert_eq!(zoom(12.0), 5.0);
        assert_eq!(zoom(f32::NAN), 1.0);
        assert_eq!(zoom(f32::INFINITY), 1.0);
        assert_eq!(zoom(1.5), 1.5);
    }
}
