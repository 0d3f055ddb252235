//! Alignment guides shown while dragging a node.
//!
//! Pointer-move events arrive far more often than guides need refreshing, so the tracker only
//! schedules a recomputation once the dragged node's centre has travelled a minimum distance,
//! and performs at most one recomputation per animation frame.

use crate::constants::{GUIDE_MOVE_THRESHOLD, GUIDE_SNAP_TOLERANCE};
use crate::graph::GraphModel;
use crate::types::NodeId;
use std::collections::HashSet;

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideAxis {
    /// A vertical line at a fixed x, for left/centre/right matches
    Vertical,
    /// A horizontal line at a fixed y, for top/centre/bottom matches
    Horizontal,
}

/// A guide segment in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Guide {
    /// Orientation
    pub axis: GuideAxis,
    /// x for vertical guides, y for horizontal guides
    pub position: f32,
    /// Start of the segment along the other axis
    pub from: f32,
    /// End of the segment along the other axis
    pub to: f32,
}

/// Rate-limited guide state for one drag gesture.
#[derive(Debug, Clone)]
pub struct GuideTracker {
    move_threshold: f32,
    tolerance: f32,
    /// Centre used for the last computed frame
    last_center: Option<egui::Pos2>,
    /// Centre waiting for the next animation frame
    pending: Option<egui::Pos2>,
    guides: Vec<Guide>,
}

impl Default for GuideTracker {
    fn default() -> Self {
        Self::new(GUIDE_MOVE_THRESHOLD, GUIDE_SNAP_TOLERANCE)
    }
}

impl GuideTracker {
    /// Creates a tracker with the given movement threshold and match tolerance.
    pub fn new(move_threshold: f32, tolerance: f32) -> Self {
        Self {
            move_threshold,
            tolerance,
            last_center: None,
            pending: None,
            guides: Vec::new(),
        }
    }

    /// Guides computed for the last frame.
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    /// Returns true if a recomputation is waiting for the next frame.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Notes the dragged node's new centre.
    ///
    /// # Returns
    ///
    /// `true` if a recomputation was scheduled. Movements smaller than the threshold since the
    /// last computed frame are ignored; repeated calls before a frame coalesce.
    pub fn pointer_moved(&mut self, center: egui::Pos2) -> bool {
        if let Some(last) = self.last_center {
            if (center - last).length() < self.move_threshold {
                return false;
            }
        }
        self.pending = Some(center);
        true
    }

    /// Runs the scheduled recomputation, if any.
    ///
    /// `primary` is the node under the pointer; `dragged` holds every node moving with it,
    /// none of which are used as guide references.
    pub fn animation_frame(&mut self, graph: &GraphModel, primary: &str, dragged: &[NodeId]) -> &[Guide] {
        if let Some(center) = self.pending.take() {
            self.last_center = Some(center);
            self.guides = compute_guides(graph, primary, dragged, self.tolerance);
        }
        &self.guides
    }

    /// Drops all guide state; called on drag end, drag cancel and teardown.
    pub fn clear(&mut self) {
        self.last_center = None;
        self.pending = None;
        self.guides.clear();
    }
}

/// Compares the primary node's edges and centre lines against every non-dragged node.
pub fn compute_guides(graph: &GraphModel, primary: &str, dragged: &[NodeId], tolerance: f32) -> Vec<Guide> {
    let Some(moving) = graph.node(primary).map(|n| n.rect()) else {
        return Vec::new();
    };
    let skip: HashSet<&str> = dragged.iter().map(String::as_str).chain([primary]).collect();

    let mut guides: Vec<Guide> = Vec::new();
    let mut push = |axis: GuideAxis, position: f32, from: f32, to: f32| {
        // merge with an existing guide on the same line
        if let Some(g) = guides
            .iter_mut()
            .find(|g| g.axis == axis && (g.position - position).abs() < f32::EPSILON)
        {
            g.from = g.from.min(from);
            g.to = g.to.max(to);
        } else {
            guides.push(Guide { axis, position, from, to });
        }
    };

    let moving_x = [moving.left(), moving.center().x, moving.right()];
    let moving_y = [moving.top(), moving.center().y, moving.bottom()];

    for other in graph.nodes().iter().filter(|n| !skip.contains(n.id.as_str())) {
        let r = other.rect();
        for x in [r.left(), r.center().x, r.right()] {
            if moving_x.iter().any(|m| (m - x).abs() <= tolerance) {
                push(GuideAxis::Vertical, x, moving.top().min(r.top()), moving.bottom().max(r.bottom()));
            }
        }
        for y in [r.top(), r.center().y, r.bottom()] {
            if moving_y.iter().any(|m| (m - y).abs() <= tolerance) {
                push(GuideAxis::Horizontal, y, moving.left().min(r.left()), moving.right().max(r.right()));
            }
        }
    }
    guides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Node, NodeKind, Position, Size};

    fn graph() -> GraphModel {
        let mut graph = GraphModel::new();
        for (id, x, y) in [("drag", 0.0, 0.0), ("left", 2.0, 300.0), ("far", 900.0, 900.0)] {
            let mut n = Node::with_id(id, NodeKind::Llm, id, Position::new(x, y));
            n.size = Some(Size::new(100.0, 50.0));
            graph.add_node(n);
        }
        graph
    }

    #[test]
    fn test_matching_left_edge_yields_vertical_guide() {
        let graph = graph();
        let guides = compute_guides(&graph, "drag", &["drag".into()], 6.0);

        let vertical: Vec<&Guide> = guides.iter().filter(|g| g.axis == GuideAxis::Vertical).collect();
        // left, centre and right all line up within tolerance
        assert_eq!(vertical.len(), 3);
        assert_eq!(vertical[0].position, 2.0);
        assert_eq!(vertical[0].from, 0.0);
        assert_eq!(vertical[0].to, 350.0);
        assert!(guides.iter().all(|g| g.axis == GuideAxis::Vertical));
    }

    #[test]
    fn test_dragged_companions_are_not_references() {
        let graph = graph();
        let guides = compute_guides(&graph, "drag", &["drag".into(), "left".into()], 6.0);
        assert!(guides.is_empty());
    }

    #[test]
    fn test_recompute_is_rate_limited_and_coalesced() {
        let graph = graph();
        let mut tracker = GuideTracker::default();

        assert!(tracker.pointer_moved(egui::pos2(50.0, 25.0)));
        assert!(tracker.pointer_moved(egui::pos2(51.0, 25.0)));
        assert_eq!(tracker.animation_frame(&graph, "drag", &["drag".into()]).len(), 3);
        assert!(!tracker.is_pending());

        // below threshold since the last computed frame
        assert!(!tracker.pointer_moved(egui::pos2(51.5, 25.5)));
        assert!(!tracker.is_pending());

        assert!(tracker.pointer_moved(egui::pos2(60.0, 25.0)));
        assert!(tracker.is_pending());
    }

    #[test]
    fn test_clear_drops_everything() {
        let graph = graph();
        let mut tracker = GuideTracker::default();
        tracker.pointer_moved(egui::pos2(50.0, 25.0));
        tracker.animation_frame(&graph, "drag", &[]);
        assert!(!tracker.guides().is_empty());

        tracker.clear();
        assert!(tracker.guides().is_empty());
        assert!(!tracker.is_pending());
        assert!(tracker.pointer_moved(egui::pos2(50.2, 25.0)));
    }
}
