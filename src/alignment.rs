//! Align and distribute geometry over selected node bounding boxes.
//!
//! These functions are pure: they take the selection's bounding boxes and return the new
//! top-left corner for every node that moves. The editor applies the result to the graph and
//! records the history entry.

use crate::constants::{MIN_ALIGN_SELECTION, MIN_DISTRIBUTE_SELECTION};
use crate::types::{NodeGeometry, NodeId, Position};
use serde::{Deserialize, Serialize};

/// Edge or centre line that an align operation lines nodes up on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignMode {
    /// Leftmost left edge
    Left,
    /// Horizontal centre of the selection's extent
    HCenter,
    /// Rightmost right edge
    Right,
    /// Topmost top edge
    Top,
    /// Vertical centre of the selection's extent
    VCenter,
    /// Bottommost bottom edge
    Bottom,
}

impl AlignMode {
    /// Label recorded in the undo history.
    pub fn history_label(&self) -> &'static str {
        match self {
            AlignMode::Left => "align left",
            AlignMode::HCenter => "align horizontal centers",
            AlignMode::Right => "align right",
            AlignMode::Top => "align top",
            AlignMode::VCenter => "align vertical centers",
            AlignMode::Bottom => "align bottom",
        }
    }
}

/// Axis along which nodes are spread out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributeMode {
    /// Equal horizontal gaps
    Horizontal,
    /// Equal vertical gaps
    Vertical,
}

impl DistributeMode {
    /// Label recorded in the undo history.
    pub fn history_label(&self) -> &'static str {
        match self {
            DistributeMode::Horizontal => "distribute horizontally",
            DistributeMode::Vertical => "distribute vertically",
        }
    }
}

/// Computes aligned positions for the given boxes.
///
/// Returns `None` when fewer than two boxes are given.
pub fn align(items: &[NodeGeometry], mode: AlignMode) -> Option<Vec<(NodeId, Position)>> {
    if items.len() < MIN_ALIGN_SELECTION {
        return None;
    }
    let overall = items
        .iter()
        .map(NodeGeometry::rect)
        .reduce(|a, b| a.union(b))?;

    let moves = items
        .iter()
        .map(|b| {
            let (x, y) = match mode {
                AlignMode::Left => (overall.min.x, b.y),
                AlignMode::Right => (overall.max.x - b.w, b.y),
                AlignMode::HCenter => {
                    let mid = (overall.min.x + overall.max.x) / 2.0;
                    (b.x + (mid - (b.x + b.w / 2.0)), b.y)
                }
                AlignMode::Top => (b.x, overall.min.y),
                AlignMode::Bottom => (b.x, overall.max.y - b.h),
                AlignMode::VCenter => {
                    let mid = (overall.min.y + overall.max.y) / 2.0;
                    (b.x, b.y + (mid - (b.y + b.h / 2.0)))
                }
            };
            (b.id.clone(), Position::new(x, y))
        })
        .collect();
    Some(moves)
}

/// Spreads boxes so the gaps between consecutive boxes are equal.
///
/// Boxes are ordered by their leading edge; the first and last stay where they are and only
/// the inner boxes move. Returns `None` when fewer than three boxes are given.
pub fn distribute(
    items: &[NodeGeometry],
    mode: DistributeMode,
) -> Option<Vec<(NodeId, Position)>> {
    if items.len() < MIN_DISTRIBUTE_SELECTION {
        return None;
    }
    // (leading edge, extent) along the distribution axis
    let axis = |b: &NodeGeometry| match mode {
        DistributeMode::Horizontal => (b.x, b.w),
        DistributeMode::Vertical => (b.y, b.h),
    };

    let mut sorted: Vec<&NodeGeometry> = items.iter().collect();
    sorted.sort_by(|a, b| axis(*a).0.total_cmp(&axis(*b).0));

    let (first_pos, first_len) = axis(sorted[0]);
    let (last_pos, last_len) = axis(sorted[sorted.len() - 1]);
    let inner = &sorted[1..sorted.len() - 1];

    let span = (last_pos + last_len) - first_pos;
    let inner_len: f32 = inner.iter().map(|b| axis(*b).1).sum();
    let gap = (span - first_len - inner_len - last_len) / (inner.len() as f32 + 1.0);

    let mut cursor = first_pos + first_len + gap;
    let moves = inner
        .iter()
        .map(|b| {
            let position = match mode {
                DistributeMode::Horizontal => Position::new(cursor, b.y),
                DistributeMode::Vertical => Position::new(b.x, cursor),
            };
            cursor += axis(*b).1 + gap;
            (b.id.clone(), position)
        })
        .collect();
    Some(moves)
}
